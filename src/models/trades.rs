//! Private trade decoders (trade history and trade queries).
//!
//! Both endpoints share one underlying record; the history and query
//! variants each add their own fields on top, so the common set is decoded
//! by a single function and the variants extend it.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::json::Fields;
use crate::models::{OrderSide, OrderType};

/// Fields common to every private trade record.
#[derive(Debug, Clone)]
pub struct TradeDetail {
    /// Order responsible for this fill.
    pub ordertxid: String,
    pub pair: String,
    /// Unix timestamp with fractional seconds.
    pub time: f64,
    pub side: OrderSide,
    pub ordertype: OrderType,
    pub price: f64,
    pub cost: f64,
    pub fee: f64,
    pub vol: f64,
    pub margin: f64,
    pub misc: String,
}

impl TradeDetail {
    fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            ordertxid: obj.req_str("ordertxid")?.to_string(),
            pair: obj.req_str("pair")?.to_string(),
            time: obj.req_f64("time")?,
            side: obj.req_enum("type", OrderSide::from_wire)?,
            ordertype: obj.req_enum("ordertype", OrderType::from_wire)?,
            price: obj.req_f64("price")?,
            cost: obj.req_f64("cost")?,
            fee: obj.req_f64("fee")?,
            vol: obj.req_f64("vol")?,
            margin: obj.f64_or("margin", 0.0),
            misc: obj.str_or("misc", "").to_string(),
        })
    }
}

/// A fill from the trades-history endpoint.
#[derive(Debug, Clone)]
pub struct HistoryTrade {
    pub detail: TradeDetail,
    /// Position ID, when the fill touched a margin position.
    pub postxid: Option<String>,
    /// Numeric trade ID. Required; an omission is an API contract break.
    pub trade_id: i64,
    /// True when this fill was the resting (maker) side.
    pub maker: bool,
}

impl HistoryTrade {
    /// Decodes one history-trade object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            detail: TradeDetail::decode(obj)?,
            postxid: obj.opt_str("postxid").map(str::to_string),
            trade_id: obj.req_i64("trade_id")?,
            maker: obj.bool_or("maker", false),
        })
    }
}

/// A fill from the query-trades endpoint.
#[derive(Debug, Clone)]
pub struct QueryTrade {
    pub detail: TradeDetail,
    pub postxid: Option<String>,
    /// Position status. Required; an omission is an API contract break.
    pub posstatus: String,
}

impl QueryTrade {
    /// Decodes one queried-trade object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            detail: TradeDetail::decode(obj)?,
            postxid: obj.opt_str("postxid").map(str::to_string),
            posstatus: obj.req_str("posstatus")?.to_string(),
        })
    }
}

/// A private trade from either endpoint.
#[derive(Debug, Clone)]
pub enum Trade {
    History(HistoryTrade),
    Query(QueryTrade),
}

impl Trade {
    /// The fields shared by both variants.
    #[must_use]
    pub fn detail(&self) -> &TradeDetail {
        match self {
            Trade::History(t) => &t.detail,
            Trade::Query(t) => &t.detail,
        }
    }
}

/// Trades-history page keyed by trade transaction ID.
#[derive(Debug, Clone)]
pub struct TradesHistory {
    pub trades: HashMap<String, HistoryTrade>,
    pub count: u32,
}

impl TradesHistory {
    /// Decodes the `result` payload of a trades-history response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result.req_object("trades")?;
        let trades = obj
            .iter()
            .map(|(txid, entry)| Ok((txid.clone(), HistoryTrade::decode(entry)?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            trades,
            count: result.u32_or("count", 0),
        })
    }
}

/// Query-trades page keyed by trade transaction ID.
#[derive(Debug, Clone)]
pub struct QueryTrades {
    pub trades: HashMap<String, QueryTrade>,
}

impl QueryTrades {
    /// Decodes the `result` payload of a query-trades response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result
            .as_object()
            .ok_or_else(|| crate::error::KervielError::missing("result"))?;
        let trades = obj
            .iter()
            .map(|(txid, entry)| Ok((txid.clone(), QueryTrade::decode(entry)?)))
            .collect::<Result<_>>()?;
        Ok(Self { trades })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KervielError;
    use serde_json::json;

    fn fill() -> Value {
        json!({
            "ordertxid": "OQCLML-BW3P3-BUCMWZ",
            "postxid": "TKH2SE-M7IF5-CFI7LT",
            "pair": "XXBTZUSD",
            "time": 1688667796.8802,
            "type": "buy",
            "ordertype": "limit",
            "price": "30010.00000",
            "cost": "600.20000",
            "fee": "0.96032",
            "vol": "0.02000000",
            "margin": "0.00000",
            "misc": "",
            "trade_id": 93748276,
            "maker": true
        })
    }

    #[test]
    fn history_trade_decodes_common_and_extension_fields() {
        let trade = HistoryTrade::decode(&fill()).unwrap();
        assert_eq!(trade.detail.pair, "XXBTZUSD");
        assert_eq!(trade.detail.side, OrderSide::Buy);
        assert_eq!(trade.detail.price, 30010.0);
        assert_eq!(trade.trade_id, 93748276);
        assert!(trade.maker);
    }

    #[test]
    fn missing_trade_id_fails_loudly() {
        let mut v = fill();
        v.as_object_mut().unwrap().remove("trade_id");
        let err = HistoryTrade::decode(&v).unwrap_err();
        assert!(matches!(
            err,
            KervielError::MissingField { key } if key == "trade_id"
        ));
    }

    #[test]
    fn query_trade_requires_posstatus() {
        let mut v = fill();
        v["posstatus"] = json!("open");
        let trade = QueryTrade::decode(&v).unwrap();
        assert_eq!(trade.posstatus, "open");

        v.as_object_mut().unwrap().remove("posstatus");
        assert!(matches!(
            QueryTrade::decode(&v),
            Err(KervielError::MissingField { key }) if key == "posstatus"
        ));
    }

    #[test]
    fn history_page_carries_the_server_count() {
        let page = TradesHistory::decode(&json!({
            "trades": {"TXID1-AAAAA-AAAAAA": fill()},
            "count": 2346
        }))
        .unwrap();
        assert_eq!(page.count, 2346);
        assert_eq!(page.trades["TXID1-AAAAA-AAAAAA"].trade_id, 93748276);
    }
}
