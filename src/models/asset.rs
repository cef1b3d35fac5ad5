//! Asset and asset-pair reference data decoders.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::Fields;
use crate::models::FeeTier;

/// Reference data for a single asset (currency).
#[derive(Debug, Clone)]
pub struct AssetInfo {
    /// Alternative name for the asset.
    pub altname: String,
    /// Asset class (e.g., `"currency"`).
    pub aclass: String,
    /// Scaling decimal places for record keeping.
    pub decimals: u32,
    /// Scaling decimal places for output display.
    pub display_decimals: u32,
}

impl AssetInfo {
    /// Decodes one asset object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            altname: obj.req_str("altname")?.to_string(),
            aclass: obj.str_or("aclass", "currency").to_string(),
            decimals: obj.req_u32("decimals")?,
            display_decimals: obj.req_u32("display_decimals")?,
        })
    }

    /// Decodes the `result` payload of an assets response, keyed by asset.
    pub fn decode_page(result: &Value) -> Result<HashMap<String, Self>> {
        let obj = result
            .as_object()
            .ok_or_else(|| KervielError::missing("result"))?;
        obj.iter()
            .map(|(asset, entry)| Ok((asset.clone(), Self::decode(entry)?)))
            .collect()
    }
}

/// Tradeable pair metadata, including its maker/taker fee schedules.
#[derive(Debug, Clone)]
pub struct AssetPair {
    pub altname: String,
    pub wsname: Option<String>,
    pub aclass_base: String,
    pub base: String,
    pub aclass_quote: String,
    pub quote: String,
    /// Price precision in decimal places.
    pub pair_decimals: u32,
    /// Volume precision in decimal places.
    pub lot_decimals: u32,
    pub lot_multiplier: u32,
    /// Margin amounts available when buying, smallest first.
    pub leverage_buy: Vec<u32>,
    /// Margin amounts available when selling, smallest first.
    pub leverage_sell: Vec<u32>,
    pub fees: Vec<FeeTier>,
    pub fees_maker: Vec<FeeTier>,
    pub fee_volume_currency: String,
    pub margin_call: u32,
    pub margin_stop: u32,
    /// Minimum order volume, `-1` when the API omits it.
    pub ordermin: f64,
}

impl AssetPair {
    /// Decodes one pair object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            altname: obj.req_str("altname")?.to_string(),
            wsname: obj.opt_str("wsname").map(str::to_string),
            aclass_base: obj.str_or("aclass_base", "currency").to_string(),
            base: obj.req_str("base")?.to_string(),
            aclass_quote: obj.str_or("aclass_quote", "currency").to_string(),
            quote: obj.req_str("quote")?.to_string(),
            pair_decimals: obj.req_u32("pair_decimals")?,
            lot_decimals: obj.req_u32("lot_decimals")?,
            lot_multiplier: obj.u32_or("lot_multiplier", 1),
            leverage_buy: leverage_list(obj, "leverage_buy"),
            leverage_sell: leverage_list(obj, "leverage_sell"),
            fees: fee_list(obj, "fees")?,
            fees_maker: fee_list(obj, "fees_maker")?,
            fee_volume_currency: obj.str_or("fee_volume_currency", "ZUSD").to_string(),
            margin_call: obj.u32_or("margin_call", 0),
            margin_stop: obj.u32_or("margin_stop", 0),
            ordermin: obj.f64_or("ordermin", -1.0),
        })
    }

    /// Decodes the `result` payload of an asset-pairs response.
    pub fn decode_page(result: &Value) -> Result<HashMap<String, Self>> {
        let obj = result
            .as_object()
            .ok_or_else(|| KervielError::missing("result"))?;
        obj.iter()
            .map(|(pair, entry)| Ok((pair.clone(), Self::decode(entry)?)))
            .collect()
    }
}

/// Assembles a leverage array; an absent sub-array yields an empty list.
fn leverage_list(obj: &Value, key: &str) -> Vec<u32> {
    obj.opt_array(key)
        .unwrap_or_default()
        .iter()
        .filter_map(|v| crate::json::lenient_i64(v))
        .filter_map(|n| u32::try_from(n).ok())
        .collect()
}

/// Assembles a fee-tier list; an absent sub-array yields an empty list.
fn fee_list(obj: &Value, key: &str) -> Result<Vec<FeeTier>> {
    obj.opt_array(key)
        .unwrap_or_default()
        .iter()
        .map(FeeTier::decode)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair() -> Value {
        json!({
            "altname": "XBTUSD",
            "wsname": "XBT/USD",
            "aclass_base": "currency",
            "base": "XXBT",
            "aclass_quote": "currency",
            "quote": "ZUSD",
            "pair_decimals": 1,
            "lot_decimals": 8,
            "lot_multiplier": 1,
            "leverage_buy": [2, 3, 4, 5],
            "leverage_sell": [2, 3, 4, 5],
            "fees": [
                {"fee": 0.26, "min_fee": 0.1, "max_fee": 0.26, "next_fee": 0.24,
                 "next_volume": 50000.0, "tier_volume": 0.0}
            ],
            "fees_maker": [
                {"fee": 0.16, "minfee": 0.0, "maxfee": 0.16, "nextfee": 0.14,
                 "nextvolume": 50000.0, "tiervolume": 0.0}
            ],
            "fee_volume_currency": "ZUSD",
            "margin_call": 80,
            "margin_stop": 40,
            "ordermin": "0.0001"
        })
    }

    #[test]
    fn pair_decodes_nested_lists() {
        let pair = AssetPair::decode(&pair()).unwrap();
        assert_eq!(pair.leverage_buy, vec![2, 3, 4, 5]);
        assert_eq!(pair.fees.len(), 1);
        assert_eq!(pair.fees[0].fee, 0.26);
        // maker tiers arrived under the concatenated convention
        assert_eq!(pair.fees_maker[0].next_fee, 0.14);
        assert_eq!(pair.ordermin, 0.0001);
    }

    #[test]
    fn absent_sub_arrays_yield_empty_lists() {
        let pair = AssetPair::decode(&json!({
            "altname": "XBTUSD", "base": "XXBT", "quote": "ZUSD",
            "pair_decimals": 1, "lot_decimals": 8
        }))
        .unwrap();
        assert!(pair.leverage_buy.is_empty());
        assert!(pair.fees.is_empty());
        assert!(pair.wsname.is_none());
        assert_eq!(pair.ordermin, -1.0);
    }

    #[test]
    fn asset_page_is_keyed_by_asset() {
        let page = AssetInfo::decode_page(&json!({
            "XXBT": {"altname": "XBT", "aclass": "currency",
                     "decimals": 10, "display_decimals": 5}
        }))
        .unwrap();
        assert_eq!(page["XXBT"].altname, "XBT");
        assert_eq!(page["XXBT"].display_decimals, 5);
    }
}
