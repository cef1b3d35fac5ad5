//! Open/closed order decoders.
//!
//! A closed order is an open order plus closure metadata, so the common
//! field set is decoded once and extended, rather than duplicated.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::Fields;
use crate::models::{OrderSide, OrderStatus, OrderType};

/// Human-oriented order description nested under `descr`.
#[derive(Debug, Clone)]
pub struct OrderDescription {
    pub pair: String,
    pub side: OrderSide,
    pub ordertype: OrderType,
    /// Primary price.
    pub price: f64,
    /// Secondary price.
    pub price2: f64,
    pub leverage: String,
    /// Rendered order sentence (e.g., `"buy 1.00000000 XBTUSD @ limit 20000.0"`).
    pub order: String,
    /// Conditional close sentence, when one was attached.
    pub close: Option<String>,
}

impl OrderDescription {
    /// Decodes the `descr` object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            pair: obj.req_str("pair")?.to_string(),
            side: obj.req_enum("type", OrderSide::from_wire)?,
            ordertype: obj.req_enum("ordertype", OrderType::from_wire)?,
            price: obj.f64_or("price", -1.0),
            price2: obj.f64_or("price2", -1.0),
            leverage: obj.str_or("leverage", "none").to_string(),
            order: obj.str_or("order", "").to_string(),
            close: obj.opt_str("close").map(str::to_string),
        })
    }
}

/// An order as returned by the open-orders and query-orders endpoints.
#[derive(Debug, Clone)]
pub struct Order {
    /// Referral order transaction ID.
    pub refid: Option<String>,
    /// User reference ID.
    pub userref: Option<i64>,
    /// Defaults to `open` when the API omits the field.
    pub status: OrderStatus,
    /// Unix timestamp of when the order was placed.
    pub opentm: f64,
    pub starttm: f64,
    pub expiretm: f64,
    pub descr: OrderDescription,
    pub vol: f64,
    pub vol_exec: f64,
    pub cost: f64,
    pub fee: f64,
    /// Average fill price.
    pub price: f64,
    pub stopprice: f64,
    pub limitprice: f64,
    pub misc: String,
    pub oflags: String,
    /// Trade IDs related to this order.
    pub trades: Vec<String>,
}

impl Order {
    /// Decodes one order object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            refid: obj.opt_str("refid").map(str::to_string),
            userref: obj.field("userref").and_then(crate::json::lenient_i64),
            status: obj.enum_or_absent("status", OrderStatus::from_wire, OrderStatus::Open)?,
            opentm: obj.req_f64("opentm")?,
            starttm: obj.f64_or("starttm", 0.0),
            expiretm: obj.f64_or("expiretm", 0.0),
            descr: OrderDescription::decode(
                obj.field("descr").ok_or_else(|| KervielError::missing("descr"))?,
            )?,
            vol: obj.req_f64("vol")?,
            vol_exec: obj.f64_or("vol_exec", 0.0),
            cost: obj.f64_or("cost", 0.0),
            fee: obj.f64_or("fee", 0.0),
            price: obj.f64_or("price", 0.0),
            stopprice: obj.f64_or("stopprice", 0.0),
            limitprice: obj.f64_or("limitprice", 0.0),
            misc: obj.str_or("misc", "").to_string(),
            oflags: obj.str_or("oflags", "").to_string(),
            trades: obj
                .opt_array("trades")
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        })
    }
}

/// An order that has left the book: the open-order record plus closure
/// metadata.
#[derive(Debug, Clone)]
pub struct ClosedOrder {
    pub order: Order,
    /// Unix timestamp of when the order was closed.
    pub closetm: f64,
    pub reason: Option<String>,
}

impl ClosedOrder {
    /// Decodes one closed-order object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            order: Order::decode(obj)?,
            closetm: obj.req_f64("closetm")?,
            reason: obj
                .field("reason")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Open orders keyed by transaction ID.
#[derive(Debug, Clone)]
pub struct OpenOrders {
    pub open: HashMap<String, Order>,
}

impl OpenOrders {
    /// Decodes the `result` payload of an open-orders response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result.req_object("open")?;
        let open = obj
            .iter()
            .map(|(txid, entry)| Ok((txid.clone(), Order::decode(entry)?)))
            .collect::<Result<_>>()?;
        Ok(Self { open })
    }
}

/// Closed orders keyed by transaction ID, with the server-side total.
#[derive(Debug, Clone)]
pub struct ClosedOrders {
    pub closed: HashMap<String, ClosedOrder>,
    pub count: u32,
}

impl ClosedOrders {
    /// Decodes the `result` payload of a closed-orders response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result.req_object("closed")?;
        let closed = obj
            .iter()
            .map(|(txid, entry)| Ok((txid.clone(), ClosedOrder::decode(entry)?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            closed,
            count: result.u32_or("count", 0),
        })
    }
}
