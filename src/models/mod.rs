//! Shared models for Kraken REST responses.
//!
//! Contains the error/result response envelope, the closed wire
//! enumerations used by both the decoders and the order builder, and the
//! dual-keyed fee tier shared by asset pairs and trade volume.

pub mod asset;
pub mod ledger;
pub mod market;
pub mod orders;
pub mod report;
pub mod staking;
pub mod ticker;
pub mod trade_volume;
pub mod trades;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::json::Fields;

/// Envelope every REST response arrives in: an `error` array plus a
/// `result` payload.
///
/// A non-empty `errors` list marks an API-level failure; `result` may then
/// be absent entirely. [`KrakenResponse::result_or_null`] hands decoders a
/// `null` in that case so the tuple sentinel policy applies instead of a
/// panic or a spurious decode error.
#[derive(Debug, Clone)]
pub struct KrakenResponse {
    pub errors: Vec<String>,
    pub result: Option<Value>,
}

impl KrakenResponse {
    /// Parses the raw response body supplied by the transport collaborator.
    pub fn decode(body: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(body)?;
        let errors = doc
            .opt_array("error")
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let result = doc.field("result").filter(|v| !v.is_null()).cloned();
        Ok(Self { errors, result })
    }

    /// True when the API reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The result payload, or `null` when absent (error responses).
    #[must_use]
    pub fn result_or_null(&self) -> &Value {
        self.result.as_ref().unwrap_or(&Value::Null)
    }
}

/// Result of the public server-time endpoint.
#[derive(Debug, Clone)]
pub struct ServerTime {
    /// Unix timestamp (seconds since epoch).
    pub unixtime: i64,
    /// RFC 1123 rendering of the same instant.
    pub rfc1123: Option<String>,
}

impl ServerTime {
    /// Decodes the `result` payload of a server-time response.
    pub fn decode(result: &Value) -> Result<Self> {
        Ok(Self {
            unixtime: result.req_i64("unixtime")?,
            rfc1123: result.opt_str("rfc1123").map(str::to_string),
        })
    }
}

/// Result of the public system-status endpoint.
#[derive(Debug, Clone)]
pub struct SystemStatus {
    /// Trading system state (e.g., `"online"`, `"maintenance"`).
    pub status: String,
    /// Time the status was current (e.g., `2021-01-20T20:39:22Z`).
    pub timestamp: String,
}

impl SystemStatus {
    /// Decodes the `result` payload of a system-status response.
    pub fn decode(result: &Value) -> Result<Self> {
        Ok(Self {
            status: result.req_str("status")?.to_string(),
            timestamp: result.str_or("timestamp", "").to_string(),
        })
    }
}

/// Order side (buy or sell). Wire name: `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the wire-format spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }

    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "buy" => Some(OrderSide::Buy),
            "sell" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// Order execution type. Wire name: `ordertype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    TakeProfit,
    StopLossLimit,
    TakeProfitLimit,
    SettlePosition,
}

impl OrderType {
    /// Returns the wire-format spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::StopLoss => "stop-loss",
            OrderType::TakeProfit => "take-profit",
            OrderType::StopLossLimit => "stop-loss-limit",
            OrderType::TakeProfitLimit => "take-profit-limit",
            OrderType::SettlePosition => "settle-position",
        }
    }

    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "market" => Some(OrderType::Market),
            "limit" => Some(OrderType::Limit),
            "stop-loss" => Some(OrderType::StopLoss),
            "take-profit" => Some(OrderType::TakeProfit),
            "stop-loss-limit" => Some(OrderType::StopLossLimit),
            "take-profit-limit" => Some(OrderType::TakeProfitLimit),
            "settle-position" => Some(OrderType::SettlePosition),
            _ => None,
        }
    }
}

/// Lifecycle status of an order. Absent fields default to `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Open,
    Closed,
    Canceled,
    Expired,
}

impl OrderStatus {
    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(OrderStatus::Pending),
            "open" => Some(OrderStatus::Open),
            "closed" => Some(OrderStatus::Closed),
            "canceled" => Some(OrderStatus::Canceled),
            "expired" => Some(OrderStatus::Expired),
            _ => None,
        }
    }
}

/// Price feed that activates a conditional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Last traded price.
    Last,
    /// Index price.
    Index,
}

impl Trigger {
    /// Returns the wire-format spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Last => "last",
            Trigger::Index => "index",
        }
    }

    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "last" => Some(Trigger::Last),
            "index" => Some(Trigger::Index),
            _ => None,
        }
    }
}

/// One-character prefix describing how a secondary price relates to the
/// primary price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetMarker {
    /// Add the offset to the reference price.
    Plus,
    /// Subtract the offset from the reference price.
    Minus,
    /// Use the value as an absolute price.
    Absolute,
    /// Interpret the offset as a percentage.
    Percent,
}

impl OffsetMarker {
    /// Returns the wire character.
    #[must_use]
    pub fn as_char(&self) -> char {
        match self {
            OffsetMarker::Plus => '+',
            OffsetMarker::Minus => '-',
            OffsetMarker::Absolute => '#',
            OffsetMarker::Percent => '%',
        }
    }

    /// Parses the wire character; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "+" => Some(OffsetMarker::Plus),
            "-" => Some(OffsetMarker::Minus),
            "#" => Some(OffsetMarker::Absolute),
            "%" => Some(OffsetMarker::Percent),
            _ => None,
        }
    }
}

/// Ledger entry classification. Absent fields default to `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    All,
    Deposit,
    Withdrawal,
    Trade,
    Margin,
    Rollover,
    Credit,
    Transfer,
    Settled,
    Staking,
    Sale,
}

impl LedgerType {
    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(LedgerType::All),
            "deposit" => Some(LedgerType::Deposit),
            "withdrawal" => Some(LedgerType::Withdrawal),
            "trade" => Some(LedgerType::Trade),
            "margin" => Some(LedgerType::Margin),
            "rollover" => Some(LedgerType::Rollover),
            "credit" => Some(LedgerType::Credit),
            "transfer" => Some(LedgerType::Transfer),
            "settled" => Some(LedgerType::Settled),
            "staking" => Some(LedgerType::Staking),
            "sale" => Some(LedgerType::Sale),
            _ => None,
        }
    }
}

/// Export report file format. Absent fields default to `CSV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportFormat {
    Csv,
    Tsv,
}

impl ReportFormat {
    /// Parses the wire spelling; `None` outside the enumeration.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "CSV" => Some(ReportFormat::Csv),
            "TSV" => Some(ReportFormat::Tsv),
            _ => None,
        }
    }
}

/// Underscored fee field names, probed first.
const FEE_KEYS: [&str; 5] = ["min_fee", "max_fee", "next_fee", "next_volume", "tier_volume"];

/// Concatenated fallback spellings for the same five fields.
const FEE_KEYS_COMPACT: [&str; 5] = ["minfee", "maxfee", "nextfee", "nextvolume", "tiervolume"];

/// One fee tier, as nested in asset pairs and trade-volume responses.
///
/// The API emits the five tier fields under either underscored or
/// concatenated names. The underscored set is probed first; when its first
/// key is absent the concatenated set is used for **all** sibling fields of
/// that object. Resolution is per call — no shared key table survives the
/// decode, so concurrent decodes of differently-shaped payloads cannot
/// observe each other.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeTier {
    pub fee: f64,
    pub min_fee: f64,
    pub max_fee: f64,
    pub next_fee: f64,
    pub next_volume: f64,
    pub tier_volume: f64,
}

impl FeeTier {
    /// Decodes one fee object, resolving the key convention first.
    pub fn decode(obj: &Value) -> Result<Self> {
        let keys = if obj.field(FEE_KEYS[0]).is_some() {
            &FEE_KEYS
        } else {
            debug!("fee object uses concatenated key names");
            &FEE_KEYS_COMPACT
        };
        Ok(Self {
            fee: obj.req_f64("fee")?,
            min_fee: obj.f64_or(keys[0], -1.0),
            max_fee: obj.f64_or(keys[1], -1.0),
            next_fee: obj.f64_or(keys[2], -1.0),
            next_volume: obj.f64_or(keys[3], -1.0),
            tier_volume: obj.f64_or(keys[4], -1.0),
        })
    }
}
