//! Ticker snapshot decoders.
//!
//! A ticker entry packs today/rolling-24h statistics into short positional
//! arrays keyed by single-letter field names.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::{Fields, elem_f64, elem_i64, tuple_slice};

/// Best ask/bid level: `[price, lotVolume, wholeLotVolume]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerLevel {
    pub price: f64,
    pub lot_volume: f64,
    pub whole_lot_volume: f64,
}

impl TickerLevel {
    const ARITY: usize = 3;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            price: -1.0,
            lot_volume: -1.0,
            whole_lot_volume: -1.0,
        }
    }

    /// Decodes one level; `null` yields [`TickerLevel::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "ticker level", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            price: elem_f64(arr, 0, "ticker level")?,
            lot_volume: elem_f64(arr, 1, "ticker level")?,
            whole_lot_volume: elem_f64(arr, 2, "ticker level")?,
        })
    }
}

/// A `[today, last24h]` statistic pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerPair {
    pub today: f64,
    pub last_24h: f64,
}

impl TickerPair {
    const ARITY: usize = 2;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            today: -1.0,
            last_24h: -1.0,
        }
    }

    /// Decodes one pair; `null` yields [`TickerPair::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "ticker pair", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            today: elem_f64(arr, 0, "ticker pair")?,
            last_24h: elem_f64(arr, 1, "ticker pair")?,
        })
    }
}

/// Trade counts `[today, last24h]`, the only integer statistic pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerCount {
    pub today: i64,
    pub last_24h: i64,
}

impl TickerCount {
    const ARITY: usize = 2;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            today: -1,
            last_24h: -1,
        }
    }

    /// Decodes one count pair; `null` yields [`TickerCount::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "ticker count", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            today: elem_i64(arr, 0, "ticker count")?,
            last_24h: elem_i64(arr, 1, "ticker count")?,
        })
    }
}

/// Ticker statistics for a single pair.
#[derive(Debug, Clone)]
pub struct Ticker {
    pub ask: TickerLevel,
    pub bid: TickerLevel,
    /// Last closed trade: `[price, lot volume]`.
    pub last_closed: TickerPair,
    pub volume: TickerPair,
    pub vwap: TickerPair,
    pub trades: TickerCount,
    pub low: TickerPair,
    pub high: TickerPair,
    /// Today's opening price.
    pub open: f64,
}

impl Ticker {
    /// Decodes one pair's ticker object.
    pub fn decode(obj: &Value) -> Result<Self> {
        let part = |key: &str| obj.field(key).unwrap_or(&Value::Null);
        Ok(Self {
            ask: TickerLevel::decode(part("a"))?,
            bid: TickerLevel::decode(part("b"))?,
            last_closed: TickerPair::decode(part("c"))?,
            volume: TickerPair::decode(part("v"))?,
            vwap: TickerPair::decode(part("p"))?,
            trades: TickerCount::decode(part("t"))?,
            low: TickerPair::decode(part("l"))?,
            high: TickerPair::decode(part("h"))?,
            open: obj.f64_or("o", -1.0),
        })
    }
}

/// Ticker snapshots keyed by pair name.
#[derive(Debug, Clone)]
pub struct TickerInformation {
    pub pairs: HashMap<String, Ticker>,
}

impl TickerInformation {
    /// Decodes the `result` payload of a ticker response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result
            .as_object()
            .ok_or_else(|| KervielError::missing("result"))?;
        let mut pairs = HashMap::with_capacity(obj.len());
        for (symbol, entry) in obj {
            pairs.insert(symbol.clone(), Ticker::decode(entry)?);
        }
        Ok(Self { pairs })
    }

    /// Looks up one pair's ticker.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Ticker> {
        self.pairs.get(symbol)
    }
}
