//! Public market-data decoders: positional tuple records and the
//! cursor-paged series responses built from them.
//!
//! The REST API encodes market data as fixed-arity JSON arrays whose
//! meaning is purely positional. A `null` or absent source array decodes to
//! an all-sentinel record (numeric fields `-1`, string fields `None`) —
//! callers test for the sentinel instead of catching errors, so the policy
//! is part of the wire contract. A wrong arity is always an error.

use serde_json::Value;
use tracing::trace;

use crate::error::{KervielError, Result};
use crate::json::{Fields, elem_f64, elem_i64, elem_str, lenient_i64, tuple_slice};

/// One OHLC tick: `[time, open, high, low, close, vwap, volume, count]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickData {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub vwap: f64,
    pub volume: f64,
    pub count: i64,
}

impl TickData {
    const ARITY: usize = 8;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            time: -1,
            open: -1.0,
            high: -1.0,
            low: -1.0,
            close: -1.0,
            vwap: -1.0,
            volume: -1.0,
            count: -1,
        }
    }

    /// Decodes one tick array; `null` yields [`TickData::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "tick", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            time: elem_i64(arr, 0, "tick")?,
            open: elem_f64(arr, 1, "tick")?,
            high: elem_f64(arr, 2, "tick")?,
            low: elem_f64(arr, 3, "tick")?,
            close: elem_f64(arr, 4, "tick")?,
            vwap: elem_f64(arr, 5, "tick")?,
            volume: elem_f64(arr, 6, "tick")?,
            count: elem_i64(arr, 7, "tick")?,
        })
    }
}

/// One order-book level: `[price, volume, timestamp]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookElement {
    pub price: f64,
    pub volume: f64,
    pub timestamp: i64,
}

impl BookElement {
    const ARITY: usize = 3;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            price: -1.0,
            volume: -1.0,
            timestamp: -1,
        }
    }

    /// Decodes one book level; `null` yields [`BookElement::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "book level", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            price: elem_f64(arr, 0, "book level")?,
            volume: elem_f64(arr, 1, "book level")?,
            timestamp: elem_i64(arr, 2, "book level")?,
        })
    }
}

/// One executed public trade: `[price, volume, time, side, type, misc]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTrade {
    pub price: f64,
    pub volume: f64,
    pub time: f64,
    /// `"b"` (buy) or `"s"` (sell) on the wire.
    pub side: Option<String>,
    /// `"m"` (market) or `"l"` (limit) on the wire.
    pub order_type: Option<String>,
    pub misc: Option<String>,
}

impl RecentTrade {
    const ARITY: usize = 6;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            price: -1.0,
            volume: -1.0,
            time: -1.0,
            side: None,
            order_type: None,
            misc: None,
        }
    }

    /// Decodes one trade array; `null` yields [`RecentTrade::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "recent trade", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            price: elem_f64(arr, 0, "recent trade")?,
            volume: elem_f64(arr, 1, "recent trade")?,
            time: elem_f64(arr, 2, "recent trade")?,
            side: elem_str(arr, 3).map(str::to_string),
            order_type: elem_str(arr, 4).map(str::to_string),
            misc: elem_str(arr, 5).map(str::to_string),
        })
    }
}

/// One spread observation: `[bid, ask, timestamp]`.
///
/// The timestamp sits at index 2 here, unlike the other time-led tuples.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub bid: f64,
    pub ask: f64,
    pub timestamp: i64,
}

impl Spread {
    const ARITY: usize = 3;

    /// The all-sentinel record substituted for a `null` source array.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            bid: -1.0,
            ask: -1.0,
            timestamp: -1,
        }
    }

    /// Decodes one spread array; `null` yields [`Spread::sentinel`].
    pub fn decode(v: &Value) -> Result<Self> {
        let Some(arr) = tuple_slice(Some(v), "spread", Self::ARITY)? else {
            return Ok(Self::sentinel());
        };
        Ok(Self {
            bid: elem_f64(arr, 0, "spread")?,
            ask: elem_f64(arr, 1, "spread")?,
            timestamp: elem_i64(arr, 2, "spread")?,
        })
    }
}

/// Splits a cursor-paged result into `(symbol, last, series)`.
///
/// The page object carries exactly two keys — the traded symbol mapping to
/// the data series and a numeric `last` cursor — but the API does not fix
/// their relative order. The first key is read as the cursor and the second
/// as the series; on a type mismatch the interpretation is swapped and
/// retried. Both attempts failing means no numeric cursor exists.
fn split_cursor_page<'a>(result: &'a Value) -> Result<(String, i64, &'a [Value])> {
    let obj = result
        .as_object()
        .filter(|o| o.len() == 2)
        .ok_or_else(|| KervielError::missing("last"))?;
    let mut entries = obj.iter();
    let (Some((k0, v0)), Some((k1, v1))) = (entries.next(), entries.next()) else {
        return Err(KervielError::missing("last"));
    };

    if let (Some(last), Some(series)) = (lenient_i64(v0), v1.as_array()) {
        return Ok((k1.clone(), last, series.as_slice()));
    }
    trace!(first = %k0, "cursor probe swapped key interpretation");
    if let (Some(last), Some(series)) = (lenient_i64(v1), v0.as_array()) {
        return Ok((k0.clone(), last, series.as_slice()));
    }
    Err(KervielError::missing("last"))
}

/// One page of OHLC ticks for a single symbol.
#[derive(Debug, Clone)]
pub struct OhlcPage {
    pub symbol: String,
    /// Cursor to pass as `since` on the next request.
    pub last: i64,
    pub ticks: Vec<TickData>,
}

impl OhlcPage {
    /// Decodes the `result` payload of an OHLC response.
    pub fn decode(result: &Value) -> Result<Self> {
        let (symbol, last, series) = split_cursor_page(result)?;
        let ticks = series.iter().map(TickData::decode).collect::<Result<_>>()?;
        Ok(Self {
            symbol,
            last,
            ticks,
        })
    }
}

/// One page of spread observations for a single symbol.
#[derive(Debug, Clone)]
pub struct SpreadPage {
    pub symbol: String,
    pub last: i64,
    pub spreads: Vec<Spread>,
}

impl SpreadPage {
    /// Decodes the `result` payload of a spreads response.
    pub fn decode(result: &Value) -> Result<Self> {
        let (symbol, last, series) = split_cursor_page(result)?;
        let spreads = series.iter().map(Spread::decode).collect::<Result<_>>()?;
        Ok(Self {
            symbol,
            last,
            spreads,
        })
    }
}

/// One page of recent public trades for a single symbol.
#[derive(Debug, Clone)]
pub struct RecentTradePage {
    pub symbol: String,
    pub last: i64,
    pub trades: Vec<RecentTrade>,
}

impl RecentTradePage {
    /// Decodes the `result` payload of a recent-trades response.
    pub fn decode(result: &Value) -> Result<Self> {
        let (symbol, last, series) = split_cursor_page(result)?;
        let trades = series
            .iter()
            .map(RecentTrade::decode)
            .collect::<Result<_>>()?;
        Ok(Self {
            symbol,
            last,
            trades,
        })
    }
}

/// Full order book for a single symbol.
#[derive(Debug, Clone)]
pub struct Depth {
    pub symbol: String,
    pub asks: Vec<BookElement>,
    pub bids: Vec<BookElement>,
}

impl Depth {
    /// Decodes the `result` payload of a depth response (one symbol key).
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result
            .as_object()
            .and_then(|o| o.iter().next())
            .ok_or_else(|| KervielError::missing("result"))?;
        let (symbol, book) = obj;
        let levels = |key: &str| -> Result<Vec<BookElement>> {
            book.opt_array(key)
                .unwrap_or_default()
                .iter()
                .map(BookElement::decode)
                .collect()
        };
        Ok(Self {
            symbol: symbol.clone(),
            asks: levels("asks")?,
            bids: levels("bids")?,
        })
    }
}
