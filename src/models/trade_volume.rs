//! 30-day trade volume and fee-schedule decoders.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::Fields;
use crate::models::FeeTier;

/// Rolling 30-day volume plus the caller's current fee tiers per pair.
#[derive(Debug, Clone)]
pub struct TradeVolume {
    /// Currency the volume is denominated in.
    pub currency: String,
    pub volume: f64,
    /// Taker fee tier per requested pair. Empty when none were requested.
    pub fees: HashMap<String, FeeTier>,
    /// Maker fee tier per requested pair. Empty when none were requested.
    pub fees_maker: HashMap<String, FeeTier>,
}

impl TradeVolume {
    /// Decodes the `result` payload of a trade-volume response.
    pub fn decode(result: &Value) -> Result<Self> {
        if !result.is_object() {
            return Err(KervielError::missing("result"));
        }
        Ok(Self {
            currency: result.str_or("currency", "ZUSD").to_string(),
            volume: result.req_f64("volume")?,
            fees: fee_map(result, "fees")?,
            fees_maker: fee_map(result, "fees_maker")?,
        })
    }
}

/// Assembles a pair→tier map; an absent map yields an empty one.
fn fee_map(result: &Value, key: &str) -> Result<HashMap<String, FeeTier>> {
    let Some(obj) = result.opt_object(key) else {
        return Ok(HashMap::new());
    };
    obj.iter()
        .map(|(pair, tier)| Ok((pair.clone(), FeeTier::decode(tier)?)))
        .collect()
}
