//! Staking decoders: stakeable-asset metadata and staking transactions.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::Fields;

/// One lock tier: how long funds are locked and the payout percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Lock {
    pub days: f64,
    pub percentage: f64,
}

impl Lock {
    /// Decodes one lock-tier object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            days: obj.req_f64("days")?,
            percentage: obj.req_f64("percentage")?,
        })
    }
}

/// Lock tiers grouped by lifecycle stage. Absent stages are empty lists.
#[derive(Debug, Clone, Default)]
pub struct LockSchedule {
    pub staking: Vec<Lock>,
    pub unstaking: Vec<Lock>,
    pub lockup: Vec<Lock>,
}

impl LockSchedule {
    /// Decodes the `lock` object; an absent object is an empty schedule.
    pub fn decode(obj: Option<&Value>) -> Result<Self> {
        let Some(obj) = obj else {
            return Ok(Self::default());
        };
        let tiers = |key: &str| -> Result<Vec<Lock>> {
            obj.opt_array(key)
                .unwrap_or_default()
                .iter()
                .map(Lock::decode)
                .collect()
        };
        Ok(Self {
            staking: tiers("staking")?,
            unstaking: tiers("unstaking")?,
            lockup: tiers("lockup")?,
        })
    }
}

/// Minimum stake/unstake amounts for an asset.
#[derive(Debug, Clone)]
pub struct MinimumAmount {
    pub staking: f64,
    pub unstaking: f64,
}

/// An asset that can be staked, with its method and reward metadata.
#[derive(Debug, Clone)]
pub struct StakeableAsset {
    /// Unique staking method name (e.g., `"xbt-staked"`).
    pub method: String,
    pub asset: String,
    /// The staked representation (e.g., `"XBT.M"`).
    pub staking_asset: String,
    /// Reward rate in percent.
    pub reward: f64,
    pub on_chain: bool,
    pub can_stake: bool,
    pub can_unstake: bool,
    pub minimum_amount: MinimumAmount,
    pub lock: LockSchedule,
    pub enabled_for_user: bool,
}

impl StakeableAsset {
    /// Decodes one stakeable-asset object.
    pub fn decode(obj: &Value) -> Result<Self> {
        let rewards = obj.opt_object("rewards");
        Ok(Self {
            method: obj.req_str("method")?.to_string(),
            asset: obj.req_str("asset")?.to_string(),
            staking_asset: obj.req_str("staking_asset")?.to_string(),
            reward: rewards.map_or(-1.0, |r| r.f64_or("reward", -1.0)),
            on_chain: obj.bool_or("on_chain", true),
            can_stake: obj.bool_or("can_stake", true),
            can_unstake: obj.bool_or("can_unstake", true),
            minimum_amount: match obj.opt_object("minimum_amount") {
                Some(min) => MinimumAmount {
                    staking: min.f64_or("staking", 0.0),
                    unstaking: min.f64_or("unstaking", 0.0),
                },
                None => MinimumAmount {
                    staking: 0.0,
                    unstaking: 0.0,
                },
            },
            lock: LockSchedule::decode(obj.field("lock"))?,
            enabled_for_user: obj.bool_or("enabled_for_user", true),
        })
    }

    /// Decodes the `result` payload of a stakeable-assets response (a list).
    pub fn decode_page(result: &Value) -> Result<Vec<Self>> {
        let arr = result
            .as_array()
            .ok_or_else(|| KervielError::missing("result"))?;
        arr.iter().map(Self::decode).collect()
    }
}

/// One staking bonding/unbonding transaction.
#[derive(Debug, Clone)]
pub struct StakingTransaction {
    pub method: String,
    pub aclass: String,
    pub asset: String,
    pub refid: String,
    pub amount: Decimal,
    pub fee: Decimal,
    /// Unix timestamp of the transaction.
    pub time: i64,
    /// Transaction state (e.g., `"Success"`, `"Initiated"`).
    pub status: String,
    /// `"bonding"` or `"unbonding"`.
    pub transaction_type: String,
    pub bond_start: Option<i64>,
    pub bond_end: Option<i64>,
}

impl StakingTransaction {
    /// Decodes one staking-transaction object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            method: obj.str_or("method", "").to_string(),
            aclass: obj.str_or("aclass", "currency").to_string(),
            asset: obj.req_str("asset")?.to_string(),
            refid: obj.req_str("refid")?.to_string(),
            amount: obj.req_decimal("amount")?,
            fee: obj.decimal_or("fee", Decimal::ZERO),
            time: obj.req_i64("time")?,
            status: obj.str_or("status", "").to_string(),
            transaction_type: obj.str_or("type", "").to_string(),
            bond_start: obj.field("bond_start").and_then(crate::json::lenient_i64),
            bond_end: obj.field("bond_end").and_then(crate::json::lenient_i64),
        })
    }

    /// Decodes the `result` payload of a staking-transactions response.
    pub fn decode_page(result: &Value) -> Result<Vec<Self>> {
        let arr = result
            .as_array()
            .ok_or_else(|| KervielError::missing("result"))?;
        arr.iter().map(Self::decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn stakeable() -> Value {
        json!({
            "method": "polkadot-staked",
            "asset": "DOT",
            "staking_asset": "DOT.S",
            "rewards": {"reward": "12.00", "type": "percentage"},
            "on_chain": true,
            "can_stake": true,
            "can_unstake": true,
            "minimum_amount": {"staking": "0.0000000100", "unstaking": "0.0000000100"},
            "lock": {
                "unstaking": [{"days": 7.0, "percentage": 0.25}],
                "staking": [],
                "lockup": [{"days": 28.0, "percentage": 0.0}]
            },
            "enabled_for_user": true
        })
    }

    #[test]
    fn stakeable_asset_assembles_lock_tiers() {
        let asset = StakeableAsset::decode(&stakeable()).unwrap();
        assert_eq!(asset.reward, 12.0);
        assert_eq!(asset.lock.unstaking, vec![Lock { days: 7.0, percentage: 0.25 }]);
        assert!(asset.lock.staking.is_empty());
        assert_eq!(asset.lock.lockup[0].days, 28.0);
        assert_eq!(asset.minimum_amount.staking, 0.00000001);
    }

    #[test]
    fn absent_lock_object_is_an_empty_schedule() {
        let mut v = stakeable();
        v.as_object_mut().unwrap().remove("lock");
        let asset = StakeableAsset::decode(&v).unwrap();
        assert!(asset.lock.staking.is_empty());
        assert!(asset.lock.unstaking.is_empty());
        assert!(asset.lock.lockup.is_empty());
    }

    #[test]
    fn staking_transaction_decodes_amounts_and_bond_window() {
        let tx = StakingTransaction::decode(&json!({
            "method": "xbt-staked",
            "aclass": "currency",
            "asset": "XBT.M",
            "refid": "RUSB7W6-ESIXUX-K62NI4",
            "amount": "0.0038634900",
            "fee": "0.0000000000",
            "time": 1688547900,
            "status": "Success",
            "type": "bonding",
            "bond_start": 1688547900,
            "bond_end": 1688719000
        }))
        .unwrap();
        assert_eq!(tx.amount, dec!(0.00386349));
        assert_eq!(tx.transaction_type, "bonding");
        assert_eq!(tx.bond_end, Some(1688719000));
    }
}
