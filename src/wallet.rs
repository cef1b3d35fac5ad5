//! In-memory account balance aggregate.
//!
//! A [`Wallet`] holds one [`BalanceAsset`] per asset identifier, decoded
//! from an account-balance response or maintained by the caller. The
//! non-negativity invariant is enforced at construction and at every
//! mutation; no operation spans more than one asset, so there is no
//! cross-asset atomicity to reason about.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::trace;

use crate::error::{KervielError, Result};
use crate::json::lenient_decimal;

/// A single asset's balance. `balance` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceAsset {
    pub asset: String,
    pub balance: Decimal,
}

impl BalanceAsset {
    /// Creates a balance record, rejecting negative amounts.
    pub fn new(asset: &str, balance: Decimal) -> Result<Self> {
        if balance < Decimal::ZERO {
            return Err(KervielError::NegativeBalance {
                asset: asset.to_string(),
                value: balance,
            });
        }
        Ok(Self {
            asset: asset.to_string(),
            balance,
        })
    }

    /// The zero-balance placeholder returned for unknown assets.
    #[must_use]
    pub fn zero(asset: &str) -> Self {
        Self {
            asset: asset.to_string(),
            balance: Decimal::ZERO,
        }
    }
}

/// Account balances keyed by asset identifier.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    assets: HashMap<String, BalanceAsset>,
}

impl Wallet {
    /// Creates an empty wallet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the `result` payload of an account-balance response.
    ///
    /// The payload is a flat asset→amount map with string-encoded numbers.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result
            .as_object()
            .ok_or_else(|| KervielError::missing("result"))?;
        let mut wallet = Self::new();
        for (asset, amount) in obj {
            let balance =
                lenient_decimal(amount).ok_or_else(|| KervielError::missing(asset))?;
            wallet.insert(asset, balance)?;
        }
        Ok(wallet)
    }

    /// Adds or overwrites an asset's balance.
    pub fn insert(&mut self, asset: &str, balance: Decimal) -> Result<()> {
        let entry = BalanceAsset::new(asset, balance)?;
        self.assets.insert(entry.asset.clone(), entry);
        Ok(())
    }

    /// Replaces an asset's balance in full (not a delta).
    pub fn refresh(&mut self, asset: &str, balance: Decimal) -> Result<()> {
        let entry = BalanceAsset::new(asset, balance)?;
        trace!(asset, %balance, "refreshed balance");
        self.assets.insert(entry.asset.clone(), entry);
        Ok(())
    }

    /// Removes an asset, returning its last record if it was present.
    pub fn remove(&mut self, asset: &str) -> Option<BalanceAsset> {
        self.assets.remove(asset)
    }

    /// Looks up an asset's balance.
    ///
    /// Unknown assets read as a zero-balance placeholder, never an error —
    /// callers treat "no record" and "empty balance" identically.
    #[must_use]
    pub fn get(&self, asset: &str) -> BalanceAsset {
        self.assets
            .get(asset)
            .cloned()
            .unwrap_or_else(|| BalanceAsset::zero(asset))
    }

    /// All balance records, in no particular order.
    pub fn list(&self) -> impl Iterator<Item = &BalanceAsset> {
        self.assets.values()
    }

    /// Sum of all balances, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.assets.values().map(|a| a.balance).sum()
    }

    /// Number of assets currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when no asset is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
