//! Ledger entry decoders.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::Result;
use crate::json::Fields;
use crate::models::LedgerType;

/// One ledger entry (a balance-affecting event).
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    /// Reference ID of the originating event.
    pub refid: String,
    /// Unix timestamp with fractional seconds.
    pub time: f64,
    /// Defaults to `all` when the API omits the field.
    pub ledger_type: LedgerType,
    pub subtype: Option<String>,
    pub aclass: String,
    pub asset: String,
    pub amount: Decimal,
    pub fee: Decimal,
    /// Resulting balance after this entry.
    pub balance: Decimal,
}

impl LedgerEntry {
    /// Decodes one ledger object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            refid: obj.req_str("refid")?.to_string(),
            time: obj.req_f64("time")?,
            ledger_type: obj.enum_or_absent("type", LedgerType::from_wire, LedgerType::All)?,
            subtype: obj
                .opt_str("subtype")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            aclass: obj.str_or("aclass", "currency").to_string(),
            asset: obj.req_str("asset")?.to_string(),
            amount: obj.req_decimal("amount")?,
            fee: obj.req_decimal("fee")?,
            balance: obj.req_decimal("balance")?,
        })
    }
}

/// Ledger page keyed by ledger ID, with the server-side total.
#[derive(Debug, Clone)]
pub struct LedgersInfo {
    pub ledger: HashMap<String, LedgerEntry>,
    pub count: u32,
}

impl LedgersInfo {
    /// Decodes the `result` payload of a ledgers response.
    pub fn decode(result: &Value) -> Result<Self> {
        let obj = result.req_object("ledger")?;
        let ledger = obj
            .iter()
            .map(|(id, entry)| Ok((id.clone(), LedgerEntry::decode(entry)?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            ledger,
            count: result.u32_or("count", 0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KervielError;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn entry() -> Value {
        json!({
            "refid": "TSLfxhB-REFID-ABCDEF",
            "time": 1688464484.1787,
            "type": "trade",
            "subtype": "",
            "aclass": "currency",
            "asset": "ZUSD",
            "amount": "-600.20000",
            "fee": "0.96032",
            "balance": "9399.43968"
        })
    }

    #[test]
    fn ledger_entry_decodes_decimal_amounts() {
        let entry = LedgerEntry::decode(&entry()).unwrap();
        assert_eq!(entry.ledger_type, LedgerType::Trade);
        assert_eq!(entry.amount, dec!(-600.2));
        assert_eq!(entry.balance, dec!(9399.43968));
        assert!(entry.subtype.is_none());
    }

    #[test]
    fn absent_type_defaults_to_all_but_unknown_fails() {
        let mut v = entry();
        v.as_object_mut().unwrap().remove("type");
        assert_eq!(
            LedgerEntry::decode(&v).unwrap().ledger_type,
            LedgerType::All
        );

        v["type"] = json!("airdrop");
        assert!(matches!(
            LedgerEntry::decode(&v),
            Err(KervielError::UnknownEnumValue { field, value })
                if field == "type" && value == "airdrop"
        ));
    }

    #[test]
    fn page_is_keyed_by_ledger_id() {
        let page = LedgersInfo::decode(&json!({
            "ledger": {"L4UESK-KG3EQ-UFO4T5": entry()},
            "count": 1
        }))
        .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.ledger["L4UESK-KG3EQ-UFO4T5"].asset, "ZUSD");
    }
}
