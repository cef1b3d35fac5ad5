//! Tolerant field access over decoded JSON documents.
//!
//! Kraken's REST payloads are sparse: keys come and go between API
//! revisions, numbers arrive either as JSON numbers or as strings, and a
//! handful of fields have documented defaults. Every decoder in this crate
//! reads through [`Fields`] so that policy lives in one place:
//!
//! - `req_*` getters fail with [`KervielError::MissingField`] when the key
//!   is absent. A present but untypeable value is reported the same way —
//!   the required typed value is not there.
//! - `*_or` getters return the supplied default when the key is absent or
//!   mismatched, without error.
//!
//! The accessor is a read-only view; nothing here mutates the document.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{KervielError, Result};

/// Parse a JSON value (string or number) as `f64`.
pub(crate) fn lenient_f64(v: &Value) -> Option<f64> {
    match v {
        Value::String(s) => s.parse().ok(),
        _ => v.as_f64(),
    }
}

/// Parse a JSON value (string or number) as `i64`.
pub(crate) fn lenient_i64(v: &Value) -> Option<i64> {
    match v {
        Value::String(s) => s.parse().ok(),
        _ => v.as_i64(),
    }
}

/// Parse a JSON value (string or number) as [`Decimal`].
pub(crate) fn lenient_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Typed, tolerant getters keyed by field name.
pub trait Fields {
    /// Raw lookup; `None` when the receiver is not an object or lacks `key`.
    fn field(&self, key: &str) -> Option<&Value>;

    fn req_str(&self, key: &str) -> Result<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.field(key).and_then(Value::as_str).unwrap_or(default)
    }

    fn opt_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    fn req_i64(&self, key: &str) -> Result<i64> {
        self.field(key)
            .and_then(lenient_i64)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.field(key).and_then(lenient_i64).unwrap_or(default)
    }

    fn req_u32(&self, key: &str) -> Result<u32> {
        self.field(key)
            .and_then(lenient_i64)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| KervielError::missing(key))
    }

    fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.field(key)
            .and_then(lenient_i64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(default)
    }

    fn req_f64(&self, key: &str) -> Result<f64> {
        self.field(key)
            .and_then(lenient_f64)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.field(key).and_then(lenient_f64).unwrap_or(default)
    }

    fn req_bool(&self, key: &str) -> Result<bool> {
        self.field(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.field(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn req_decimal(&self, key: &str) -> Result<Decimal> {
        self.field(key)
            .and_then(lenient_decimal)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn decimal_or(&self, key: &str, default: Decimal) -> Decimal {
        self.field(key).and_then(lenient_decimal).unwrap_or(default)
    }

    fn req_object(&self, key: &str) -> Result<&Map<String, Value>> {
        self.field(key)
            .and_then(Value::as_object)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn opt_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.field(key).and_then(Value::as_object)
    }

    fn req_array(&self, key: &str) -> Result<&[Value]> {
        self.field(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| KervielError::missing(key))
    }

    fn opt_array(&self, key: &str) -> Option<&[Value]> {
        self.field(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Reads a closed-enumeration field.
    ///
    /// Absent key fails with [`KervielError::MissingField`]; a present
    /// string outside the enumeration fails with
    /// [`KervielError::UnknownEnumValue`] naming the field and raw value.
    fn req_enum<T>(&self, key: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
        let raw = self.req_str(key)?;
        parse(raw).ok_or_else(|| KervielError::unknown(key, raw))
    }

    /// Reads a closed-enumeration field with a default taken **on absence
    /// only**. A present value outside the enumeration still fails; the
    /// default never papers over a wrong value.
    fn enum_or_absent<T>(&self, key: &str, parse: fn(&str) -> Option<T>, default: T) -> Result<T> {
        match self.field(key).and_then(Value::as_str) {
            None => Ok(default),
            Some(raw) => parse(raw).ok_or_else(|| KervielError::unknown(key, raw)),
        }
    }
}

impl Fields for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Fields for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Checks a positional array against its expected arity.
///
/// Returns `Ok(None)` when the source is `null` or absent — the caller
/// substitutes its all-sentinel record — and
/// [`KervielError::MalformedTuple`] when the length disagrees.
pub(crate) fn tuple_slice<'a>(
    v: Option<&'a Value>,
    what: &'static str,
    arity: usize,
) -> Result<Option<&'a [Value]>> {
    let v = match v {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };
    let arr = v.as_array().ok_or(KervielError::MalformedTuple {
        what,
        expected: arity,
        actual: 0,
    })?;
    if arr.len() != arity {
        return Err(KervielError::MalformedTuple {
            what,
            expected: arity,
            actual: arr.len(),
        });
    }
    Ok(Some(arr.as_slice()))
}

/// Positional `f64` extraction for tuple decoders. An untypeable element
/// reads as a missing field named by tuple and index.
pub(crate) fn elem_f64(arr: &[Value], idx: usize, what: &'static str) -> Result<f64> {
    arr.get(idx)
        .and_then(lenient_f64)
        .ok_or_else(|| KervielError::missing(&format!("{what}[{idx}]")))
}

/// Positional `i64` extraction for tuple decoders.
pub(crate) fn elem_i64(arr: &[Value], idx: usize, what: &'static str) -> Result<i64> {
    arr.get(idx)
        .and_then(lenient_i64)
        .ok_or_else(|| KervielError::missing(&format!("{what}[{idx}]")))
}

/// Positional string extraction for tuple decoders.
pub(crate) fn elem_str<'a>(arr: &'a [Value], idx: usize) -> Option<&'a str> {
    arr.get(idx).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_getter_names_the_missing_key() {
        let doc = json!({"present": "yes"});
        let err = doc.req_str("absent").unwrap_err();
        assert!(matches!(
            err,
            KervielError::MissingField { key } if key == "absent"
        ));
    }

    #[test]
    fn defaulted_getter_survives_renamed_key() {
        let doc = json!({"new_name": 3.5});
        assert_eq!(doc.f64_or("old_name", -1.0), -1.0);
        assert_eq!(doc.f64_or("new_name", -1.0), 3.5);
    }

    #[test]
    fn numeric_getters_accept_string_encoding() {
        let doc = json!({"vol": "1.25", "count": "10"});
        assert_eq!(doc.req_f64("vol").unwrap(), 1.25);
        assert_eq!(doc.req_i64("count").unwrap(), 10);
    }

    #[test]
    fn wrong_type_without_default_reads_as_missing() {
        let doc = json!({"price": true});
        assert!(matches!(
            doc.req_f64("price"),
            Err(KervielError::MissingField { .. })
        ));
    }

    #[test]
    fn tuple_arity_mismatch_reports_lengths() {
        let v = json!([1, 2, 3]);
        let err = tuple_slice(Some(&v), "tick", 8).unwrap_err();
        assert!(matches!(
            err,
            KervielError::MalformedTuple { what: "tick", expected: 8, actual: 3 }
        ));
    }

    #[test]
    fn null_tuple_is_absent_not_an_error() {
        assert!(tuple_slice(Some(&Value::Null), "tick", 8).unwrap().is_none());
        assert!(tuple_slice(None, "tick", 8).unwrap().is_none());
    }
}
