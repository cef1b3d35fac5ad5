//! Crate-level error types.
//!
//! [`KervielError`] unifies every failure the decode and order-building
//! layers can produce behind a single enum so callers can match on the
//! variant they care about while still using the `?` operator for easy
//! propagation. All errors are raised synchronously to the immediate
//! caller; nothing is retried or suppressed internally.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KervielError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum KervielError {
    /// A required key was absent (or held a value of the wrong type) and
    /// no default was supplied.
    #[error("missing required field `{key}`")]
    MissingField { key: String },

    /// A positional array did not have the arity its record requires.
    #[error("malformed {what} tuple: expected {expected} elements, got {actual}")]
    MalformedTuple {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A value fell outside a closed wire enumeration.
    #[error("unknown value `{value}` for field `{field}`")]
    UnknownEnumValue { field: String, value: String },

    /// A wallet operation would have stored a negative balance.
    #[error("negative balance {value} rejected for asset `{asset}`")]
    NegativeBalance {
        asset: String,
        value: rust_decimal::Decimal,
    },

    /// An order-leg field was outside its domain constraints.
    #[error("invalid order parameter: {0}")]
    Validation(String),

    /// The response body was not parseable JSON at all.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KervielError {
    /// Shorthand for a [`KervielError::MissingField`] naming `key`.
    pub(crate) fn missing(key: &str) -> Self {
        Self::MissingField {
            key: key.to_string(),
        }
    }

    /// Shorthand for an [`KervielError::UnknownEnumValue`] on `field`.
    pub(crate) fn unknown(field: &str, value: &str) -> Self {
        Self::UnknownEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
