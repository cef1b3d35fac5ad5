//! Wire-safe number rendering.
//!
//! The REST API rejects scientific notation, so every amount leaving this
//! crate goes through one of these helpers. Volumes additionally use a
//! fixed 8-decimal rendering to match the exchange's lot precision.

/// Number of decimal places used when rendering order volumes.
pub const VOLUME_DECIMALS: usize = 8;

/// Renders a value without scientific notation.
///
/// Integral values keep a trailing `.0` (`18900.0`, not `18900`) so the
/// output is unambiguous as a decimal on the wire.
pub fn plain(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        // Display formatting for f64 never produces an exponent.
        format!("{value}")
    }
}

/// Renders a value with exactly `decimals` fractional digits.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Renders an order volume in the exchange's fixed 8-decimal form.
pub fn volume(value: f64) -> String {
    fixed(value, VOLUME_DECIMALS)
}

/// Rounds a decoded value to `decimals` places for presentation.
///
/// Callers hold the full-precision value; this never mutates stored state.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_fixed_eight_decimals() {
        assert_eq!(volume(1.0), "1.00000000");
        assert_eq!(volume(0.001), "0.00100000");
    }

    #[test]
    fn plain_never_uses_an_exponent() {
        assert_eq!(plain(18900.0), "18900.0");
        assert_eq!(plain(150.5), "150.5");
        assert_eq!(plain(0.00000001), "0.00000001");
        assert!(!plain(1e21).contains('e'));
    }

    #[test]
    fn rounding_is_presentation_only() {
        let stored = 101.5567;
        assert_eq!(round_dp(stored, 2), 101.56);
        assert_eq!(stored, 101.5567);
    }
}
