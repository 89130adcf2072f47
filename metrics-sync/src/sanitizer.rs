//! Scalar sanitization
//!
//! Substitutes sentinels for values that must never reach the `metrics` table:
//! numeric columns never hold null, zero or NaN, and text columns never hold null.

/// Stand-in for a missing, zero or NaN metric
pub const NUMERIC_SENTINEL: f64 = 0.0001;

/// Stand-in for a missing text value
pub const TEXT_SENTINEL: &str = "N/A";

/// Replace absent, zero or NaN with [`NUMERIC_SENTINEL`]; anything else passes through
pub fn sanitize_numeric(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => NUMERIC_SENTINEL,
    }
}

/// Replace absent with [`TEXT_SENTINEL`]; present strings pass through, empty included
pub fn sanitize_text(value: Option<String>) -> String {
    value.unwrap_or_else(|| TEXT_SENTINEL.to_string())
}
