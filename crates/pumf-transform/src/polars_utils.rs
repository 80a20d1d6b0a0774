//! Conversions from Polars `AnyValue`s to codes and output text.

use polars::prelude::AnyValue;
use pumf_model::{integral_f64, parse_code};

/// Renders a dataset value as the text written to the output column.
///
/// Nulls become empty; integral floats lose their fractional part so a code
/// read as `35.0` is written back as `35`.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Coerces a dataset value to an integer code.
///
/// Integers map directly, floats only when integral, strings through
/// [`parse_code`]. Nulls and everything else yield `None`.
pub fn any_to_code(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => integral_f64(f64::from(v)),
        AnyValue::Float64(v) => integral_f64(v),
        AnyValue::String(s) => parse_code(s),
        AnyValue::StringOwned(s) => parse_code(&s),
        _ => None,
    }
}

fn format_numeric(v: f64) -> String {
    match integral_f64(v) {
        Some(code) => code.to_string(),
        None => v.to_string(),
    }
}
