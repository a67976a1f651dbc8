//! Lenient typed lookups into a `serde_json::Value` params object.
//!
//! A missing key or a value of the wrong type yields the default; these
//! helpers never fail, so partial override objects are always usable.

use glam::DVec2;
use serde_json::Value;

/// Reads an `f64`, accepting integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a non-negative integer as `u64`.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// Reads a two-element numeric array `[x, y]`.
pub fn param_vec2(params: &Value, name: &str, default: DVec2) -> DVec2 {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([x, y]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => DVec2::new(x, y),
            _ => default,
        },
        _ => default,
    }
}
