//! Lenient numeric coercion for upstream JSON payloads.
//!
//! Both upstream sources send amounts as decimal strings most of the time and
//! as bare JSON numbers occasionally. Anything that does not coerce to a
//! finite `f64` is treated as missing.

use serde_json::Value;

/// Coerce a JSON string or number into a finite `f64`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Coerce a JSON field of an object, treating absence and null alike.
pub fn coerce_field(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(coerce_f64)
}

/// Coerce a millisecond timestamp. Integral floats are accepted.
pub fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
