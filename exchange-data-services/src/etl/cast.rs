//! Casts of raw JSON values into typed column values.
//!
//! CoinCap serializes most numerics as strings (`"rank": "1"`), so numeric
//! columns accept both JSON numbers and numeric strings. `null` and absent
//! fields cast to `None`.

use serde_json::Value;

use crate::error::EtlError;

fn cast_error(row: usize, field: &'static str, value: &Value, target: &'static str) -> EtlError {
    EtlError::TypeCast {
        row,
        field,
        value: value.to_string(),
        target,
    }
}

/// Cast to a string column. Numbers and booleans use their JSON text.
pub fn to_string(
    row: usize,
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, EtlError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(cast_error(row, field, other, "string")),
    }
}

/// Cast to a 64-bit integer column. Floats must have no fractional part.
pub fn to_i64(row: usize, field: &'static str, value: Option<&Value>) -> Result<Option<i64>, EtlError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        Some(_) => None,
    };

    match (parsed, value) {
        (Some(v), _) => Ok(Some(v)),
        (None, Some(raw)) => Err(cast_error(row, field, raw, "i64")),
        (None, None) => Ok(None),
    }
}

/// Cast to a 32-bit integer column.
pub fn to_i32(row: usize, field: &'static str, value: Option<&Value>) -> Result<Option<i32>, EtlError> {
    let wide = to_i64(row, field, value).map_err(|err| match err {
        EtlError::TypeCast { row, field, value, .. } => EtlError::TypeCast {
            row,
            field,
            value,
            target: "i32",
        },
        other => other,
    })?;

    match wide {
        None => Ok(None),
        Some(v) => i32::try_from(v).map(Some).map_err(|_| {
            // value is present whenever the wide cast produced a number
            let raw = value.cloned().unwrap_or(Value::Null);
            cast_error(row, field, &raw, "i32")
        }),
    }
}

/// Cast to a floating point column. NaN and infinities are rejected.
pub fn to_f64(row: usize, field: &'static str, value: Option<&Value>) -> Result<Option<f64>, EtlError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match (parsed.filter(|v| v.is_finite()), value) {
        (Some(v), _) => Ok(Some(v)),
        (None, Some(raw)) => Err(cast_error(row, field, raw, "f64")),
        (None, None) => Ok(None),
    }
}

/// Cast to a boolean column. Accepts JSON booleans and "true"/"false".
pub fn to_bool(row: usize, field: &'static str, value: Option<&Value>) -> Result<Option<bool>, EtlError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(cast_error(row, field, other, "bool")),
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    // i64::MAX is not exactly representable; stay strictly below 2^63
    if v.is_finite() && v.fract() == 0.0 && v >= -(2f64.powi(63)) && v < 2f64.powi(63) {
        Some(v as i64)
    } else {
        None
    }
}
