//! Type conversion abstract operations (ES5.1 clause 9).
//!
//! Only the conversions the object model consumes live here: `ToPrimitive`,
//! `ToNumber` and `ToUint32`.

use crate::error::{VmError, VmResult};
use crate::object::PropertyKey;
use crate::value::Value;

/// Preferred type for `ToPrimitive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    /// Try `valueOf` first
    Number,
    /// Try `toString` first
    String,
}

/// ToPrimitive (ES5.1 9.1 / 8.12.8 [[DefaultValue]])
pub fn to_primitive(value: &Value, hint: PreferredType) -> VmResult<Value> {
    let Value::Object(obj) = value else {
        return Ok(value.clone());
    };

    let order = match hint {
        PreferredType::Number => ["valueOf", "toString"],
        PreferredType::String => ["toString", "valueOf"],
    };
    for name in order {
        let method = obj.get(&PropertyKey::string(name))?;
        if method.is_callable() {
            let result = method.call(value, &[])?;
            if result.is_primitive() {
                return Ok(result);
            }
        }
    }

    Err(VmError::type_error("Cannot convert object to primitive value"))
}

/// ToNumber (ES5.1 9.3)
pub fn to_number(value: &Value) -> VmResult<f64> {
    Ok(match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        Value::Object(_) => return to_number(&to_primitive(value, PreferredType::Number)?),
    })
}

/// ToUint32 (ES5.1 9.6)
pub fn to_uint32(value: &Value) -> VmResult<u32> {
    Ok(number_to_uint32(to_number(value)?))
}

/// ToUint32 applied to an already converted number
pub fn number_to_uint32(n: f64) -> u32 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// ToNumber applied to a String (ES5.1 9.3.1)
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return hex_to_number(hex);
    }

    // Rust accepts "inf"/"nan" spellings that JS rejects
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn hex_to_number(digits: &str) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut result = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(16) {
            Some(d) => result = result * 16.0 + d as f64,
            None => return f64::NAN,
        }
    }
    result
}

fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || c.is_whitespace()
}
