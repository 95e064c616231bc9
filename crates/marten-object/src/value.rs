//! JavaScript values
//!
//! Values are a plain tagged enum. Heap data (strings, objects) is behind
//! `Rc`, so cloning a value is cheap and never copies object state.

use std::rc::Rc;

use crate::error::{VmError, VmResult};
use crate::object::JsObject;

/// Native function handler type.
///
/// Receives the `this` value and the argument list.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> VmResult<Value>>;

/// A JavaScript value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// IEEE 754 number
    Number(f64),
    /// Immutable string
    String(Rc<str>),
    /// Object reference
    Object(Rc<JsObject>),
}

impl Value {
    /// Create undefined value
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// Create null value
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create boolean value
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Create number value
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create number value from an int32
    pub const fn int32(n: i32) -> Self {
        Self::Number(n as f64)
    }

    /// Create string value
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    /// Create object value
    pub fn object(obj: Rc<JsObject>) -> Self {
        Self::Object(obj)
    }

    /// Check if undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if this is a primitive (not an object)
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    /// Check if this value can be called
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Object(obj) if obj.is_callable())
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as int32 if the number is an exact int32
    pub fn as_int32(&self) -> Option<i32> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64 => {
                Some(*n as i32)
            }
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&Rc<JsObject>> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// ToBoolean
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// The `typeof` result
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(obj) if obj.is_callable() => "function",
            Self::Object(_) => "object",
        }
    }

    /// Call this value as a function
    pub fn call(&self, this: &Value, args: &[Value]) -> VmResult<Value> {
        match self {
            Self::Object(obj) => obj.call(this, args),
            other => Err(VmError::type_error(format!(
                "{} is not a function",
                other.type_of()
            ))),
        }
    }
}

/// SameValue (ES5.1 9.12): NaN equals NaN, +0 differs from -0.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                true
            } else {
                x == y && x.is_sign_negative() == y.is_sign_negative()
            }
        }
        _ => a == b,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", ryu_js::Buffer::new().format(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Object(obj) => write!(f, "[object {}]", obj.class_name()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::int32(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<Rc<JsObject>> for Value {
    fn from(obj: Rc<JsObject>) -> Self {
        Self::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::undefined().type_of(), "undefined");
        assert_eq!(Value::null().type_of(), "object");
        assert_eq!(Value::boolean(true).type_of(), "boolean");
        assert_eq!(Value::int32(42).type_of(), "number");
        assert_eq!(Value::string("x").type_of(), "string");
    }

    #[test]
    fn test_as_int32() {
        assert_eq!(Value::number(3.0).as_int32(), Some(3));
        assert_eq!(Value::number(3.5).as_int32(), None);
        assert_eq!(Value::number(4294967296.0).as_int32(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::undefined().to_boolean());
        assert!(!Value::number(f64::NAN).to_boolean());
        assert!(!Value::string("").to_boolean());
        assert!(Value::string("0").to_boolean());
        assert!(Value::int32(-1).to_boolean());
    }

    #[test]
    fn test_same_value() {
        assert!(same_value(&Value::number(f64::NAN), &Value::number(f64::NAN)));
        assert!(!same_value(&Value::number(0.0), &Value::number(-0.0)));
        assert!(same_value(&Value::string("a"), &Value::string("a")));
        assert!(!same_value(&Value::undefined(), &Value::null()));
    }

    #[test]
    fn test_debug_uses_js_number_text() {
        assert_eq!(format!("{:?}", Value::int32(7)), "7");
        assert_eq!(format!("{:?}", Value::number(1e21)), "1e+21");
        assert_eq!(format!("{:?}", Value::number(f64::NAN)), "NaN");
        assert_eq!(format!("{:?}", Value::string("a")), "\"a\"");
    }

    #[test]
    fn test_call_non_function() {
        let err = Value::int32(1)
            .call(&Value::undefined(), &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "TypeError: number is not a function");
    }
}
