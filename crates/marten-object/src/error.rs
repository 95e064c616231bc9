//! Object model error types

use crate::value::Value;
use thiserror::Error;

/// Errors raised by the object protocol.
///
/// Protocol methods that take a `throw` flag only return `Err` when the flag
/// is set; otherwise refusals surface as `Ok(false)`. [`VmError::InvalidLength`]
/// is the one failure that is always an `Err`.
#[derive(Debug, Clone, Error)]
pub enum VmError {
    /// `length` was assigned a value that does not survive `ToUint32` exactly
    #[error("RangeError: Invalid array length: {0}")]
    InvalidLength(f64),

    /// A write hit a frozen `length`, or a shrink was blocked by a
    /// non-configurable element. `length` is the value actually in effect.
    #[error("TypeError: Cannot modify array length beyond {length}")]
    FrozenMutation {
        /// Array length after the failed operation
        length: u32,
    },

    /// Refusal from the generic object protocol
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Range error outside of `length` handling
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Value thrown by native code (getters, setters, `valueOf`)
    #[error("Uncaught exception: {0:?}")]
    Exception(Value),
}

/// Error class as seen by script code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `TypeError`
    TypeError,
    /// `RangeError`
    RangeError,
    /// Arbitrary thrown value
    Exception,
}

impl VmError {
    /// Create a type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a range error
    pub fn range_error(msg: impl Into<String>) -> Self {
        Self::RangeError(msg.into())
    }

    /// Create an exception from a thrown JS value
    pub fn exception(value: Value) -> Self {
        Self::Exception(value)
    }

    /// The script-visible error class
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength(_) | Self::RangeError(_) => ErrorKind::RangeError,
            Self::FrozenMutation { .. } | Self::TypeError(_) => ErrorKind::TypeError,
            Self::Exception(_) => ErrorKind::Exception,
        }
    }
}

/// Result type for object model operations
pub type VmResult<T> = std::result::Result<T, VmError>;
