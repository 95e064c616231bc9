//! # Marten Object
//!
//! Object model for the Marten JavaScript engine, centred on the array exotic
//! object.
//!
//! ## Design Principles
//!
//! - **Hybrid element storage**: arrays keep elements in a dense slot vector
//!   and switch, one way, to a sparse map when writes look sparse
//! - **Canonical keys**: text keys are classified into array indices once, at
//!   [`PropertyKey`] construction
//! - **Dual failure path**: protocol methods take a `throw` flag and either
//!   return `Err` or `Ok(false)`
//! - **Single-threaded**: objects are `Rc`-shared with `RefCell` interior
//!   mutability; no borrow is held while script code runs

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod array;
pub mod array_index;
pub mod array_storage;
pub mod convert;
pub mod error;
pub mod object;
pub mod property;
pub mod value;

pub use array_index::{array_index, index_to_string, MAX_ARRAY_INDEX, NOT_AN_INDEX};
pub use array_storage::{ArrayStorage, StorageLimits};
pub use error::{ErrorKind, VmError, VmResult};
pub use object::{JsObject, OwnProperties, PropertyKey};
pub use property::{PartialDescriptor, PropertyAttributes, PropertyDescriptor};
pub use value::{NativeFn, Value};
