//! JavaScript objects and the ordinary object protocol (ES5.1 8.12).
//!
//! `JsObject` is a single concrete type. Arrays carry element storage and
//! route canonical index keys through it; every other key, and every other
//! kind of object, goes through the ordinary property table. The ordinary
//! algorithms are written against the `*_own_property` hooks so that the
//! array overrides in [`crate::array`] can reuse them for index keys.
//!
//! Objects are single-threaded: state sits in `RefCell`/`Cell`, and no borrow
//! is held while script code (getters, setters, `valueOf`) runs.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::array_index::{array_index, index_to_string, NOT_AN_INDEX};
use crate::array_storage::{ArrayStorage, StorageLimits};
use crate::error::{VmError, VmResult};
use crate::property::{PartialDescriptor, PropertyAttributes, PropertyDescriptor};
use crate::value::{same_value, NativeFn, Value};

/// Property key.
///
/// Keys that are canonical array indices are always stored as
/// [`PropertyKey::Index`]; the constructors classify text keys so that
/// `"7"` and `7` name the same property while `"07"` does not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key (never a canonical array index)
    String(Rc<str>),
    /// Canonical array index
    Index(u32),
}

impl PropertyKey {
    /// Create a key from text, classifying array indices
    pub fn string(s: &str) -> Self {
        match array_index(s) {
            Some(index) => Self::Index(index),
            None => Self::String(Rc::from(s)),
        }
    }

    /// Create a key from an integer. `2^32 - 1` is not an index and becomes
    /// a string key.
    pub fn index(i: u32) -> Self {
        if i == NOT_AN_INDEX {
            Self::String(Rc::from(index_to_string(i)))
        } else {
            Self::Index(i)
        }
    }

    /// The `length` key
    pub fn length() -> Self {
        Self::String(Rc::from("length"))
    }

    /// Array index, if this key is one
    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(i) => Some(*i),
            Self::String(_) => None,
        }
    }

    /// Check for a specific string key
    pub fn is(&self, name: &str) -> bool {
        matches!(self, Self::String(s) if &**s == name)
    }

    /// Check for the `length` key
    pub fn is_length(&self) -> bool {
        self.is("length")
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Index(i) => f.write_str(itoa::Buffer::new().format(*i)),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::string(&s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::index(i)
    }
}

type PropertyMap = IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>;

/// A JavaScript object
pub struct JsObject {
    /// Named (and, for non-arrays, indexed) properties in insertion order
    properties: RefCell<PropertyMap>,
    /// Prototype (None for the end of the chain)
    prototype: Option<Rc<JsObject>>,
    /// Element storage, present only for arrays
    elements: Option<RefCell<ArrayStorage>>,
    /// Native behaviour for function objects
    call: Option<NativeFn>,
    /// Object flags
    flags: Cell<ObjectFlags>,
}

/// Object flags
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectFlags {
    /// Is this an array
    pub is_array: bool,
    /// Is extensible
    pub extensible: bool,
}

impl JsObject {
    /// Create a new empty object
    pub fn new(prototype: Option<Rc<JsObject>>) -> Self {
        Self {
            properties: RefCell::new(PropertyMap::default()),
            prototype,
            elements: None,
            call: None,
            flags: Cell::new(ObjectFlags {
                extensible: true,
                ..Default::default()
            }),
        }
    }

    /// Create a new empty array. `capacity` is a storage hint: `length`
    /// starts at 0.
    pub fn array(capacity: u32) -> Self {
        Self::array_with_prototype(None, capacity)
    }

    /// Create a new empty array with a prototype
    pub fn array_with_prototype(prototype: Option<Rc<JsObject>>, capacity: u32) -> Self {
        Self::array_with_limits(prototype, capacity, StorageLimits::default())
    }

    /// Create a new empty array with explicit storage thresholds
    pub fn array_with_limits(
        prototype: Option<Rc<JsObject>>,
        capacity: u32,
        limits: StorageLimits,
    ) -> Self {
        let mut obj = Self::new(prototype);
        obj.elements = Some(RefCell::new(ArrayStorage::with_limits(capacity, limits)));
        obj.flags.set(ObjectFlags {
            is_array: true,
            extensible: true,
        });
        obj.properties.get_mut().insert(
            PropertyKey::length(),
            PropertyDescriptor::data_with_attrs(Value::int32(0), PropertyAttributes::length()),
        );
        obj
    }

    /// Create an array holding `values` at indices `0..n`
    pub fn array_from(values: impl IntoIterator<Item = Value>) -> Self {
        let values: Vec<Value> = values.into_iter().collect();
        let len = u32::try_from(values.len()).unwrap_or(u32::MAX).min(NOT_AN_INDEX);
        let obj = Self::array(len);
        if let Some(elements) = &obj.elements {
            let mut elements = elements.borrow_mut();
            for (i, value) in (0..len).zip(values) {
                elements.write(i, PropertyDescriptor::data(value));
            }
        }
        obj.set_length_value(len);
        obj
    }

    /// Create a native function object
    pub fn function(f: impl Fn(&Value, &[Value]) -> VmResult<Value> + 'static) -> Self {
        let mut obj = Self::new(None);
        obj.call = Some(Rc::new(f));
        obj
    }

    /// Get prototype
    pub fn prototype(&self) -> Option<&Rc<JsObject>> {
        self.prototype.as_ref()
    }

    /// Check if object is an array
    pub fn is_array(&self) -> bool {
        self.flags.get().is_array
    }

    /// Check if object can be called
    pub fn is_callable(&self) -> bool {
        self.call.is_some()
    }

    /// `[[Class]]`
    pub fn class_name(&self) -> &'static str {
        if self.is_array() {
            "Array"
        } else if self.is_callable() {
            "Function"
        } else {
            "Object"
        }
    }

    /// `[[Extensible]]`
    pub fn is_extensible(&self) -> bool {
        self.flags.get().extensible
    }

    /// Object.preventExtensions
    pub fn prevent_extensions(&self) {
        let mut flags = self.flags.get();
        flags.extensible = false;
        self.flags.set(flags);
    }

    /// Read-only view of the element storage (arrays only)
    pub fn elements(&self) -> Option<Ref<'_, ArrayStorage>> {
        self.elements.as_ref().map(RefCell::borrow)
    }

    /// `[[Call]]`
    pub fn call(&self, this: &Value, args: &[Value]) -> VmResult<Value> {
        match &self.call {
            Some(f) => f(this, args),
            None => Err(VmError::type_error(format!(
                "{} is not a function",
                self.class_name()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Slot hooks
    // ------------------------------------------------------------------

    /// Raw own-property write, no validation
    pub(crate) fn set_own_property(&self, key: &PropertyKey, desc: PropertyDescriptor) {
        if let (Some(elements), PropertyKey::Index(index)) = (&self.elements, key) {
            elements.borrow_mut().write(*index, desc);
            return;
        }
        self.properties.borrow_mut().insert(key.clone(), desc);
    }

    /// Raw own-property removal, no validation
    pub fn remove_own_property(&self, key: &PropertyKey) {
        if let (Some(elements), PropertyKey::Index(index)) = (&self.elements, key) {
            elements.borrow_mut().delete(*index);
        }
        self.properties.borrow_mut().shift_remove(key);
    }

    /// Overwrite the value of the `length` data property in place
    pub(crate) fn set_length_value(&self, len: u32) {
        let mut props = self.properties.borrow_mut();
        match props.get_mut(&PropertyKey::length()) {
            Some(PropertyDescriptor::Data { value, .. }) => *value = Value::from(len),
            _ => {
                props.insert(
                    PropertyKey::length(),
                    PropertyDescriptor::data_with_attrs(Value::from(len), PropertyAttributes::length()),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Internal methods
    // ------------------------------------------------------------------

    /// `[[GetOwnProperty]]`. `None` means the property does not exist, as
    /// opposed to existing with an `undefined` value.
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let (Some(elements), PropertyKey::Index(index)) = (&self.elements, key) {
            return elements.borrow().read(*index).cloned();
        }
        self.properties.borrow().get(key).cloned()
    }

    /// `[[GetProperty]]`: own property, then the prototype chain
    pub fn get_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let Some(desc) = self.get_own_property(key) {
            return Some(desc);
        }
        let mut proto = self.prototype.clone();
        while let Some(obj) = proto {
            if let Some(desc) = obj.get_own_property(key) {
                return Some(desc);
            }
            proto = obj.prototype.clone();
        }
        None
    }

    /// `HasOwnProperty`
    pub fn has_own_property(&self, key: &PropertyKey) -> bool {
        match &self.elements {
            Some(elements) => self.array_has_own_property(elements, key),
            None => self.get_own_property(key).is_some(),
        }
    }

    /// `[[HasProperty]]`
    pub fn has_property(&self, key: &PropertyKey) -> bool {
        self.get_property(key).is_some()
    }

    /// `[[Get]]`
    pub fn get(self: &Rc<Self>, key: &PropertyKey) -> VmResult<Value> {
        match self.get_property(key) {
            None => Ok(Value::undefined()),
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor { get, .. }) => match get {
                Some(getter) if !getter.is_undefined() => {
                    getter.call(&Value::object(Rc::clone(self)), &[])
                }
                _ => Ok(Value::undefined()),
            },
        }
    }

    /// `[[CanPut]]`
    pub fn can_put(&self, key: &PropertyKey) -> bool {
        if let Some(desc) = self.get_own_property(key) {
            return match desc {
                PropertyDescriptor::Accessor { set, .. } => has_function(&set),
                PropertyDescriptor::Data { attributes, .. } => attributes.writable,
            };
        }

        let inherited = self
            .prototype
            .as_ref()
            .and_then(|proto| proto.get_property(key));
        match inherited {
            None => self.is_extensible(),
            Some(PropertyDescriptor::Accessor { set, .. }) => has_function(&set),
            Some(PropertyDescriptor::Data { attributes, .. }) => {
                self.is_extensible() && attributes.writable
            }
        }
    }

    /// `[[Put]]`
    pub fn put(self: &Rc<Self>, key: PropertyKey, value: Value, throw: bool) -> VmResult<()> {
        if self.is_array() {
            return self.array_put(key, value, throw);
        }

        // Own writable data property: update in place
        {
            let mut props = self.properties.borrow_mut();
            if let Some(PropertyDescriptor::Data {
                value: slot,
                attributes,
            }) = props.get_mut(&key)
            {
                if attributes.writable {
                    *slot = value;
                    return Ok(());
                }
            }
        }

        if !self.can_put(&key) {
            return reject_put(&key, throw);
        }
        self.put_inherited(key, value, throw)
    }

    /// Final step of `[[Put]]` when there is no own data property: call an
    /// inherited setter, or create a fresh own data property.
    pub(crate) fn put_inherited(
        self: &Rc<Self>,
        key: PropertyKey,
        value: Value,
        throw: bool,
    ) -> VmResult<()> {
        if let Some(PropertyDescriptor::Accessor { set, .. }) = self.get_property(&key) {
            if let Some(setter) = set.filter(|s| !s.is_undefined()) {
                setter.call(&Value::object(Rc::clone(self)), &[value])?;
            }
            return Ok(());
        }

        self.define_own_property(&key, PartialDescriptor::default_data(value), throw)?;
        Ok(())
    }

    /// `[[Delete]]`
    pub fn delete(&self, key: &PropertyKey, throw: bool) -> VmResult<bool> {
        let Some(desc) = self.get_own_property(key) else {
            return Ok(true);
        };
        if desc.is_configurable() {
            self.remove_own_property(key);
            return Ok(true);
        }
        if throw {
            return Err(VmError::type_error(format!(
                "Cannot delete property '{key}' of [object {}]",
                self.class_name()
            )));
        }
        Ok(false)
    }

    /// `[[DefineOwnProperty]]`
    pub fn define_own_property(
        &self,
        key: &PropertyKey,
        desc: PartialDescriptor,
        throw: bool,
    ) -> VmResult<bool> {
        match &self.elements {
            Some(elements) => self.array_define_own_property(elements, key, desc, throw),
            None => self.ordinary_define_own_property(key, desc, throw),
        }
    }

    /// Ordinary `[[DefineOwnProperty]]` (ES5.1 8.12.9)
    pub fn ordinary_define_own_property(
        &self,
        key: &PropertyKey,
        desc: PartialDescriptor,
        throw: bool,
    ) -> VmResult<bool> {
        let reject = |reason: &str| -> VmResult<bool> {
            if throw {
                Err(VmError::type_error(format!("{reason}: {key}")))
            } else {
                Ok(false)
            }
        };

        let Some(current) = self.get_own_property(key) else {
            if !self.is_extensible() {
                return reject("Cannot define property, object is not extensible");
            }
            self.set_own_property(key, desc.to_property());
            return Ok(true);
        };

        if desc.is_empty() || is_unchanged(&desc, &current) {
            return Ok(true);
        }

        let current_attrs = current.attributes();
        if !current_attrs.configurable {
            if desc.configurable == Some(true) {
                return reject("Cannot redefine property");
            }
            if desc
                .enumerable
                .is_some_and(|enumerable| enumerable != current_attrs.enumerable)
            {
                return reject("Cannot redefine property");
            }
        }

        let mut updated = current.clone();
        if !desc.is_generic_descriptor() {
            match &current {
                PropertyDescriptor::Data { .. } if desc.is_accessor_descriptor() => {
                    if !current_attrs.configurable {
                        return reject("Cannot redefine property");
                    }
                    updated = PropertyDescriptor::Accessor {
                        get: None,
                        set: None,
                        attributes: PropertyAttributes {
                            writable: false,
                            ..current_attrs
                        },
                    };
                }
                PropertyDescriptor::Accessor { .. } if desc.is_data_descriptor() => {
                    if !current_attrs.configurable {
                        return reject("Cannot redefine property");
                    }
                    updated = PropertyDescriptor::Data {
                        value: Value::undefined(),
                        attributes: PropertyAttributes {
                            writable: false,
                            ..current_attrs
                        },
                    };
                }
                PropertyDescriptor::Data { value, attributes } => {
                    if !attributes.configurable && !attributes.writable {
                        if desc.writable == Some(true) {
                            return reject("Cannot assign to read only property");
                        }
                        if desc.value.as_ref().is_some_and(|v| !same_value(v, value)) {
                            return reject("Cannot assign to read only property");
                        }
                    }
                }
                PropertyDescriptor::Accessor { get, set, .. } => {
                    if !current_attrs.configurable {
                        if desc.set.as_ref().is_some_and(|s| !same_function(s, set)) {
                            return reject("Cannot redefine property");
                        }
                        if desc.get.as_ref().is_some_and(|g| !same_function(g, get)) {
                            return reject("Cannot redefine property");
                        }
                    }
                }
            }
        }

        apply_descriptor(&mut updated, desc);
        self.set_own_property(key, updated);
        Ok(true)
    }

    /// Own properties as a one-shot sequence: array elements in ascending
    /// index order first, then the property table in insertion order.
    ///
    /// The key list is snapshotted up front (O(n) in the number of own
    /// properties); descriptors are read lazily, so entries removed before
    /// they are reached are skipped and keys added afterwards are not seen.
    pub fn own_properties(self: &Rc<Self>) -> OwnProperties {
        let indices = self
            .elements()
            .map(|elements| elements.occupied_indices())
            .unwrap_or_default();
        let names: Vec<PropertyKey> = self.properties.borrow().keys().cloned().collect();
        OwnProperties {
            object: Rc::clone(self),
            indices: indices.into_iter(),
            names: names.into_iter(),
        }
    }

    /// Own property keys in enumeration order
    pub fn own_keys(self: &Rc<Self>) -> Vec<PropertyKey> {
        self.own_properties().map(|(key, _)| key).collect()
    }
}

/// Iterator returned by [`JsObject::own_properties`]
pub struct OwnProperties {
    object: Rc<JsObject>,
    indices: std::vec::IntoIter<u32>,
    names: std::vec::IntoIter<PropertyKey>,
}

impl Iterator for OwnProperties {
    type Item = (PropertyKey, PropertyDescriptor);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(elements) = &self.object.elements {
            for index in self.indices.by_ref() {
                if let Some(desc) = elements.borrow().read(index) {
                    return Some((PropertyKey::Index(index), desc.clone()));
                }
            }
        }
        for key in self.names.by_ref() {
            if let Some(desc) = self.object.properties.borrow().get(&key) {
                return Some((key, desc.clone()));
            }
        }
        None
    }
}

impl std::iter::FusedIterator for OwnProperties {}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.properties.borrow();
        f.debug_struct("JsObject")
            .field("class", &self.class_name())
            .field("properties", &props.len())
            .field(
                "elements",
                &self.elements().map(|elements| elements.occupied_count()),
            )
            .finish()
    }
}

/// Rejection for `[[Put]]` when `[[CanPut]]` says no
pub(crate) fn reject_put(key: &PropertyKey, throw: bool) -> VmResult<()> {
    if throw {
        return Err(VmError::type_error(format!(
            "Cannot assign to read only property '{key}'"
        )));
    }
    Ok(())
}

fn has_function(slot: &Option<Value>) -> bool {
    slot.as_ref().is_some_and(|f| !f.is_undefined())
}

/// Compare a requested getter/setter with a stored one (absent = undefined)
fn same_function(requested: &Value, stored: &Option<Value>) -> bool {
    match stored {
        Some(stored) => same_value(requested, stored),
        None => requested.is_undefined(),
    }
}

/// Every field present in `desc` already has the same value in `current`
fn is_unchanged(desc: &PartialDescriptor, current: &PropertyDescriptor) -> bool {
    let attrs = current.attributes();
    if desc.enumerable.is_some_and(|e| e != attrs.enumerable)
        || desc.configurable.is_some_and(|c| c != attrs.configurable)
    {
        return false;
    }
    match current {
        PropertyDescriptor::Data { value, attributes } => {
            !desc.is_accessor_descriptor()
                && desc.writable.is_none_or(|w| w == attributes.writable)
                && desc.value.as_ref().is_none_or(|v| same_value(v, value))
        }
        PropertyDescriptor::Accessor { get, set, .. } => {
            !desc.is_data_descriptor()
                && desc.get.as_ref().is_none_or(|g| same_function(g, get))
                && desc.set.as_ref().is_none_or(|s| same_function(s, set))
        }
    }
}

/// Copy every specified field of `desc` onto `target`
fn apply_descriptor(target: &mut PropertyDescriptor, desc: PartialDescriptor) {
    {
        let attrs = target.attributes_mut();
        if let Some(enumerable) = desc.enumerable {
            attrs.enumerable = enumerable;
        }
        if let Some(configurable) = desc.configurable {
            attrs.configurable = configurable;
        }
    }
    match target {
        PropertyDescriptor::Data { value, attributes } => {
            if let Some(new_value) = desc.value {
                *value = new_value;
            }
            if let Some(writable) = desc.writable {
                attributes.writable = writable;
            }
        }
        PropertyDescriptor::Accessor { get, set, .. } => {
            if let Some(getter) = desc.get {
                *get = Some(getter).filter(|g| !g.is_undefined());
            }
            if let Some(setter) = desc.set {
                *set = Some(setter).filter(|s| !s.is_undefined());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_key_classification() {
        assert_eq!(PropertyKey::string("0"), PropertyKey::Index(0));
        assert_eq!(PropertyKey::string("42"), PropertyKey::Index(42));
        assert_eq!(PropertyKey::string("01"), PropertyKey::String(Rc::from("01")));
        assert_eq!(
            PropertyKey::index(u32::MAX),
            PropertyKey::String(Rc::from("4294967295"))
        );
        assert_eq!(PropertyKey::from(7u32).to_string(), "7");
        assert!(PropertyKey::length().is_length());
    }

    #[test]
    fn test_object_get_put() {
        let obj = Rc::new(JsObject::new(None));
        obj.put(PropertyKey::string("foo"), Value::int32(42), true)
            .unwrap();
        assert_eq!(obj.get(&PropertyKey::string("foo")).unwrap(), Value::int32(42));
        assert_eq!(
            obj.get_own_property(&PropertyKey::string("foo")),
            Some(PropertyDescriptor::data(Value::int32(42)))
        );
    }

    #[test]
    fn test_object_has() {
        let obj = Rc::new(JsObject::new(None));
        obj.put(PropertyKey::string("foo"), Value::int32(42), true)
            .unwrap();

        assert!(obj.has_property(&PropertyKey::string("foo")));
        assert!(!obj.has_property(&PropertyKey::string("bar")));
    }

    #[test]
    fn test_prototype_lookup() {
        let proto = Rc::new(JsObject::new(None));
        proto
            .put(PropertyKey::string("inherited"), Value::boolean(true), true)
            .unwrap();
        let obj = Rc::new(JsObject::new(Some(proto)));

        assert!(obj.has_property(&PropertyKey::string("inherited")));
        assert!(!obj.has_own_property(&PropertyKey::string("inherited")));
        assert_eq!(
            obj.get(&PropertyKey::string("inherited")).unwrap(),
            Value::boolean(true)
        );
    }

    #[test]
    fn test_non_extensible_rejects_new_property() {
        let obj = Rc::new(JsObject::new(None));
        obj.prevent_extensions();

        obj.put(PropertyKey::string("x"), Value::int32(1), false)
            .unwrap();
        assert!(!obj.has_own_property(&PropertyKey::string("x")));

        let err = obj
            .put(PropertyKey::string("x"), Value::int32(1), true)
            .unwrap_err();
        assert!(matches!(err, VmError::TypeError(_)));
    }

    #[test]
    fn test_define_merges_attributes() {
        let obj = JsObject::new(None);
        let key = PropertyKey::string("x");
        obj.define_own_property(&key, PartialDescriptor::default_data(Value::int32(1)), true)
            .unwrap();
        obj.define_own_property(&key, PartialDescriptor::default().with_enumerable(false), true)
            .unwrap();

        let desc = obj.get_own_property(&key).unwrap();
        assert_eq!(desc.value(), Some(&Value::int32(1)));
        assert!(desc.is_writable());
        assert!(!desc.is_enumerable());
        assert!(desc.is_configurable());
    }

    #[test]
    fn test_non_configurable_rejects_redefinition() {
        let obj = JsObject::new(None);
        let key = PropertyKey::string("x");
        obj.define_own_property(
            &key,
            PartialDescriptor::data(Value::int32(1), false, false, false),
            true,
        )
        .unwrap();

        // Same value is accepted
        assert!(obj
            .define_own_property(&key, PartialDescriptor::value(Value::int32(1)), true)
            .unwrap());
        assert!(!obj
            .define_own_property(&key, PartialDescriptor::value(Value::int32(2)), false)
            .unwrap());
        assert!(obj
            .define_own_property(&key, PartialDescriptor::default().with_configurable(true), true)
            .is_err());
        assert!(!obj.delete(&key, false).unwrap());
        assert!(obj.delete(&key, true).is_err());
    }

    #[test]
    fn test_data_to_accessor_conversion() {
        let obj = Rc::new(JsObject::new(None));
        let key = PropertyKey::string("x");
        obj.put(key.clone(), Value::int32(1), true).unwrap();

        let getter = Value::object(Rc::new(JsObject::function(|_, _| Ok(Value::int32(9)))));
        obj.define_own_property(&key, PartialDescriptor::accessor(Some(getter), None), true)
            .unwrap();

        let desc = obj.get_own_property(&key).unwrap();
        assert!(desc.is_accessor());
        assert!(desc.is_enumerable());
        assert_eq!(obj.get(&key).unwrap(), Value::int32(9));
    }

    #[test]
    fn test_inherited_setter_receives_receiver() {
        let seen = Rc::new(RefCell::new(None));
        let seen_in_setter = Rc::clone(&seen);
        let setter = JsObject::function(move |this, args| {
            *seen_in_setter.borrow_mut() = Some((this.clone(), args[0].clone()));
            Ok(Value::undefined())
        });
        let proto = Rc::new(JsObject::new(None));
        proto
            .define_own_property(
                &PropertyKey::string("x"),
                PartialDescriptor::accessor(None, Some(Value::object(Rc::new(setter)))),
                true,
            )
            .unwrap();
        let obj = Rc::new(JsObject::new(Some(proto)));

        obj.put(PropertyKey::string("x"), Value::int32(5), true)
            .unwrap();

        assert!(!obj.has_own_property(&PropertyKey::string("x")));
        let (this, arg) = seen.borrow_mut().take().unwrap();
        assert_eq!(this, Value::object(Rc::clone(&obj)));
        assert_eq!(arg, Value::int32(5));
    }

    #[test]
    fn test_inherited_read_only_blocks_put() {
        let proto = Rc::new(JsObject::new(None));
        proto
            .define_own_property(
                &PropertyKey::string("x"),
                PartialDescriptor::data(Value::int32(1), false, true, true),
                true,
            )
            .unwrap();
        let obj = Rc::new(JsObject::new(Some(proto)));
        obj.put(PropertyKey::string("x"), Value::int32(2), false)
            .unwrap();
        assert_eq!(obj.get(&PropertyKey::string("x")).unwrap(), Value::int32(1));
        assert!(obj
            .put(PropertyKey::string("x"), Value::int32(2), true)
            .is_err());
    }

    #[test]
    fn test_own_properties_insertion_order() {
        let obj = Rc::new(JsObject::new(None));
        for name in ["b", "a", "c"] {
            obj.put(PropertyKey::string(name), Value::null(), true)
                .unwrap();
        }
        obj.delete(&PropertyKey::string("a"), true).unwrap();
        let keys: Vec<String> = obj.own_keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_own_properties_walks_key_snapshot() {
        let obj = Rc::new(JsObject::new(None));
        for name in ["a", "b"] {
            obj.put(PropertyKey::string(name), Value::null(), true)
                .unwrap();
        }
        let mut props = obj.own_properties();
        assert_eq!(props.next().map(|(key, _)| key), Some(PropertyKey::string("a")));

        obj.put(PropertyKey::string("c"), Value::null(), true)
            .unwrap();
        let rest: Vec<PropertyKey> = props.map(|(key, _)| key).collect();
        assert_eq!(rest, vec![PropertyKey::string("b")]);
    }

    #[test]
    fn test_function_objects() {
        let f = JsObject::function(|_, args| Ok(args.first().cloned().unwrap_or_default()));
        assert!(f.is_callable());
        assert_eq!(f.class_name(), "Function");
        assert_eq!(
            f.call(&Value::undefined(), &[Value::int32(3)]).unwrap(),
            Value::int32(3)
        );
        assert!(JsObject::new(None).call(&Value::undefined(), &[]).is_err());
    }
}
