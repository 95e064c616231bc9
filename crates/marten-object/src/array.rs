//! Array exotic object protocol (ES5.1 15.4.5).
//!
//! Overrides of the ordinary internal methods for objects created with
//! [`JsObject::array`]. Canonical index keys live in the element storage;
//! `length` lives in the ordinary property table as a non-configurable data
//! property and is kept `>=` the highest occupied index + 1.
//!
//! Every method that can refuse takes a `throw` flag: when set, refusals are
//! returned as `Err`, otherwise as `Ok(false)`. An invalid `length` value is
//! always an `Err` ([`VmError::InvalidLength`]).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::array_index::MAX_ARRAY_INDEX;
use crate::array_storage::ArrayStorage;
use crate::convert::{number_to_uint32, to_number};
use crate::error::{VmError, VmResult};
use crate::object::{reject_put, JsObject, PropertyKey};
use crate::property::{PartialDescriptor, PropertyDescriptor};
use crate::value::Value;

impl JsObject {
    /// Current `length`, `0` for objects without one
    pub fn get_length(&self) -> u32 {
        self.length_state().0
    }

    /// `length` value and writability
    fn length_state(&self) -> (u32, bool) {
        match self.get_own_property(&PropertyKey::length()) {
            Some(PropertyDescriptor::Data { value, attributes }) => {
                let len = value.as_number().map(number_to_uint32).unwrap_or(0);
                (len, attributes.writable)
            }
            _ => (0, true),
        }
    }

    /// Iteration start hint, see [`ArrayStorage::smallest_occupied_index`]
    pub fn smallest_index(&self) -> u32 {
        self.elements()
            .map(|elements| elements.smallest_occupied_index())
            .unwrap_or(0)
    }

    /// `HasOwnProperty` for arrays: an index is own only when it is below
    /// `length` and its slot is occupied.
    pub(crate) fn array_has_own_property(
        &self,
        elements: &RefCell<ArrayStorage>,
        key: &PropertyKey,
    ) -> bool {
        match key.as_index() {
            Some(index) => index < self.get_length() && elements.borrow().contains(index),
            None => self.get_own_property(key).is_some(),
        }
    }

    /// `[[DefineOwnProperty]]` for arrays (ES5.1 15.4.5.1)
    pub(crate) fn array_define_own_property(
        &self,
        elements: &RefCell<ArrayStorage>,
        key: &PropertyKey,
        desc: PartialDescriptor,
        throw: bool,
    ) -> VmResult<bool> {
        if key.is_length() {
            return self.define_array_length(elements, desc, throw);
        }
        if let Some(index) = key.as_index() {
            return self.define_array_index(index, key, desc, throw);
        }
        self.ordinary_define_own_property(key, desc, throw)
    }

    fn define_array_length(
        &self,
        elements: &RefCell<ArrayStorage>,
        desc: PartialDescriptor,
        throw: bool,
    ) -> VmResult<bool> {
        let key = PropertyKey::length();
        let Some(value) = desc.value.clone() else {
            return self.ordinary_define_own_property(&key, desc, throw);
        };

        let number = to_number(&value)?;
        let new_len = number_to_uint32(number);
        if new_len as f64 != number {
            return Err(VmError::InvalidLength(number));
        }

        let mut new_len_desc = desc;
        new_len_desc.value = Some(Value::from(new_len));

        let (old_len, old_writable) = self.length_state();
        if new_len >= old_len {
            return self.ordinary_define_own_property(&key, new_len_desc, throw);
        }

        if !old_writable {
            return reject(throw, VmError::FrozenMutation { length: old_len });
        }

        // Keep length writable while deleting; freeze it at the end
        let new_writable = new_len_desc.writable.unwrap_or(true);
        if !new_writable {
            new_len_desc.writable = Some(true);
        }

        if !self.ordinary_define_own_property(&key, new_len_desc.clone(), throw)? {
            return Ok(false);
        }

        if let Some(blocked) = self.truncate_elements(elements, new_len, old_len) {
            let achieved = blocked + 1;
            debug!(
                target: "marten::array",
                requested = new_len,
                length = achieved,
                "array shrink blocked by non-configurable element"
            );
            new_len_desc.value = Some(Value::from(achieved));
            if !new_writable {
                new_len_desc.writable = Some(false);
            }
            self.ordinary_define_own_property(&key, new_len_desc, false)?;
            return reject(throw, VmError::FrozenMutation { length: achieved });
        }

        if !new_writable {
            self.ordinary_define_own_property(
                &key,
                PartialDescriptor::default().with_writable(false),
                false,
            )?;
        }
        Ok(true)
    }

    /// Delete elements in `[new_len, old_len)` from the top down. Returns the
    /// index of the first element that refused deletion.
    fn truncate_elements(
        &self,
        elements: &RefCell<ArrayStorage>,
        new_len: u32,
        old_len: u32,
    ) -> Option<u32> {
        let occupied = elements.borrow().occupied_count();
        let span = old_len - new_len;

        if (occupied as u64) < span as u64 {
            trace!(
                target: "marten::array",
                occupied,
                span,
                "shrinking array over occupied indices"
            );
            // Snapshot: deletion mutates the storage we would be iterating
            let indices = elements.borrow().occupied_indices();
            return indices
                .into_iter()
                .rev()
                .filter(|index| (new_len..old_len).contains(index))
                .find(|&index| !self.delete_element(index));
        }

        trace!(
            target: "marten::array",
            occupied,
            span,
            "shrinking array over index range"
        );
        (new_len..old_len)
            .rev()
            .find(|&index| !self.delete_element(index))
    }

    fn delete_element(&self, index: u32) -> bool {
        matches!(self.delete(&PropertyKey::Index(index), false), Ok(true))
    }

    fn define_array_index(
        &self,
        index: u32,
        key: &PropertyKey,
        desc: PartialDescriptor,
        throw: bool,
    ) -> VmResult<bool> {
        let (old_len, old_writable) = self.length_state();
        if index >= old_len && !old_writable {
            return reject(throw, VmError::FrozenMutation { length: old_len });
        }

        if !self.ordinary_define_own_property(key, desc, throw)? {
            return Ok(false);
        }

        if index >= old_len {
            self.set_length_value(index + 1);
        }
        Ok(true)
    }

    /// `[[Put]]` for arrays (ES5.1 8.12.5, with array `[[DefineOwnProperty]]`)
    pub(crate) fn array_put(
        self: &Rc<Self>,
        key: PropertyKey,
        value: Value,
        throw: bool,
    ) -> VmResult<()> {
        if !self.can_put(&key) {
            return reject_put(&key, throw);
        }

        if let Some(PropertyDescriptor::Data { .. }) = self.get_own_property(&key) {
            self.define_own_property(&key, PartialDescriptor::value(value), throw)?;
            return Ok(());
        }

        self.put_inherited(key, value, throw)
    }

    /// Assign `array[index] = value`, growing `length` as needed.
    ///
    /// Existing writable data elements are overwritten in place; everything
    /// else goes through `[[Put]]`.
    pub fn set_index_value(self: &Rc<Self>, index: u32, value: Value, throw: bool) -> VmResult<()> {
        let key = PropertyKey::index(index);
        let writable_slot = self
            .elements()
            .and_then(|elements| match elements.read(index) {
                Some(PropertyDescriptor::Data { attributes, .. }) if attributes.writable => {
                    Some(*attributes)
                }
                _ => None,
            });

        if let Some(attributes) = writable_slot {
            self.set_own_property(&key, PropertyDescriptor::data_with_attrs(value, attributes));
            return Ok(());
        }
        self.put(key, value, throw)
    }

    /// Own or inherited value at `index`, calling getters.
    ///
    /// `Ok(None)` means no such property anywhere on the chain, which is
    /// distinct from `Ok(Some(undefined))`.
    pub fn try_get_value(self: &Rc<Self>, index: u32) -> VmResult<Option<Value>> {
        let key = PropertyKey::index(index);
        let Some(desc) = self.get_property(&key) else {
            return Ok(None);
        };
        match desc {
            PropertyDescriptor::Data { value, .. } => Ok(Some(value)),
            PropertyDescriptor::Accessor { get, .. } => match get {
                Some(getter) => getter.call(&Value::object(Rc::clone(self)), &[]).map(Some),
                None => Ok(Some(Value::undefined())),
            },
        }
    }

    /// Append `value`, returning the new length
    pub fn array_push(self: &Rc<Self>, value: Value) -> VmResult<u32> {
        let len = self.get_length();
        if len > MAX_ARRAY_INDEX {
            return Err(VmError::range_error("Pushing past the maximum array length"));
        }
        self.put(PropertyKey::Index(len), value, true)?;
        self.put(PropertyKey::length(), Value::from(len + 1), true)?;
        Ok(len + 1)
    }

    /// Remove and return the last element
    pub fn array_pop(self: &Rc<Self>) -> VmResult<Value> {
        let len = self.get_length();
        if len == 0 {
            self.put(PropertyKey::length(), Value::from(0u32), true)?;
            return Ok(Value::undefined());
        }

        let key = PropertyKey::index(len - 1);
        let element = self.get(&key)?;
        self.delete(&key, true)?;
        self.put(PropertyKey::length(), Value::from(len - 1), true)?;
        Ok(element)
    }
}

fn reject(throw: bool, err: VmError) -> VmResult<bool> {
    if throw {
        Err(err)
    } else {
        Ok(false)
    }
}
