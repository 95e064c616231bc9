//! Property-based tests for element storage

use std::rc::Rc;

use marten_object::{
    ArrayStorage, JsObject, MAX_ARRAY_INDEX, PartialDescriptor, PropertyDescriptor, PropertyKey,
    StorageLimits, Value,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Put(u32, i32),
    Delete(u32),
    SetLength(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..200, any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
        1 => (0u32..20_000, any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
        2 => (0u32..200).prop_map(Op::Delete),
        1 => (0u32..250).prop_map(Op::SetLength),
    ]
}

fn apply(arr: &Rc<JsObject>, op: &Op) {
    match *op {
        Op::Put(index, value) => arr
            .put(PropertyKey::Index(index), Value::int32(value), true)
            .unwrap(),
        Op::Delete(index) => {
            assert!(arr.delete(&PropertyKey::Index(index), true).unwrap());
        }
        Op::SetLength(len) => {
            assert!(arr
                .define_own_property(
                    &PropertyKey::length(),
                    PartialDescriptor::value(Value::from(len)),
                    true,
                )
                .unwrap());
        }
    }
}

fn snapshot(arr: &Rc<JsObject>) -> (u32, Vec<(String, Option<Value>)>) {
    let props = arr
        .own_properties()
        .map(|(key, desc)| (key.to_string(), desc.value().cloned()))
        .collect();
    (arr.get_length(), props)
}

/// Mostly small indices, with the full index range and its upper bound mixed in
fn any_index() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => 0u32..30_000,
        2 => 0u32..=MAX_ARRAY_INDEX,
        1 => Just(MAX_ARRAY_INDEX),
    ]
}

fn always_sparse() -> StorageLimits {
    StorageLimits {
        dense_ceiling: 0,
        ..StorageLimits::default()
    }
}

proptest! {
    #[test]
    fn storage_reads_back_last_write(
        writes in proptest::collection::vec((any_index(), any::<i32>()), 1..64),
    ) {
        let mut storage = ArrayStorage::new(0);
        let mut expected = std::collections::BTreeMap::new();
        for &(index, value) in &writes {
            storage.write(index, PropertyDescriptor::data(Value::int32(value)));
            expected.insert(index, value);
        }

        prop_assert_eq!(storage.occupied_count(), expected.len());
        prop_assert_eq!(
            storage.occupied_indices(),
            expected.keys().copied().collect::<Vec<_>>()
        );
        for (&index, &value) in &expected {
            prop_assert_eq!(
                storage.read(index).and_then(PropertyDescriptor::value),
                Some(&Value::int32(value))
            );
        }
    }

    #[test]
    fn array_reads_back_any_index(index in any_index(), value in any::<i32>()) {
        let arr = Rc::new(JsObject::array(0));
        arr.set_index_value(index, Value::int32(value), true).unwrap();

        prop_assert_eq!(arr.try_get_value(index).unwrap(), Some(Value::int32(value)));
        prop_assert_eq!(arr.get_length(), index + 1);
    }

    #[test]
    fn representation_is_unobservable(ops in proptest::collection::vec(op(), 0..48)) {
        let adaptive = Rc::new(JsObject::array(0));
        let sparse = Rc::new(JsObject::array_with_limits(None, 0, always_sparse()));
        prop_assert!(!sparse.elements().unwrap().is_dense());

        for op in &ops {
            apply(&adaptive, op);
            apply(&sparse, op);
            prop_assert_eq!(snapshot(&adaptive), snapshot(&sparse));
        }
    }

    #[test]
    fn length_covers_every_element(ops in proptest::collection::vec(op(), 0..48)) {
        let arr = Rc::new(JsObject::array(0));
        for op in &ops {
            let before = arr.get_length();
            apply(&arr, op);

            let len = arr.get_length();
            if let Some(&highest) = arr.elements().unwrap().occupied_indices().last() {
                prop_assert!(highest < len);
            }
            match *op {
                Op::Put(..) | Op::Delete(_) => prop_assert!(len >= before),
                Op::SetLength(new_len) => prop_assert_eq!(len, new_len),
            }
        }
    }

    #[test]
    fn sparse_never_returns_to_dense(ops in proptest::collection::vec(op(), 0..48)) {
        let arr = Rc::new(JsObject::array(0));
        arr.put(PropertyKey::Index(50_000), Value::null(), true).unwrap();
        for op in &ops {
            apply(&arr, op);
            prop_assert!(!arr.elements().unwrap().is_dense());
        }
    }

    #[test]
    fn smallest_index_never_overshoots(indices in proptest::collection::vec(0u32..100_000, 1..150)) {
        let mut storage = ArrayStorage::new(0);
        for &index in &indices {
            storage.write(index, PropertyDescriptor::data(Value::undefined()));
        }
        let smallest = indices.iter().copied().min().unwrap_or(0);
        prop_assert!(storage.smallest_occupied_index() <= smallest);
    }
}
