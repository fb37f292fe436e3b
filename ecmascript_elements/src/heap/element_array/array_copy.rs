// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capacity growth and element kind conversions between backing stores.

use super::{BackingStore, DoubleElements, ElementKind, ElementType, IntElements};
use crate::ecmascript::{
    execution::{ExceptionType, JsResult, Options, throw_exception},
    types::{Object, Value},
};

fn check_allocation(minimum: usize, options: Options) -> JsResult<usize> {
    let max = options.max_array_size as usize;
    if minimum > max {
        return Err(throw_exception(
            ExceptionType::RangeError,
            "Array allocation exceeds maximum size",
        ));
    }
    Ok(max)
}

/// Capacity of a store grown to hold at least `minimum` slots: twice the
/// requirement, at least the initial array size and at most the maximum
/// array size.
pub(crate) fn grown_capacity(minimum: usize, options: Options) -> JsResult<usize> {
    let max = check_allocation(minimum, options)?;
    Ok(minimum
        .saturating_mul(2)
        .max(options.initial_array_size as usize)
        .min(max))
}

/// Capacity used when a range insertion reallocates.
pub(crate) fn next_power(minimum: usize, options: Options) -> JsResult<usize> {
    let max = check_allocation(minimum, options)?;
    Ok(minimum
        .checked_next_power_of_two()
        .unwrap_or(max)
        .max(options.initial_array_size as usize)
        .min(max))
}

/// Returns a store of `capacity` slots with `store` copied in starting at
/// `offset`. The remaining slots are holes.
pub(crate) fn resize<K: ElementKind>(
    store: &[K::Element],
    capacity: usize,
    offset: usize,
) -> Vec<K::Element> {
    debug_assert!(offset + store.len() <= capacity);
    let mut resized = K::holes(capacity);
    resized[offset..offset + store.len()].clone_from_slice(store);
    resized
}

fn int_to_double(store: &[i32]) -> Vec<f64> {
    store
        .iter()
        .map(|&element| {
            if IntElements::is_hole(&element) {
                DoubleElements::hole()
            } else {
                f64::from(element)
            }
        })
        .collect()
}

fn int_to_object(store: &[i32]) -> Vec<Option<Value>> {
    store
        .iter()
        .map(|element| (!IntElements::is_hole(element)).then_some(Value::Integer(*element)))
        .collect()
}

fn double_to_object(store: &[f64]) -> Vec<Option<Value>> {
    store
        .iter()
        .map(|element| {
            (!DoubleElements::is_hole(element)).then(|| DoubleElements::to_value(element))
        })
        .collect()
}

fn js_object_to_object(store: &[Option<Object>]) -> Vec<Option<Value>> {
    store.iter().map(|element| element.map(Value::Object)).collect()
}

/// Widens a writable store to a more general element kind. Holes stay holes
/// and every slot keeps its position.
pub(crate) fn widen_store(store: BackingStore, to: ElementType) -> BackingStore {
    match (store, to) {
        (store, to) if store.element_type() == Some(to) => store,
        (BackingStore::Int(store), ElementType::Double) => BackingStore::Double(int_to_double(&store)),
        (BackingStore::Int(store), ElementType::Object) => BackingStore::Object(int_to_object(&store)),
        (BackingStore::Double(store), ElementType::Object) => {
            BackingStore::Object(double_to_object(&store))
        }
        (BackingStore::JsObject(store), ElementType::Object) => {
            BackingStore::Object(js_object_to_object(&store))
        }
        (store, to) => unreachable!("cannot widen {:?} to {to:?}", store.element_type()),
    }
}

/// Copies a constant store into a writable store of the given kind. The
/// writable store has exactly as many slots as the constant one.
pub(crate) fn constant_to_writable(store: &BackingStore, to: ElementType) -> BackingStore {
    match (store, to) {
        (BackingStore::ConstantByte(bytes), ElementType::Int) => {
            BackingStore::Int(bytes.iter().map(|&byte| i32::from(byte)).collect())
        }
        (BackingStore::ConstantByte(bytes), ElementType::Double) => {
            BackingStore::Double(bytes.iter().map(|&byte| f64::from(byte)).collect())
        }
        (BackingStore::ConstantByte(bytes), ElementType::Object) => BackingStore::Object(
            bytes
                .iter()
                .map(|&byte| Some(Value::Integer(i32::from(byte))))
                .collect(),
        ),
        (BackingStore::ConstantInt(ints), ElementType::Int) => BackingStore::Int(ints.to_vec()),
        (BackingStore::ConstantInt(ints), ElementType::Double) => {
            BackingStore::Double(int_to_double(ints))
        }
        (BackingStore::ConstantInt(ints), ElementType::Object) => {
            BackingStore::Object(int_to_object(ints))
        }
        (BackingStore::ConstantDouble(doubles), ElementType::Double) => {
            BackingStore::Double(doubles.to_vec())
        }
        (BackingStore::ConstantDouble(doubles), ElementType::Object) => {
            BackingStore::Object(double_to_object(doubles))
        }
        (BackingStore::ConstantObject(values), ElementType::Object) => {
            BackingStore::Object(values.iter().cloned().map(Some).collect())
        }
        (BackingStore::ConstantHolesObject(values), ElementType::Object) => {
            BackingStore::Object(values.to_vec())
        }
        (BackingStore::LazyMatch(result), ElementType::Object) => {
            BackingStore::Object((0..result.len()).map(|index| Some(result.get(index))).collect())
        }
        (store, to) => unreachable!("cannot copy {store:?} into a {to:?} store"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::element_array::{INT_HOLE, ObjectElements};

    #[test]
    fn growth_doubles_within_bounds() {
        let options = Options::default();
        assert_eq!(grown_capacity(1, options).unwrap(), 8);
        assert_eq!(grown_capacity(9, options).unwrap(), 18);
        let small = Options {
            max_array_size: 20,
            ..Options::default()
        };
        assert_eq!(grown_capacity(15, small).unwrap(), 20);
        let error = grown_capacity(21, small).unwrap_err();
        assert_eq!(error.kind(), ExceptionType::RangeError);
    }

    #[test]
    fn next_power_rounds_up() {
        let options = Options::default();
        assert_eq!(next_power(3, options).unwrap(), 8);
        assert_eq!(next_power(9, options).unwrap(), 16);
        assert_eq!(next_power(64, options).unwrap(), 64);
    }

    #[test]
    fn resize_places_the_old_slots_at_the_offset() {
        let resized = resize::<IntElements>(&[1, 2], 5, 2);
        assert_eq!(resized, vec![INT_HOLE, INT_HOLE, 1, 2, INT_HOLE]);
    }

    #[test]
    fn widening_keeps_holes() {
        let widened = widen_store(BackingStore::Int(vec![1, INT_HOLE, 3]), ElementType::Double);
        let BackingStore::Double(store) = &widened else {
            panic!("expected a double store");
        };
        assert_eq!(store[0], 1.0);
        assert!(DoubleElements::is_hole(&store[1]));

        let widened = widen_store(widened, ElementType::Object);
        let store = ObjectElements::store(&widened);
        assert_eq!(store[0], Some(Value::Integer(1)));
        assert_eq!(store[1], None);
        assert_eq!(store[2], Some(Value::Integer(3)));
    }

    #[test]
    fn constants_copy_into_wider_stores() {
        let bytes = BackingStore::ConstantByte([1i8, -2].into());
        let BackingStore::Double(store) = constant_to_writable(&bytes, ElementType::Double) else {
            panic!("expected a double store");
        };
        assert_eq!(store, vec![1.0, -2.0]);

        let holes = BackingStore::ConstantHolesObject([None, Some(Value::Null)].into());
        let copied = constant_to_writable(&holes, ElementType::Object);
        assert_eq!(ObjectElements::store(&copied), &[None, Some(Value::Null)]);
    }
}
