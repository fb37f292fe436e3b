// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The terminal layout: an ordered map from index to value. Every index in
//! `0..2^53 - 1` is supported and absent keys are holes. Arrays never leave
//! this layout except by being truncated to length zero.

use std::collections::BTreeMap;

use super::{AccessMode, ArrayLayout, ScriptArray};
use crate::{
    ecmascript::{
        builtins::array::ArrayHost,
        execution::JsResult,
        types::{MAX_SAFE_INTEGER, Value},
    },
    heap::element_array::BackingStore,
};

#[derive(Debug, Clone, Default)]
pub struct SparseElements {
    elements: BTreeMap<i64, Value>,
}

impl SparseElements {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: i64) -> Option<&Value> {
        self.elements.get(&index)
    }

    pub(crate) fn insert(&mut self, index: i64, value: Value) {
        self.elements.insert(index, value);
    }

    pub(crate) fn remove(&mut self, index: i64) -> Option<Value> {
        self.elements.remove(&index)
    }

    /// Moves every key at or above `from` by `delta`. Keys below `from`
    /// must stay below the moved ones.
    fn rekey_from(&mut self, from: i64, delta: i64) {
        let moved = self.elements.split_off(&from);
        self.elements
            .extend(moved.into_iter().map(|(index, value)| (index + delta, value)));
    }
}

fn elements<H: ArrayHost + ?Sized>(host: &H) -> &SparseElements {
    match host.elements() {
        BackingStore::Sparse(elements) => elements,
        elements => unreachable!("sparse layout over {elements:?}"),
    }
}

fn elements_mut<H: ArrayHost + ?Sized>(host: &mut H) -> &mut SparseElements {
    match host.elements_mut() {
        BackingStore::Sparse(elements) => elements,
        elements => unreachable!("sparse layout over {elements:?}"),
    }
}

/// Moves every element of `array` into a sparse map. Any layout can be
/// converted.
pub(super) fn convert<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
) -> ScriptArray {
    let mut sparse = SparseElements::default();
    for element_index in array.own_element_indices(host) {
        sparse.insert(element_index, array.get_element(host, element_index));
    }
    *host.elements_mut() = BackingStore::Sparse(sparse);
    host.set_used_length(0);
    host.set_index_offset(0);
    host.set_array_offset(0);
    host.set_hole_count(0);
    array.transition(host, ArrayLayout::Sparse, index)
}

pub(super) fn find_element<H: ArrayHost + ?Sized>(host: &H, index: i64) -> Option<Value> {
    elements(host).get(index).cloned()
}

pub(super) fn access_mode<H: ArrayHost + ?Sized>(host: &H, index: i64) -> AccessMode {
    if elements(host).get(index).is_some() {
        AccessMode::InBoundsFast
    } else if (0..MAX_SAFE_INTEGER).contains(&index) {
        AccessMode::Supported
    } else {
        AccessMode::Unsupported
    }
}

pub(super) fn write_element<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
    value: Value,
) -> JsResult<ScriptArray> {
    elements_mut(host).insert(index, value);
    let length = index as u64 + 1;
    if length > host.length() {
        host.set_length(length);
    }
    Ok(array)
}

pub(super) fn delete_element<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
) -> ScriptArray {
    elements_mut(host).remove(index);
    array
}

pub(super) fn set_length_less<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    length: u64,
) -> ScriptArray {
    let length_key = length as i64;
    elements_mut(host).elements.retain(|&index, _| index < length_key);
    host.set_length(length);
    array
}

pub(super) fn add_range<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    offset: i64,
    size: i64,
) -> ScriptArray {
    elements_mut(host).rekey_from(offset, size);
    host.set_length(host.length() + size as u64);
    array
}

pub(super) fn remove_range<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    start: i64,
    end: i64,
) -> ScriptArray {
    let sparse = elements_mut(host);
    let mut removed = sparse.elements.split_off(&start);
    let above = removed.split_off(&end);
    sparse
        .elements
        .extend(above.into_iter().map(|(index, value)| (index - (end - start), value)));
    host.set_length(host.length() - (end - start) as u64);
    array
}

pub(super) fn element_bounds<H: ArrayHost + ?Sized>(host: &H) -> Option<(i64, i64)> {
    let elements = &elements(host).elements;
    let (&first, _) = elements.first_key_value()?;
    let (&last, _) = elements.last_key_value()?;
    Some((first, last))
}

pub(super) fn next_element_index<H: ArrayHost + ?Sized>(host: &H, index: i64) -> i64 {
    elements(host)
        .elements
        .range(index.saturating_add(1)..)
        .next()
        .map_or(super::NO_MORE_ELEMENTS, |(&next, _)| next)
}

pub(super) fn previous_element_index<H: ArrayHost + ?Sized>(host: &H, index: i64) -> i64 {
    elements(host)
        .elements
        .range(..index)
        .next_back()
        .map_or(-1, |(&previous, _)| previous)
}

pub(super) fn element_count<H: ArrayHost + ?Sized>(host: &H) -> u64 {
    elements(host).len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::builtins::array::{ArrayHeapData, NO_MORE_ELEMENTS};

    fn sparse_array(indices: &[i64]) -> (ScriptArray, ArrayHeapData) {
        let mut host = ArrayHeapData::default();
        let mut array = ScriptArray::EMPTY;
        for &index in indices {
            array = array
                .set_element(&mut host, index, Value::Integer(index as i32), true)
                .unwrap();
        }
        assert!(array.is_sparse());
        (array, host)
    }

    #[test]
    fn far_writes_stay_sparse() {
        let (array, host) = sparse_array(&[1_000_000, 7, 2_000_000]);
        assert_eq!(host.length, 2_000_001);
        assert_eq!(array.get_element(&host, 7), Value::Integer(7));
        assert_eq!(array.get_element(&host, 500), Value::Undefined);
        assert_eq!(array.element_count(&host), 3);
        assert_eq!(array.next_element_index(&host, 7), 1_000_000);
        assert_eq!(array.previous_element_index(&host, 1_000_000), 7);
        assert_eq!(array.next_element_index(&host, 2_000_000), NO_MORE_ELEMENTS);
    }

    #[test]
    fn dense_arrays_convert_on_far_writes() {
        let mut host = ArrayHeapData::default();
        let mut array = ScriptArray::EMPTY;
        for index in 0..4 {
            array = array
                .set_element(&mut host, index, Value::Integer(index as i32), true)
                .unwrap();
        }
        let array = array.delete_element(&mut host, 1, true).unwrap();
        let array = array
            .set_element(&mut host, 100_000, Value::Null, true)
            .unwrap();
        assert!(array.is_sparse());
        assert_eq!(array.own_element_indices(&host), vec![0, 2, 3, 100_000]);
        assert!(matches!(host.elements, BackingStore::Sparse(_)));
        assert_eq!(host.used_length, 0);
    }

    #[test]
    fn ranges_rekey_the_map() {
        let (array, mut host) = sparse_array(&[10_000, 20_000, 30_000]);
        let array = array.add_range(&mut host, 15_000, 5).unwrap();
        assert_eq!(array.own_element_indices(&host), vec![10_000, 20_005, 30_005]);
        assert_eq!(host.length, 30_006);
        let array = array.remove_range(&mut host, 10_000, 20_000).unwrap();
        assert_eq!(array.own_element_indices(&host), vec![10_005, 20_005]);
        assert_eq!(array.get_element(&host, 10_005), Value::Integer(20_000));
        assert_eq!(host.length, 20_006);
    }

    #[test]
    fn truncation_drops_the_tail() {
        let (array, mut host) = sparse_array(&[10_000, 14_999, 15_000, 20_000]);
        let array = array.set_length(&mut host, 15_000, true).unwrap();
        assert!(array.is_sparse());
        assert_eq!(array.last_element_index(&host), 14_999);
        assert!(!array.has_element(&host, 15_000));
        assert_eq!(array.element_count(&host), 2);
        assert_eq!(host.length, 15_000);
    }
}
