// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constant layouts: shared stores that are read in place and copied into a
//! writable store by the first mutation.

use super::{ArrayLayout, MAX_DENSE_INDEX, ScriptArray, SparseElements, writable};
use crate::{
    ecmascript::{
        builtins::array::ArrayHost,
        execution::JsResult,
        types::Value,
    },
    heap::element_array::{
        BackingStore, DoubleElements, ElementKind, ElementType, ObjectElements,
        array_copy::constant_to_writable, with_element_kind,
    },
};

/// Element kind a constant layout is promoted to when the written value
/// fits it.
fn constant_kind(layout: ArrayLayout) -> ElementType {
    match layout {
        ArrayLayout::ConstantByte | ArrayLayout::ConstantInt => ElementType::Int,
        ArrayLayout::ConstantDouble => ElementType::Double,
        _ => ElementType::Object,
    }
}

pub(super) fn find_element<H: ArrayHost + ?Sized>(host: &H, index: i64) -> Option<Value> {
    let slot = usize::try_from(index).ok()?;
    match host.elements() {
        BackingStore::ConstantByte(elements) => elements
            .get(slot)
            .map(|&element| Value::Integer(i32::from(element))),
        BackingStore::ConstantInt(elements) => {
            elements.get(slot).map(|&element| Value::Integer(element))
        }
        BackingStore::ConstantDouble(elements) => elements.get(slot).map(DoubleElements::to_value),
        BackingStore::ConstantObject(elements) => elements.get(slot).cloned(),
        BackingStore::ConstantHolesObject(elements) => elements.get(slot).cloned().flatten(),
        BackingStore::LazyMatch(result) => (slot < result.len()).then(|| result.get(slot)),
        _ => None,
    }
}

pub(super) fn element_bounds<H: ArrayHost + ?Sized>(host: &H) -> Option<(i64, i64)> {
    match host.elements() {
        BackingStore::ConstantHolesObject(elements) => {
            let first = elements.iter().position(Option::is_some)?;
            let last = elements.iter().rposition(Option::is_some)?;
            Some((first as i64, last as i64))
        }
        elements => {
            let len = elements.capacity() as i64;
            (len > 0).then_some((0, len - 1))
        }
    }
}

pub(super) fn element_count<H: ArrayHost + ?Sized>(host: &H) -> u64 {
    match host.elements() {
        BackingStore::ConstantHolesObject(elements) => {
            elements.iter().filter(|element| element.is_some()).count() as u64
        }
        elements => elements.capacity() as u64,
    }
}

/// First write into an array without elements. Index zero starts a
/// zero-based store, a nearby index a contiguous window at that index, and
/// anything further away the sparse map.
pub(super) fn write_empty<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
    value: Value,
) -> JsResult<ScriptArray> {
    let options = host.options();
    let element_type = ElementType::for_value(&value);
    let layout = if index == 0 {
        ArrayLayout::ZeroBased(element_type)
    } else if index < i64::from(options.max_array_hole_size) && index < MAX_DENSE_INDEX {
        ArrayLayout::Contiguous(element_type)
    } else {
        ArrayLayout::Sparse
    };
    let (elements, index_offset) = match layout.element_type() {
        Some(element_type) => with_element_kind!(element_type, K => {
            (K::wrap(K::holes(options.initial_array_size as usize)), index)
        }),
        None => (BackingStore::Sparse(SparseElements::default()), 0),
    };
    *host.elements_mut() = elements;
    host.set_index_offset(index_offset);
    host.set_array_offset(0);
    host.set_used_length(0);
    host.set_hole_count(0);
    array
        .transition(host, layout, index)
        .write_element(host, index, value)
}

/// Promotes to the writable layout whose element kind holds both the
/// constant's elements and `value_type`.
pub(super) fn to_writable<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    value_type: ElementType,
    index: i64,
) -> ScriptArray {
    let element_type = constant_kind(array.layout()).generalize(value_type);
    let elements = constant_to_writable(host.elements(), element_type);
    let (array_offset, used_length, hole_count) = match &elements {
        BackingStore::Object(slots) if array.layout() == ArrayLayout::ConstantHolesObject => {
            match (
                slots.iter().position(Option::is_some),
                slots.iter().rposition(Option::is_some),
            ) {
                (Some(first), Some(last)) => {
                    let window = &slots[first..=last];
                    let holes = window.iter().filter(|slot| ObjectElements::is_hole(slot));
                    (first, window.len(), holes.count())
                }
                _ => (0, 0, 0),
            }
        }
        elements => (0, elements.capacity(), 0),
    };
    *host.elements_mut() = elements;
    host.set_index_offset(0);
    host.set_array_offset(array_offset as u32);
    host.set_used_length(used_length as u32);
    host.set_hole_count(hole_count as u32);
    with_element_kind!(element_type, K => writable::debug_check_window::<K, H>(host));
    let layout = if hole_count > 0 {
        ArrayLayout::Holes(element_type)
    } else if array_offset == 0 {
        ArrayLayout::ZeroBased(element_type)
    } else {
        ArrayLayout::Contiguous(element_type)
    };
    array.transition(host, layout, index)
}

/// Promotes to the writable layout of the constant's own element kind.
pub(super) fn promote<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
) -> ScriptArray {
    to_writable(array, host, constant_kind(array.layout()), index)
}
