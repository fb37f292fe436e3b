// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## Element storage strategies
//!
//! A [`ScriptArray`] names the layout of one array's elements plus the
//! array's integrity level. Layouts form a lattice, from the shared constant
//! stores through the writable dense and holes stores down to the sparse
//! map. An operation the current layout cannot serve moves the array to a
//! more general layout and retries there; the caller must adopt the returned
//! strategy.
//!
//! The only narrowing transitions are a holes array whose last hole gets
//! filled, which becomes dense again, and a contiguous array whose window
//! realigns with index zero.

pub(crate) mod constant;
pub(crate) mod lazy_match;
pub(crate) mod sparse;
pub(crate) mod writable;

use crate::{
    ecmascript::{
        execution::{ExceptionType, JsResult, throw_exception},
        types::{MAX_SAFE_INTEGER, Value},
    },
    heap::element_array::{BackingStore, ElementType, with_element_kind},
};

use super::ArrayHost;

pub use lazy_match::{CaptureGroups, LazyMatchResult, MatchResultSource};
pub use sparse::SparseElements;

/// Returned by [`ScriptArray::next_element_index`] once no element follows.
pub const NO_MORE_ELEMENTS: i64 = MAX_SAFE_INTEGER + 1;

/// Writes at or above this index never fit a positional layout.
pub(crate) const MAX_DENSE_INDEX: i64 = i32::MAX as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLayout {
    ConstantEmpty,
    ConstantByte,
    ConstantInt,
    ConstantDouble,
    ConstantObject,
    ConstantHolesObject,
    LazyMatchResult,
    /// Logical index equals physical slot.
    ZeroBased(ElementType),
    /// A dense window at an arbitrary offset into the store.
    Contiguous(ElementType),
    /// A window that may contain hole sentinels.
    Holes(ElementType),
    Sparse,
}

impl ArrayLayout {
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            ArrayLayout::ConstantEmpty
                | ArrayLayout::ConstantByte
                | ArrayLayout::ConstantInt
                | ArrayLayout::ConstantDouble
                | ArrayLayout::ConstantObject
                | ArrayLayout::ConstantHolesObject
                | ArrayLayout::LazyMatchResult
        )
    }

    /// Element kind of a writable layout.
    pub fn element_type(self) -> Option<ElementType> {
        match self {
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => Some(element_type),
            _ => None,
        }
    }
}

/// ### [7.3.15 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
///
/// Levels only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntegrityLevel {
    #[default]
    Extensible,
    NotExtensible,
    Sealed,
    Frozen,
}

/// How cheaply the current layout can serve a write at an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessMode {
    /// Inside the used window: a plain store.
    InBoundsFast,
    /// Inside the allocated store: bookkeeping but no reallocation.
    InBounds,
    /// Writable by this layout after growing or shifting the store.
    Supported,
    /// Requires a transition to a more general layout.
    Unsupported,
}

/// Host fields of an array in a constant layout. Constant stores are
/// reference counted, so saving one does not copy the elements.
struct ConstantState {
    elements: BackingStore,
    length: u64,
    used_length: u32,
    index_offset: i64,
    array_offset: u32,
    hole_count: u32,
}

impl ConstantState {
    fn save<H: ArrayHost + ?Sized>(host: &H) -> Self {
        Self {
            elements: host.elements().clone(),
            length: host.length(),
            used_length: host.used_length(),
            index_offset: host.index_offset(),
            array_offset: host.array_offset(),
            hole_count: host.hole_count(),
        }
    }

    fn restore<H: ArrayHost + ?Sized>(self, host: &mut H) {
        *host.elements_mut() = self.elements;
        host.set_length(self.length);
        host.set_used_length(self.used_length);
        host.set_index_offset(self.index_offset);
        host.set_array_offset(self.array_offset);
        host.set_hole_count(self.hole_count);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptArray {
    layout: ArrayLayout,
    integrity: IntegrityLevel,
    length_writable: bool,
}

impl Default for ScriptArray {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ScriptArray {
    pub const EMPTY: Self = Self::new(ArrayLayout::ConstantEmpty);

    pub const fn new(layout: ArrayLayout) -> Self {
        Self {
            layout,
            integrity: IntegrityLevel::Extensible,
            length_writable: true,
        }
    }

    pub fn layout(self) -> ArrayLayout {
        self.layout
    }

    pub fn integrity_level(self) -> IntegrityLevel {
        self.integrity
    }

    pub fn is_length_writable(self) -> bool {
        self.length_writable
    }

    pub fn is_frozen(self) -> bool {
        self.integrity == IntegrityLevel::Frozen
    }

    pub fn is_sealed(self) -> bool {
        self.integrity >= IntegrityLevel::Sealed
    }

    pub fn is_extensible(self) -> bool {
        self.integrity == IntegrityLevel::Extensible
    }

    pub fn is_holes_type(self) -> bool {
        matches!(
            self.layout,
            ArrayLayout::Holes(_) | ArrayLayout::ConstantHolesObject
        )
    }

    pub fn is_sparse(self) -> bool {
        self.layout == ArrayLayout::Sparse
    }

    pub fn prevent_extensions(self) -> Self {
        self.with_integrity(IntegrityLevel::NotExtensible)
    }

    pub fn seal(self) -> Self {
        self.with_integrity(IntegrityLevel::Sealed)
    }

    /// Freezing also makes `length` read-only.
    pub fn freeze(self) -> Self {
        Self {
            length_writable: false,
            ..self.with_integrity(IntegrityLevel::Frozen)
        }
    }

    pub fn set_length_not_writable(self) -> Self {
        Self {
            length_writable: false,
            ..self
        }
    }

    fn with_integrity(self, integrity: IntegrityLevel) -> Self {
        Self {
            integrity: self.integrity.max(integrity),
            ..self
        }
    }

    /// Switches to another layout, keeping the integrity level and the
    /// writability of `length`. Every layout change goes through here.
    pub(crate) fn transition<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        layout: ArrayLayout,
        index: i64,
    ) -> Self {
        let next = Self { layout, ..self };
        if host.options().trace_array_transitions {
            log::debug!(
                target: "array_transitions",
                "{:?} -> {:?} at index {index}",
                self.layout,
                layout
            );
        }
        host.notify_allocation_site(next);
        next
    }

    /// Runs a fallible operation that starts by leaving a constant layout.
    /// On failure the host gets the constant store and its fields back, so
    /// the caller's strategy still describes it.
    fn undo_on_error<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        operation: impl FnOnce(Self, &mut H) -> JsResult<Self>,
    ) -> JsResult<Self> {
        debug_assert!(self.layout.is_constant());
        let saved = ConstantState::save(host);
        let result = operation(self, host);
        if result.is_err() {
            saved.restore(host);
        }
        result
    }

    /// Drops the backing store, keeping `length`.
    pub(crate) fn reset_to_empty<H: ArrayHost + ?Sized>(self, host: &mut H, index: i64) -> Self {
        *host.elements_mut() = BackingStore::Empty;
        host.set_used_length(0);
        host.set_index_offset(0);
        host.set_array_offset(0);
        host.set_hole_count(0);
        if self.layout == ArrayLayout::ConstantEmpty {
            self
        } else {
            self.transition(host, ArrayLayout::ConstantEmpty, index)
        }
    }

    fn reject(self, strict: bool, message: &'static str) -> JsResult<Self> {
        if strict {
            Err(throw_exception(ExceptionType::TypeError, message))
        } else {
            Ok(self)
        }
    }

    pub fn length<H: ArrayHost + ?Sized>(self, host: &H) -> u64 {
        host.length()
    }

    pub fn access_mode<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> AccessMode {
        match self.layout {
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::access_mode::<K, H>(self.layout, host, index)
            }),
            ArrayLayout::Sparse => sparse::access_mode(host, index),
            _ => AccessMode::Unsupported,
        }
    }

    /// Reads an element; holes and indices outside the array read as
    /// `undefined`.
    pub fn get_element<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> Value {
        self.find_element(host, index).unwrap_or_default()
    }

    /// True if the index holds an element, as opposed to a hole.
    pub fn has_element<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> bool {
        self.find_element(host, index).is_some()
    }

    fn find_element<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> Option<Value> {
        if index < 0 {
            return None;
        }
        match self.layout {
            ArrayLayout::ConstantEmpty => None,
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::find_element::<K, H>(host, index)
            }),
            ArrayLayout::Sparse => sparse::find_element(host, index),
            _ => constant::find_element(host, index),
        }
    }

    /// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
    ///
    /// Element writes. A rejected write throws a TypeError in strict code
    /// and otherwise leaves the array untouched.
    pub fn set_element<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        index: i64,
        value: Value,
        strict: bool,
    ) -> JsResult<Self> {
        if !(0..MAX_SAFE_INTEGER).contains(&index) {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array index",
            ));
        }
        if self.is_frozen() {
            return self.reject(strict, "Cannot assign to element of frozen array");
        }
        if !self.length_writable && index as u64 >= host.length() {
            return self.reject(strict, "Cannot assign to read only property 'length' of array");
        }
        if !self.is_extensible() && !self.has_element(host, index) {
            return self.reject(strict, "Cannot add property, object is not extensible");
        }
        self.write_element(host, index, value)
    }

    /// Writes without integrity checks. Layouts that cannot hold the write
    /// transition and call back in here.
    pub(crate) fn write_element<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        index: i64,
        value: Value,
    ) -> JsResult<Self> {
        match self.layout {
            ArrayLayout::ConstantEmpty => self.undo_on_error(host, |array, host| {
                constant::write_empty(array, host, index, value)
            }),
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::write_element::<K, H>(self, host, index, value)
            }),
            ArrayLayout::Sparse => sparse::write_element(self, host, index, value),
            _ if index >= MAX_DENSE_INDEX => {
                let array = sparse::convert(self, host, index);
                array.write_element(host, index, value)
            }
            _ => self.undo_on_error(host, |array, host| {
                let element_type = ElementType::for_value(&value);
                constant::to_writable(array, host, element_type, index)
                    .write_element(host, index, value)
            }),
        }
    }

    /// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
    ///
    /// Deleting an absent element always succeeds.
    pub fn delete_element<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        index: i64,
        strict: bool,
    ) -> JsResult<Self> {
        if !self.has_element(host, index) {
            return Ok(self);
        }
        if self.is_sealed() {
            return self.reject(strict, "Cannot delete property of sealed array");
        }
        Ok(self.remove_element(host, index))
    }

    fn remove_element<H: ArrayHost + ?Sized>(self, host: &mut H, index: i64) -> Self {
        match self.layout {
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::delete_element::<K, H>(self, host, index)
            }),
            ArrayLayout::Sparse => sparse::delete_element(self, host, index),
            ArrayLayout::ConstantEmpty => self,
            _ => constant::promote(self, host, index).remove_element(host, index),
        }
    }

    /// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
    ///
    /// Shrinking deletes every element at or above the new length. Sealed
    /// arrays cannot lose elements: strict code gets a TypeError before
    /// anything changes, sloppy code gets the length clamped to just past the
    /// last element.
    pub fn set_length<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        length: u64,
        strict: bool,
    ) -> JsResult<Self> {
        // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError exception.
        if length > MAX_SAFE_INTEGER as u64 {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        let old_length = host.length();
        if length == old_length {
            return Ok(self);
        }
        // 12. If oldLenDesc.[[Writable]] is false, return false.
        if !self.length_writable {
            return self.reject(strict, "Cannot assign to read only property 'length' of array");
        }
        let mut length = length;
        if length < old_length && self.is_sealed() {
            let required = (self.last_element_index(host) + 1) as u64;
            if length < required {
                // 17.b. If deleteSucceeded is false, then
                // i. Set newLenDesc.[[Value]] to ! ToUint32(P) + 1𝔽.
                if strict {
                    return Err(throw_exception(
                        ExceptionType::TypeError,
                        "Cannot delete property of sealed array",
                    ));
                }
                length = required;
                if length == old_length {
                    return Ok(self);
                }
            }
        }
        Ok(self.truncate_or_grow(host, length))
    }

    fn truncate_or_grow<H: ArrayHost + ?Sized>(self, host: &mut H, length: u64) -> Self {
        if self.layout.is_constant() && self.layout != ArrayLayout::ConstantEmpty {
            return constant::promote(self, host, length as i64).truncate_or_grow(host, length);
        }
        if length >= host.length() {
            host.set_length(length);
            return self;
        }
        if length == 0 {
            host.set_length(0);
            return self.reset_to_empty(host, 0);
        }
        match self.layout {
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::set_length_less::<K, H>(self, host, length)
            }),
            ArrayLayout::Sparse => sparse::set_length_less(self, host, length),
            _ => {
                host.set_length(length);
                self
            }
        }
    }

    /// Inserts `size` absent slots at `offset`, shifting every element at or
    /// above `offset` up. Used by `Array.prototype.splice` and `unshift`.
    pub fn add_range<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        offset: i64,
        size: i64,
    ) -> JsResult<Self> {
        let length = host.length() as i64;
        if !(0..=length).contains(&offset) || size < 0 || size > MAX_SAFE_INTEGER - length {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        match self.integrity {
            IntegrityLevel::Frozen => {
                return Err(throw_exception(
                    ExceptionType::TypeError,
                    "Cannot add property of frozen array",
                ));
            }
            IntegrityLevel::Sealed => {
                return Err(throw_exception(
                    ExceptionType::TypeError,
                    "Cannot add property to sealed array",
                ));
            }
            IntegrityLevel::NotExtensible => {
                return Err(throw_exception(
                    ExceptionType::TypeError,
                    "Cannot add property, object is not extensible",
                ));
            }
            IntegrityLevel::Extensible => {}
        }
        if size == 0 {
            return Ok(self);
        }
        self.insert_range(host, offset, size)
    }

    pub(crate) fn insert_range<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        offset: i64,
        size: i64,
    ) -> JsResult<Self> {
        match self.layout {
            ArrayLayout::ConstantEmpty => {
                host.set_length(host.length() + size as u64);
                Ok(self)
            }
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::add_range::<K, H>(self, host, offset, size)
            }),
            ArrayLayout::Sparse => Ok(sparse::add_range(self, host, offset, size)),
            _ => self.undo_on_error(host, |array, host| {
                constant::promote(array, host, offset).insert_range(host, offset, size)
            }),
        }
    }

    /// Deletes the elements in `start..end` and shifts the elements above
    /// `end` down to `start`. `length` shrinks by `end - start`.
    pub fn remove_range<H: ArrayHost + ?Sized>(
        self,
        host: &mut H,
        start: i64,
        end: i64,
    ) -> JsResult<Self> {
        let length = host.length() as i64;
        if start < 0 || start > end || end > length {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        if self.is_sealed() {
            return Err(throw_exception(
                ExceptionType::TypeError,
                "Cannot delete property of sealed array",
            ));
        }
        if start == end {
            return Ok(self);
        }
        Ok(self.cut_range(host, start, end))
    }

    fn cut_range<H: ArrayHost + ?Sized>(self, host: &mut H, start: i64, end: i64) -> Self {
        match self.layout {
            ArrayLayout::ConstantEmpty => {
                host.set_length(host.length() - (end - start) as u64);
                self
            }
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::remove_range::<K, H>(self, host, start, end)
            }),
            ArrayLayout::Sparse => sparse::remove_range(self, host, start, end),
            _ => constant::promote(self, host, start).cut_range(host, start, end),
        }
    }

    /// Removes the first `from` elements, as `Array.prototype.shift` does
    /// for `from == 1`. Dense layouts only move their window offsets.
    pub fn shift_range<H: ArrayHost + ?Sized>(self, host: &mut H, from: i64) -> JsResult<Self> {
        self.remove_range(host, 0, from)
    }

    /// Index of the first element, or 0 when the array has none.
    pub fn first_element_index<H: ArrayHost + ?Sized>(self, host: &H) -> i64 {
        self.element_bounds(host).map_or(0, |(first, _)| first)
    }

    /// Index of the last element, or -1 when the array has none.
    pub fn last_element_index<H: ArrayHost + ?Sized>(self, host: &H) -> i64 {
        self.element_bounds(host).map_or(-1, |(_, last)| last)
    }

    fn element_bounds<H: ArrayHost + ?Sized>(self, host: &H) -> Option<(i64, i64)> {
        match self.layout {
            ArrayLayout::ConstantEmpty => None,
            ArrayLayout::ZeroBased(element_type)
            | ArrayLayout::Contiguous(element_type)
            | ArrayLayout::Holes(element_type) => with_element_kind!(element_type, K => {
                writable::element_bounds::<K, H>(host)
            }),
            ArrayLayout::Sparse => sparse::element_bounds(host),
            _ => constant::element_bounds(host),
        }
    }

    /// The smallest element index above `index`, or [`NO_MORE_ELEMENTS`].
    pub fn next_element_index<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> i64 {
        let Some((first, last)) = self.element_bounds(host) else {
            return NO_MORE_ELEMENTS;
        };
        if index < first {
            return first;
        }
        if index >= last {
            return NO_MORE_ELEMENTS;
        }
        match self.layout {
            ArrayLayout::Sparse => sparse::next_element_index(host, index),
            _ => (index + 1..=last)
                .find(|&candidate| self.has_element(host, candidate))
                .unwrap_or(NO_MORE_ELEMENTS),
        }
    }

    /// The largest element index below `index`, or -1.
    pub fn previous_element_index<H: ArrayHost + ?Sized>(self, host: &H, index: i64) -> i64 {
        let Some((first, last)) = self.element_bounds(host) else {
            return -1;
        };
        if index > last {
            return last;
        }
        if index <= first {
            return -1;
        }
        match self.layout {
            ArrayLayout::Sparse => sparse::previous_element_index(host, index),
            _ => (first..index)
                .rev()
                .find(|&candidate| self.has_element(host, candidate))
                .unwrap_or(-1),
        }
    }

    /// Number of elements, not counting holes.
    pub fn element_count<H: ArrayHost + ?Sized>(self, host: &H) -> u64 {
        match self.layout {
            ArrayLayout::ConstantEmpty => 0,
            ArrayLayout::ZeroBased(_) | ArrayLayout::Contiguous(_) | ArrayLayout::Holes(_) => {
                u64::from(host.used_length() - host.hole_count())
            }
            ArrayLayout::Sparse => sparse::element_count(host),
            _ => constant::element_count(host),
        }
    }

    /// True if some index below `length` has no element.
    pub fn has_holes<H: ArrayHost + ?Sized>(self, host: &H) -> bool {
        self.element_count(host) < host.length()
    }

    /// Element indices in ascending order.
    pub fn own_element_indices<H: ArrayHost + ?Sized>(self, host: &H) -> Vec<i64> {
        let mut indices = Vec::with_capacity(self.element_count(host) as usize);
        let mut index = self.next_element_index(host, -1);
        while index != NO_MORE_ELEMENTS {
            indices.push(index);
            index = self.next_element_index(host, index);
        }
        indices
    }

    /// Every slot below `length`, holes as `undefined`.
    pub fn to_array<H: ArrayHost + ?Sized>(self, host: &H) -> JsResult<Vec<Value>> {
        let length = host.length();
        if length > u64::from(host.options().max_array_size) {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        let mut values = vec![Value::Undefined; length as usize];
        for index in self.own_element_indices(host) {
            values[index as usize] = self.get_element(host, index);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ecmascript::{builtins::array::ArrayHeapData, execution::Options},
        heap::element_array::BackingStore,
    };

    /// Host that records every strategy it is notified about.
    #[derive(Default)]
    struct RecordingHost {
        data: ArrayHeapData,
        transitions: Vec<ArrayLayout>,
    }

    impl ArrayHost for RecordingHost {
        fn length(&self) -> u64 {
            self.data.length
        }
        fn set_length(&mut self, length: u64) {
            self.data.length = length;
        }
        fn used_length(&self) -> u32 {
            self.data.used_length
        }
        fn set_used_length(&mut self, used_length: u32) {
            self.data.used_length = used_length;
        }
        fn index_offset(&self) -> i64 {
            self.data.index_offset
        }
        fn set_index_offset(&mut self, index_offset: i64) {
            self.data.index_offset = index_offset;
        }
        fn array_offset(&self) -> u32 {
            self.data.array_offset
        }
        fn set_array_offset(&mut self, array_offset: u32) {
            self.data.array_offset = array_offset;
        }
        fn hole_count(&self) -> u32 {
            self.data.hole_count
        }
        fn set_hole_count(&mut self, hole_count: u32) {
            self.data.hole_count = hole_count;
        }
        fn elements(&self) -> &BackingStore {
            &self.data.elements
        }
        fn elements_mut(&mut self) -> &mut BackingStore {
            &mut self.data.elements
        }
        fn notify_allocation_site(&mut self, array: ScriptArray) {
            self.transitions.push(array.layout());
        }
    }

    #[test]
    fn transitions_are_reported_to_the_host() {
        let mut host = RecordingHost::default();
        let array = ScriptArray::EMPTY;
        let array = array.set_element(&mut host, 0, Value::Integer(5), true).unwrap();
        let array = array.set_element(&mut host, 1, Value::Number(3.5), true).unwrap();
        let array = array.set_element(&mut host, 2, Value::from("x"), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Object));
        assert_eq!(
            host.transitions,
            vec![
                ArrayLayout::ZeroBased(ElementType::Int),
                ArrayLayout::ZeroBased(ElementType::Double),
                ArrayLayout::ZeroBased(ElementType::Object),
            ]
        );
    }

    #[test]
    fn integrity_survives_transitions() {
        let mut host = ArrayHeapData::default();
        let array = ScriptArray::EMPTY
            .set_element(&mut host, 0, Value::Integer(1), true)
            .unwrap()
            .seal();
        let array = array.set_element(&mut host, 0, Value::from("a"), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Object));
        assert_eq!(array.integrity_level(), IntegrityLevel::Sealed);
        assert!(array.is_length_writable());
    }

    #[test]
    fn integrity_levels_only_increase() {
        let array = ScriptArray::EMPTY.freeze().prevent_extensions();
        assert!(array.is_frozen());
        assert!(!array.is_length_writable());
        let array = ScriptArray::EMPTY.seal().prevent_extensions();
        assert_eq!(array.integrity_level(), IntegrityLevel::Sealed);
    }

    #[test]
    fn index_validation() {
        let mut host = ArrayHeapData::default();
        let error = ScriptArray::EMPTY
            .set_element(&mut host, -1, Value::Null, false)
            .unwrap_err();
        assert_eq!(error.kind(), ExceptionType::RangeError);
        let error = ScriptArray::EMPTY
            .set_length(&mut host, MAX_SAFE_INTEGER as u64 + 1, false)
            .unwrap_err();
        assert_eq!(error.kind(), ExceptionType::RangeError);
        assert_eq!(host.length, 0);
    }

    #[test]
    fn access_modes_nest() {
        let mut host = ArrayHeapData::with_options(Options {
            max_array_hole_size: 16,
            ..Options::default()
        });
        let mut array = ScriptArray::EMPTY;
        for index in 0..3 {
            array = array
                .set_element(&mut host, index, Value::Integer(index as i32), true)
                .unwrap();
        }
        assert_eq!(array.access_mode(&host, 1), AccessMode::InBoundsFast);
        assert_eq!(array.access_mode(&host, 3), AccessMode::InBounds);
        assert_eq!(array.access_mode(&host, 4), AccessMode::Unsupported);
        array = array.set_element(&mut host, 5, Value::Integer(5), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Holes(ElementType::Int));
        assert_eq!(array.access_mode(&host, 4), AccessMode::InBoundsFast);
        assert_eq!(array.access_mode(&host, 12), AccessMode::Supported);
        assert_eq!(array.access_mode(&host, 40), AccessMode::Unsupported);
    }
}
