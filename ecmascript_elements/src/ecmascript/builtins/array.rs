// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)

pub mod abstract_operations;
mod data;
mod script_array;

use core::fmt;
use std::rc::Rc;

pub use data::{ArrayHeapData, ArrayHost};
pub use script_array::{
    AccessMode, ArrayLayout, CaptureGroups, IntegrityLevel, LazyMatchResult, MatchResultSource,
    NO_MORE_ELEMENTS, ScriptArray, SparseElements,
};

use crate::{
    ecmascript::{
        execution::{ExceptionType, JsResult, Options, throw_exception},
        types::{MAX_SAFE_INTEGER, Value, canonicalize_nan},
    },
    heap::element_array::{BackingStore, ElementType},
};

use self::abstract_operations::to_array_length;

/// An array: its element record together with the strategy currently laid
/// over it. Every operation adopts the strategy the previous one returned.
#[derive(Debug, Clone, Default)]
pub struct Array {
    data: ArrayHeapData,
    strategy: ScriptArray,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            data: ArrayHeapData::with_options(options),
            strategy: ScriptArray::EMPTY,
        }
    }

    /// An array of `length` holes.
    pub fn with_length(length: u64) -> JsResult<Self> {
        if length > MAX_SAFE_INTEGER as u64 {
            return Err(throw_exception(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        let mut array = Self::new();
        array.data.length = length;
        Ok(array)
    }

    fn constant(elements: BackingStore, layout: ArrayLayout) -> Self {
        Self {
            data: ArrayHeapData {
                length: elements.capacity() as u64,
                elements,
                ..Default::default()
            },
            strategy: ScriptArray::new(layout),
        }
    }

    /// An array literal: the elements are kept in the narrowest shared
    /// constant store that holds them all.
    pub fn from_values(values: &[Value]) -> Self {
        let Some(element_type) = values
            .iter()
            .map(ElementType::for_value)
            .reduce(ElementType::generalize)
        else {
            return Self::new();
        };
        match element_type {
            ElementType::Int => {
                let ints = values
                    .iter()
                    .filter_map(Value::as_f64)
                    .map(|value| value as i32);
                if values.iter().all(|value| {
                    value
                        .as_f64()
                        .is_some_and(|value| (f64::from(i8::MIN)..=f64::from(i8::MAX)).contains(&value))
                }) {
                    let bytes: Rc<[i8]> = ints.map(|value| value as i8).collect();
                    Self::constant(BackingStore::ConstantByte(bytes), ArrayLayout::ConstantByte)
                } else {
                    Self::constant(
                        BackingStore::ConstantInt(ints.collect()),
                        ArrayLayout::ConstantInt,
                    )
                }
            }
            ElementType::Double => {
                let doubles = values
                    .iter()
                    .filter_map(Value::as_f64)
                    .map(canonicalize_nan)
                    .collect();
                Self::constant(
                    BackingStore::ConstantDouble(doubles),
                    ArrayLayout::ConstantDouble,
                )
            }
            ElementType::JsObject | ElementType::Object => Self::constant(
                BackingStore::ConstantObject(values.into()),
                ArrayLayout::ConstantObject,
            ),
        }
    }

    /// An array literal with elisions, such as `[1, , 3]`.
    pub fn from_values_with_holes(values: &[Option<Value>]) -> Self {
        if values.iter().all(Option::is_some) {
            let values: Vec<Value> = values.iter().flatten().cloned().collect();
            return Self::from_values(&values);
        }
        if values.iter().all(Option::is_none) {
            let mut array = Self::new();
            array.data.length = values.len() as u64;
            return array;
        }
        Self::constant(
            BackingStore::ConstantHolesObject(values.into()),
            ArrayLayout::ConstantHolesObject,
        )
    }

    /// The result array of a successful match. Groups become strings when
    /// they are first read.
    pub fn from_match_result(source: impl MatchResultSource + 'static) -> Self {
        Self::constant(
            BackingStore::LazyMatch(Rc::new(LazyMatchResult::new(source))),
            ArrayLayout::LazyMatchResult,
        )
    }

    /// Replaces the allocation and tracing options, for example to bound
    /// the stores of a literal.
    pub fn set_options(&mut self, options: Options) {
        self.data.options = options;
    }

    pub fn strategy(&self) -> ScriptArray {
        self.strategy
    }

    pub fn layout(&self) -> ArrayLayout {
        self.strategy.layout()
    }

    pub fn data(&self) -> &ArrayHeapData {
        &self.data
    }

    pub fn len(&self) -> u64 {
        self.data.length
    }

    pub fn is_empty(&self) -> bool {
        self.data.length == 0
    }

    pub fn hole_count(&self) -> u32 {
        self.data.hole_count
    }

    pub fn get(&self, index: i64) -> Value {
        self.strategy.get_element(&self.data, index)
    }

    pub fn has(&self, index: i64) -> bool {
        self.strategy.has_element(&self.data, index)
    }

    pub fn set(&mut self, index: i64, value: impl Into<Value>, strict: bool) -> JsResult<()> {
        self.strategy = self
            .strategy
            .set_element(&mut self.data, index, value.into(), strict)?;
        Ok(())
    }

    pub fn delete(&mut self, index: i64, strict: bool) -> JsResult<()> {
        self.strategy = self.strategy.delete_element(&mut self.data, index, strict)?;
        Ok(())
    }

    pub fn set_length(&mut self, length: u64, strict: bool) -> JsResult<()> {
        self.strategy = self.strategy.set_length(&mut self.data, length, strict)?;
        Ok(())
    }

    /// `array.length = value`, including the conversion of `value`.
    pub fn set_length_from_value(&mut self, value: &Value, strict: bool) -> JsResult<()> {
        let length = to_array_length(value)?;
        self.set_length(length, strict)
    }

    pub fn add_range(&mut self, offset: i64, size: i64) -> JsResult<()> {
        self.strategy = self.strategy.add_range(&mut self.data, offset, size)?;
        Ok(())
    }

    pub fn remove_range(&mut self, start: i64, end: i64) -> JsResult<()> {
        self.strategy = self.strategy.remove_range(&mut self.data, start, end)?;
        Ok(())
    }

    pub fn shift_range(&mut self, from: i64) -> JsResult<()> {
        self.strategy = self.strategy.shift_range(&mut self.data, from)?;
        Ok(())
    }

    pub fn first_element_index(&self) -> i64 {
        self.strategy.first_element_index(&self.data)
    }

    pub fn last_element_index(&self) -> i64 {
        self.strategy.last_element_index(&self.data)
    }

    pub fn next_element_index(&self, index: i64) -> i64 {
        self.strategy.next_element_index(&self.data, index)
    }

    pub fn previous_element_index(&self, index: i64) -> i64 {
        self.strategy.previous_element_index(&self.data, index)
    }

    pub fn element_count(&self) -> u64 {
        self.strategy.element_count(&self.data)
    }

    pub fn has_holes(&self) -> bool {
        self.strategy.has_holes(&self.data)
    }

    pub fn is_holes_type(&self) -> bool {
        self.strategy.is_holes_type()
    }

    pub fn access_mode(&self, index: i64) -> AccessMode {
        self.strategy.access_mode(&self.data, index)
    }

    pub fn own_element_indices(&self) -> Vec<i64> {
        self.strategy.own_element_indices(&self.data)
    }

    pub fn to_array(&self) -> JsResult<Vec<Value>> {
        self.strategy.to_array(&self.data)
    }

    /// Elements in index order as `(index, value)` pairs, skipping holes.
    pub fn iter(&self) -> impl Iterator<Item = (i64, Value)> + '_ {
        let mut index = -1;
        core::iter::from_fn(move || {
            index = self.next_element_index(index);
            (index != NO_MORE_ELEMENTS).then(|| (index, self.get(index)))
        })
    }

    pub fn integrity_level(&self) -> IntegrityLevel {
        self.strategy.integrity_level()
    }

    pub fn prevent_extensions(&mut self) {
        self.strategy = self.strategy.prevent_extensions();
    }

    pub fn seal(&mut self) {
        self.strategy = self.strategy.seal();
    }

    pub fn freeze(&mut self) {
        self.strategy = self.strategy.freeze();
    }

    pub fn set_length_not_writable(&mut self) {
        self.strategy = self.strategy.set_length_not_writable();
    }

    /// ### [23.1.3.18 Array.prototype.join ( separator )](https://tc39.es/ecma262/#sec-array.prototype.join)
    ///
    /// With the default separator. Holes, `undefined` and `null` join as
    /// empty strings.
    pub fn to_display_string(&self) -> String {
        let mut result = String::new();
        let mut separators = 0;
        for (index, value) in self.iter() {
            while separators < index {
                result.push(',');
                separators += 1;
            }
            result.push_str(&value.to_display_string());
        }
        let length = self.len() as i64;
        while separators < length - 1 {
            result.push(',');
            separators += 1;
        }
        result
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&[Value]> for Array {
    fn from(values: &[Value]) -> Self {
        Self::from_values(values)
    }
}
