// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backing stores for array elements.
//!
//! A writable store is a `Vec` whose length is its capacity: every slot is
//! initialised, and slots outside the used window always hold the hole
//! sentinel of their element kind. Constant stores are shared slices that are
//! never written through.

pub(crate) mod array_copy;

use std::rc::Rc;

use crate::ecmascript::{
    builtins::array::{LazyMatchResult, SparseElements},
    types::{Number, Object, Value},
};

/// Hole marker of `i32` stores. Writing this value into an int store widens
/// the store to the object kind instead.
pub const INT_HOLE: i32 = i32::MIN;

/// Hole marker of `f64` stores: a signalling NaN that ordinary arithmetic
/// never produces. Every NaN written into a double store is canonicalised
/// first, so the pattern stays unambiguous.
pub const DOUBLE_HOLE_BITS: u64 = 0x7FF4_0000_0000_0000;

/// Element kinds of writable stores, ordered by generality.
///
/// `Int < Double < Object` and `JsObject < Object`; `Int` and `JsObject` (or
/// `Double` and `JsObject`) only meet at `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int,
    Double,
    JsObject,
    Object,
}

impl ElementType {
    /// Narrowest element kind able to store the value.
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Integer(INT_HOLE) => ElementType::Object,
            Value::Integer(_) => ElementType::Int,
            Value::Number(number) => match Number::from_f64(*number) {
                Number::Integer(INT_HOLE) | Number::Number(_) => ElementType::Double,
                Number::Integer(_) => ElementType::Int,
            },
            Value::Object(_) => ElementType::JsObject,
            _ => ElementType::Object,
        }
    }

    /// Least general kind that can hold elements of both kinds.
    pub fn generalize(self, other: Self) -> Self {
        use ElementType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Int, Double) | (Double, Int) => Double,
            _ => Object,
        }
    }

    pub fn can_hold(self, other: Self) -> bool {
        self.generalize(other) == self
    }
}

/// Physical storage of an array's elements.
#[derive(Debug, Clone, Default)]
pub enum BackingStore {
    #[default]
    Empty,
    ConstantByte(Rc<[i8]>),
    ConstantInt(Rc<[i32]>),
    ConstantDouble(Rc<[f64]>),
    ConstantObject(Rc<[Value]>),
    ConstantHolesObject(Rc<[Option<Value>]>),
    LazyMatch(Rc<LazyMatchResult>),
    Int(Vec<i32>),
    Double(Vec<f64>),
    JsObject(Vec<Option<Object>>),
    Object(Vec<Option<Value>>),
    Sparse(SparseElements),
}

impl BackingStore {
    /// Number of physical slots. Zero for sparse and empty stores.
    pub fn capacity(&self) -> usize {
        match self {
            BackingStore::Empty | BackingStore::Sparse(_) => 0,
            BackingStore::ConstantByte(elements) => elements.len(),
            BackingStore::ConstantInt(elements) => elements.len(),
            BackingStore::ConstantDouble(elements) => elements.len(),
            BackingStore::ConstantObject(elements) => elements.len(),
            BackingStore::ConstantHolesObject(elements) => elements.len(),
            BackingStore::LazyMatch(result) => result.len(),
            BackingStore::Int(elements) => elements.len(),
            BackingStore::Double(elements) => elements.len(),
            BackingStore::JsObject(elements) => elements.len(),
            BackingStore::Object(elements) => elements.len(),
        }
    }

    /// Element kind of a writable store.
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            BackingStore::Int(_) => Some(ElementType::Int),
            BackingStore::Double(_) => Some(ElementType::Double),
            BackingStore::JsObject(_) => Some(ElementType::JsObject),
            BackingStore::Object(_) => Some(ElementType::Object),
            _ => None,
        }
    }

    pub(crate) fn take(&mut self) -> BackingStore {
        core::mem::take(self)
    }
}

/// Static description of one writable element kind.
///
/// Every writable strategy is generic over an `ElementKind`; the kinds
/// themselves are zero-sized markers.
pub trait ElementKind: 'static {
    type Element: Clone + core::fmt::Debug;

    const TYPE: ElementType;

    fn hole() -> Self::Element;

    fn is_hole(element: &Self::Element) -> bool;

    /// Converts a value into a storable element, or `None` if the store must
    /// be widened first.
    fn from_value(value: &Value) -> Option<Self::Element>;

    /// Reads a non-hole element.
    fn to_value(element: &Self::Element) -> Value;

    fn store(elements: &BackingStore) -> &[Self::Element];

    fn store_mut(elements: &mut BackingStore) -> &mut Vec<Self::Element>;

    fn wrap(store: Vec<Self::Element>) -> BackingStore;

    fn holes(capacity: usize) -> Vec<Self::Element> {
        vec![Self::hole(); capacity]
    }
}

#[derive(Debug)]
pub enum IntElements {}

#[derive(Debug)]
pub enum DoubleElements {}

#[derive(Debug)]
pub enum JsObjectElements {}

#[derive(Debug)]
pub enum ObjectElements {}

impl ElementKind for IntElements {
    type Element = i32;

    const TYPE: ElementType = ElementType::Int;

    fn hole() -> i32 {
        INT_HOLE
    }

    fn is_hole(element: &i32) -> bool {
        *element == INT_HOLE
    }

    fn from_value(value: &Value) -> Option<i32> {
        let integer = match value {
            Value::Integer(integer) => *integer,
            Value::Number(number) => match Number::from_f64(*number) {
                Number::Integer(integer) => integer,
                Number::Number(_) => return None,
            },
            _ => return None,
        };
        (integer != INT_HOLE).then_some(integer)
    }

    fn to_value(element: &i32) -> Value {
        Value::Integer(*element)
    }

    fn store(elements: &BackingStore) -> &[i32] {
        match elements {
            BackingStore::Int(store) => store,
            _ => unreachable!("expected an int backing store"),
        }
    }

    fn store_mut(elements: &mut BackingStore) -> &mut Vec<i32> {
        match elements {
            BackingStore::Int(store) => store,
            _ => unreachable!("expected an int backing store"),
        }
    }

    fn wrap(store: Vec<i32>) -> BackingStore {
        BackingStore::Int(store)
    }
}

impl ElementKind for DoubleElements {
    type Element = f64;

    const TYPE: ElementType = ElementType::Double;

    fn hole() -> f64 {
        f64::from_bits(DOUBLE_HOLE_BITS)
    }

    fn is_hole(element: &f64) -> bool {
        element.to_bits() == DOUBLE_HOLE_BITS
    }

    fn from_value(value: &Value) -> Option<f64> {
        value.as_f64().map(crate::ecmascript::types::canonicalize_nan)
    }

    fn to_value(element: &f64) -> Value {
        Value::from_f64(*element)
    }

    fn store(elements: &BackingStore) -> &[f64] {
        match elements {
            BackingStore::Double(store) => store,
            _ => unreachable!("expected a double backing store"),
        }
    }

    fn store_mut(elements: &mut BackingStore) -> &mut Vec<f64> {
        match elements {
            BackingStore::Double(store) => store,
            _ => unreachable!("expected a double backing store"),
        }
    }

    fn wrap(store: Vec<f64>) -> BackingStore {
        BackingStore::Double(store)
    }
}

impl ElementKind for JsObjectElements {
    type Element = Option<Object>;

    const TYPE: ElementType = ElementType::JsObject;

    fn hole() -> Option<Object> {
        None
    }

    fn is_hole(element: &Option<Object>) -> bool {
        element.is_none()
    }

    fn from_value(value: &Value) -> Option<Option<Object>> {
        match value {
            Value::Object(object) => Some(Some(*object)),
            _ => None,
        }
    }

    fn to_value(element: &Option<Object>) -> Value {
        element.map_or(Value::Undefined, Value::Object)
    }

    fn store(elements: &BackingStore) -> &[Option<Object>] {
        match elements {
            BackingStore::JsObject(store) => store,
            _ => unreachable!("expected an object reference backing store"),
        }
    }

    fn store_mut(elements: &mut BackingStore) -> &mut Vec<Option<Object>> {
        match elements {
            BackingStore::JsObject(store) => store,
            _ => unreachable!("expected an object reference backing store"),
        }
    }

    fn wrap(store: Vec<Option<Object>>) -> BackingStore {
        BackingStore::JsObject(store)
    }
}

impl ElementKind for ObjectElements {
    type Element = Option<Value>;

    const TYPE: ElementType = ElementType::Object;

    fn hole() -> Option<Value> {
        None
    }

    fn is_hole(element: &Option<Value>) -> bool {
        element.is_none()
    }

    fn from_value(value: &Value) -> Option<Option<Value>> {
        Some(Some(value.clone()))
    }

    fn to_value(element: &Option<Value>) -> Value {
        element.clone().unwrap_or_default()
    }

    fn store(elements: &BackingStore) -> &[Option<Value>] {
        match elements {
            BackingStore::Object(store) => store,
            _ => unreachable!("expected an object backing store"),
        }
    }

    fn store_mut(elements: &mut BackingStore) -> &mut Vec<Option<Value>> {
        match elements {
            BackingStore::Object(store) => store,
            _ => unreachable!("expected an object backing store"),
        }
    }

    fn wrap(store: Vec<Option<Value>>) -> BackingStore {
        BackingStore::Object(store)
    }
}

/// Runs `$body` with `$kind` bound to the [`ElementKind`] matching an
/// [`ElementType`].
macro_rules! with_element_kind {
    ($element_type:expr, $kind:ident => $body:expr) => {
        match $element_type {
            $crate::heap::element_array::ElementType::Int => {
                type $kind = $crate::heap::element_array::IntElements;
                $body
            }
            $crate::heap::element_array::ElementType::Double => {
                type $kind = $crate::heap::element_array::DoubleElements;
                $body
            }
            $crate::heap::element_array::ElementType::JsObject => {
                type $kind = $crate::heap::element_array::JsObjectElements;
                $body
            }
            $crate::heap::element_array::ElementType::Object => {
                type $kind = $crate::heap::element_array::ObjectElements;
                $body
            }
        }
    };
}
pub(crate) use with_element_kind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_types_join_on_the_lattice() {
        use ElementType::*;
        assert_eq!(Int.generalize(Int), Int);
        assert_eq!(Int.generalize(Double), Double);
        assert_eq!(Double.generalize(Int), Double);
        assert_eq!(Int.generalize(JsObject), Object);
        assert_eq!(JsObject.generalize(Double), Object);
        assert_eq!(JsObject.generalize(JsObject), JsObject);
        assert!(Object.can_hold(JsObject));
        assert!(!Int.can_hold(Double));
    }

    #[test]
    fn value_kinds() {
        assert_eq!(ElementType::for_value(&Value::Integer(3)), ElementType::Int);
        assert_eq!(
            ElementType::for_value(&Value::Integer(i32::MIN)),
            ElementType::Object
        );
        assert_eq!(ElementType::for_value(&Value::Number(0.5)), ElementType::Double);
        assert_eq!(ElementType::for_value(&Value::Number(-0.0)), ElementType::Double);
        assert_eq!(
            ElementType::for_value(&Value::Object(Object::from_u32_index(0))),
            ElementType::JsObject
        );
        assert_eq!(ElementType::for_value(&Value::from("a")), ElementType::Object);
        assert_eq!(ElementType::for_value(&Value::Undefined), ElementType::Object);
    }

    #[test]
    fn int_store_rejects_its_sentinel() {
        assert_eq!(IntElements::from_value(&Value::Integer(7)), Some(7));
        assert_eq!(IntElements::from_value(&Value::Integer(INT_HOLE)), None);
        assert_eq!(IntElements::from_value(&Value::Number(0.5)), None);
        assert!(IntElements::is_hole(&IntElements::hole()));
    }

    #[test]
    fn double_store_never_stores_the_hole_pattern() {
        let hole = DoubleElements::hole();
        assert!(hole.is_nan());
        assert!(DoubleElements::is_hole(&hole));
        let stored = DoubleElements::from_value(&Value::Number(hole)).unwrap();
        assert!(!DoubleElements::is_hole(&stored));
        assert!(stored.is_nan());
        let nan = DoubleElements::from_value(&Value::Number(f64::NAN)).unwrap();
        assert!(!DoubleElements::is_hole(&nan));
    }

    #[test]
    fn dispatch_macro_binds_the_kind() {
        fn hole_is_recognised<K: ElementKind>() -> bool {
            K::is_hole(&K::hole())
        }
        for element_type in [
            ElementType::Int,
            ElementType::Double,
            ElementType::JsObject,
            ElementType::Object,
        ] {
            let matches = with_element_kind!(element_type, K => {
                K::TYPE == element_type && hole_is_recognised::<K>()
            });
            assert!(matches);
        }
    }
}
