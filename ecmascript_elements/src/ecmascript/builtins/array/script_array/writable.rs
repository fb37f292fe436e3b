// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writable layouts: zero-based, contiguous and holes stores of every
//! element kind share one implementation, generic over [`ElementKind`].
//!
//! Logical index `i` lives in physical slot `i - index_offset`. The used
//! window is `array_offset..array_offset + used_length`; every slot outside
//! it holds a hole. Dense layouts never have holes inside the window either.

use super::{AccessMode, ArrayLayout, MAX_DENSE_INDEX, ScriptArray, sparse};
use crate::{
    ecmascript::{
        builtins::array::ArrayHost,
        execution::{JsResult, Options},
        types::Value,
    },
    heap::element_array::{
        ElementKind, ElementType,
        array_copy::{grown_capacity, next_power, resize, widen_store},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Window {
    index_offset: i64,
    array_offset: usize,
    used_length: usize,
    hole_count: usize,
}

impl Window {
    fn read<H: ArrayHost + ?Sized>(host: &H) -> Self {
        Self {
            index_offset: host.index_offset(),
            array_offset: host.array_offset() as usize,
            used_length: host.used_length() as usize,
            hole_count: host.hole_count() as usize,
        }
    }

    fn write<H: ArrayHost + ?Sized>(self, host: &mut H) {
        host.set_index_offset(self.index_offset);
        host.set_array_offset(self.array_offset as u32);
        host.set_used_length(self.used_length as u32);
        host.set_hole_count(self.hole_count as u32);
    }

    /// Logical index of the first slot of the window.
    fn start(self) -> i64 {
        self.index_offset + self.array_offset as i64
    }

    /// Logical index just past the window.
    fn end(self) -> i64 {
        self.start() + self.used_length as i64
    }

    fn is_empty(self) -> bool {
        self.used_length == 0
    }

    fn contains(self, index: i64) -> bool {
        self.start() <= index && index < self.end()
    }

    fn slot(self, index: i64) -> usize {
        (index - self.index_offset) as usize
    }

    fn slots(self) -> core::ops::Range<usize> {
        self.array_offset..self.array_offset + self.used_length
    }
}

fn count_holes<K: ElementKind>(slots: &[K::Element]) -> usize {
    slots.iter().filter(|slot| K::is_hole(slot)).count()
}

pub(super) fn debug_check_window<K: ElementKind, H: ArrayHost + ?Sized>(host: &H) {
    if cfg!(debug_assertions) {
        let window = Window::read(host);
        let store = K::store(host.elements());
        debug_assert_eq!(window.hole_count, count_holes::<K>(&store[window.slots()]));
        debug_assert!(
            store[..window.array_offset]
                .iter()
                .chain(&store[window.slots().end..])
                .all(K::is_hole)
        );
    }
}

/// Whether `layout` can take a write at `index` without changing layout.
fn is_supported(layout: ArrayLayout, window: Window, index: i64, options: Options) -> bool {
    if !(0..MAX_DENSE_INDEX).contains(&index) {
        return false;
    }
    match layout {
        // lastIndex + 1 can be set
        ArrayLayout::ZeroBased(_) => index <= window.used_length as i64,
        ArrayLayout::Holes(_) => {
            let max_hole = i64::from(options.max_array_hole_size);
            window.start() - max_hole <= index && index < window.end() + max_hole
        }
        _ => window.start() - 1 <= index && index <= window.end(),
    }
}

pub(super) fn access_mode<K: ElementKind, H: ArrayHost + ?Sized>(
    layout: ArrayLayout,
    host: &H,
    index: i64,
) -> AccessMode {
    let window = Window::read(host);
    if window.contains(index) {
        AccessMode::InBoundsFast
    } else if !is_supported(layout, window, index, host.options()) {
        AccessMode::Unsupported
    } else if (0..K::store(host.elements()).len() as i64).contains(&(index - window.index_offset)) {
        AccessMode::InBounds
    } else {
        AccessMode::Supported
    }
}

pub(super) fn find_element<K: ElementKind, H: ArrayHost + ?Sized>(
    host: &H,
    index: i64,
) -> Option<Value> {
    let window = Window::read(host);
    if !window.contains(index) {
        return None;
    }
    let element = &K::store(host.elements())[window.slot(index)];
    (!K::is_hole(element)).then(|| K::to_value(element))
}

pub(super) fn element_bounds<K: ElementKind, H: ArrayHost + ?Sized>(
    host: &H,
) -> Option<(i64, i64)> {
    let window = Window::read(host);
    let slots = &K::store(host.elements())[window.slots()];
    let first = slots.iter().position(|slot| !K::is_hole(slot))?;
    let last = slots.iter().rposition(|slot| !K::is_hole(slot))?;
    Some((window.start() + first as i64, window.start() + last as i64))
}

pub(super) fn write_element<K: ElementKind, H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
    value: Value,
) -> JsResult<ScriptArray> {
    let options = host.options();
    let window = Window::read(host);
    let holes = ArrayLayout::Holes(K::TYPE);
    let layout = if is_supported(array.layout(), window, index, options) {
        array.layout()
    } else if is_supported(holes, window, index, options) {
        holes
    } else {
        return sparse::convert(array, host, index).write_element(host, index, value);
    };
    // Growth is the only way a positional write fails, and it must fail
    // before the store is widened.
    let capacity = K::store(host.elements()).len();
    required_capacity(capacity, index - window.index_offset, options)?;
    let Some(element) = K::from_value(&value) else {
        let element_type = K::TYPE.generalize(ElementType::for_value(&value));
        return widen(array, host, element_type, index).write_element(host, index, value);
    };
    set_supported::<K, H>(host, window, index, element, options)?;
    let array = if layout == array.layout() {
        array
    } else {
        array.transition(host, layout, index)
    };
    Ok(settle(array, host, index))
}

/// Copies the store into a wider element kind, keeping the shape.
fn widen<H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    element_type: ElementType,
    index: i64,
) -> ScriptArray {
    let elements = host.elements_mut().take();
    *host.elements_mut() = widen_store(elements, element_type);
    let layout = match array.layout() {
        ArrayLayout::ZeroBased(_) => ArrayLayout::ZeroBased(element_type),
        ArrayLayout::Contiguous(_) => ArrayLayout::Contiguous(element_type),
        _ => ArrayLayout::Holes(element_type),
    };
    array.transition(host, layout, index)
}

/// Picks the narrowest writable shape for the current window: a holes
/// array without holes is dense, and a dense window is zero-based exactly
/// when it is aligned with slot zero.
fn settle<H: ArrayHost + ?Sized>(array: ScriptArray, host: &mut H, index: i64) -> ScriptArray {
    let aligned = host.index_offset() == 0 && host.array_offset() == 0;
    let dense = |element_type| {
        if aligned {
            ArrayLayout::ZeroBased(element_type)
        } else {
            ArrayLayout::Contiguous(element_type)
        }
    };
    match array.layout() {
        ArrayLayout::Holes(element_type) if host.hole_count() == 0 => {
            array.transition(host, dense(element_type), index)
        }
        ArrayLayout::Contiguous(element_type) if aligned => {
            array.transition(host, dense(element_type), index)
        }
        ArrayLayout::ZeroBased(element_type) if !aligned => {
            array.transition(host, dense(element_type), index)
        }
        _ => array,
    }
}

/// Capacity the store has to grow to before physical slot `slot` exists, or
/// `None` when it already does. Negative slots lie left of the store.
fn required_capacity(capacity: usize, slot: i64, options: Options) -> JsResult<Option<usize>> {
    if slot < 0 {
        grown_capacity(capacity + slot.unsigned_abs() as usize, options).map(Some)
    } else if slot as usize >= capacity {
        grown_capacity(slot as usize + 1, options).map(Some)
    } else {
        Ok(None)
    }
}

/// Stores an element at an index the layout supports, growing the store to
/// the left or right first when the slot lies outside it. Any gap opened
/// between the window and the new slot is counted as holes.
fn set_supported<K: ElementKind, H: ArrayHost + ?Sized>(
    host: &mut H,
    window: Window,
    index: i64,
    element: K::Element,
    options: Options,
) -> JsResult<()> {
    let mut window = window;
    let capacity = K::store(host.elements()).len();
    let mut slot = index - window.index_offset;
    if let Some(new_capacity) = required_capacity(capacity, slot, options)? {
        let mut shift = 0;
        if slot < 0 {
            shift = new_capacity - capacity;
            // Keep logical index zero on physical slot zero when possible.
            if window.index_offset > 0 && window.index_offset < shift as i64 {
                shift = window.index_offset as usize;
            }
        }
        let store = K::store_mut(host.elements_mut());
        let grown = resize::<K>(store, new_capacity, shift);
        *store = grown;
        window.index_offset -= shift as i64;
        window.array_offset += shift;
        slot += shift as i64;
    }

    let slot = slot as usize;
    let (start, end) = (window.array_offset, window.slots().end);
    let store = K::store_mut(host.elements_mut());
    if window.is_empty() {
        window.array_offset = slot;
        window.used_length = 1;
    } else if slot < start {
        window.hole_count += start - slot - 1;
        window.used_length += start - slot;
        window.array_offset = slot;
    } else if slot >= end {
        window.hole_count += slot - end;
        window.used_length = slot + 1 - start;
    } else if K::is_hole(&store[slot]) {
        window.hole_count -= 1;
    }
    store[slot] = element;
    window.write(host);

    let length = index as u64 + 1;
    if length > host.length() {
        host.set_length(length);
    }
    debug_check_window::<K, H>(host);
    Ok(())
}

/// Dense arrays lose their last element by shrinking the window; any other
/// deletion leaves a hole and turns the array into a holes array. Holes
/// arrays trim the window when a boundary element goes away.
pub(super) fn delete_element<K: ElementKind, H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    index: i64,
) -> ScriptArray {
    let mut window = Window::read(host);
    if !window.contains(index) {
        return array;
    }
    let slot = window.slot(index);
    let (start, end) = (window.array_offset, window.slots().end);
    let store = K::store_mut(host.elements_mut());
    if K::is_hole(&store[slot]) {
        return array;
    }
    store[slot] = K::hole();

    let mut becomes_holes = false;
    match array.layout() {
        ArrayLayout::Holes(_) if slot == start => {
            match store[slot + 1..end].iter().position(|element| !K::is_hole(element)) {
                Some(skipped) => {
                    window.hole_count -= skipped;
                    window.array_offset = slot + 1 + skipped;
                    window.used_length -= skipped + 1;
                }
                None => window = Window::default(),
            }
        }
        ArrayLayout::Holes(_) if slot + 1 == end => {
            match store[start..slot].iter().rposition(|element| !K::is_hole(element)) {
                Some(last) => {
                    window.hole_count -= slot - (start + last) - 1;
                    window.used_length = last + 1;
                }
                None => window = Window::default(),
            }
        }
        ArrayLayout::Holes(_) => window.hole_count += 1,
        _ if slot + 1 == end => window.used_length -= 1,
        _ => {
            window.hole_count = 1;
            becomes_holes = true;
        }
    }
    window.write(host);
    debug_check_window::<K, H>(host);
    if becomes_holes {
        array.transition(host, ArrayLayout::Holes(K::TYPE), index)
    } else {
        array
    }
}

/// Truncates to `0 < length < old length`. Trailing holes left at the end
/// of the window are trimmed; a window left without elements drops the
/// store altogether.
pub(super) fn set_length_less<K: ElementKind, H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    length: u64,
) -> ScriptArray {
    host.set_length(length);
    let new_end = length as i64;
    let mut window = Window::read(host);
    if window.is_empty() || new_end >= window.end() {
        return array;
    }
    if new_end <= window.start() {
        return array.reset_to_empty(host, new_end);
    }
    let start = window.array_offset;
    let mut keep = (new_end - window.start()) as usize;
    let store = K::store_mut(host.elements_mut());
    for slot in &mut store[start + keep..window.slots().end] {
        if K::is_hole(slot) {
            window.hole_count -= 1;
        } else {
            *slot = K::hole();
        }
    }
    while keep > 0 && K::is_hole(&store[start + keep - 1]) {
        keep -= 1;
        window.hole_count -= 1;
    }
    if keep == 0 {
        return array.reset_to_empty(host, new_end);
    }
    window.used_length = keep;
    window.write(host);
    debug_check_window::<K, H>(host);
    array
}

/// Shifts the elements at or above `offset` up by `size`. A range inserted
/// in front of the window only moves the window; one inserted inside it
/// opens `size` holes.
pub(super) fn add_range<K: ElementKind, H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    offset: i64,
    size: i64,
) -> JsResult<ScriptArray> {
    let mut window = Window::read(host);
    let new_length = host.length() + size as u64;
    if window.is_empty() || offset >= window.end() {
        host.set_length(new_length);
        return Ok(array);
    }
    let options = host.options();
    let inside = offset > window.start();
    if window.end() + size >= MAX_DENSE_INDEX
        || (inside && size > i64::from(options.max_array_hole_size))
    {
        return sparse::convert(array, host, offset).insert_range(host, offset, size);
    }
    if !inside {
        window.index_offset += size;
        window.write(host);
        host.set_length(new_length);
        return Ok(settle(array, host, offset));
    }

    let size = size as usize;
    let split = window.slot(offset);
    let end = window.slots().end;
    if end + size > K::store(host.elements()).len() {
        let new_capacity = next_power(end + size, options)?;
        let store = K::store_mut(host.elements_mut());
        let grown = resize::<K>(store, new_capacity, 0);
        *store = grown;
    }
    // The slots past the window are holes; rotating them in front of the
    // moved elements leaves the inserted range empty.
    K::store_mut(host.elements_mut())[split..end + size].rotate_right(size);
    window.used_length += size;
    window.hole_count += size;
    window.write(host);
    host.set_length(new_length);
    debug_check_window::<K, H>(host);

    let holes = ArrayLayout::Holes(K::TYPE);
    if array.layout() == holes {
        Ok(array)
    } else {
        Ok(array.transition(host, holes, offset))
    }
}

/// Removes `start..end` and shifts the elements above it down. Removing a
/// prefix of the window only moves the window offsets.
pub(super) fn remove_range<K: ElementKind, H: ArrayHost + ?Sized>(
    array: ScriptArray,
    host: &mut H,
    start: i64,
    end: i64,
) -> ScriptArray {
    let removed = end - start;
    let mut window = Window::read(host);
    if !window.is_empty() && start < window.end() {
        if end <= window.start() {
            window.index_offset -= removed;
        } else {
            let last = window.slots().end;
            let cut_start = window.slot(start.max(window.start()));
            let cut_end = window.slot(end.min(window.end()));
            let store = K::store_mut(host.elements_mut());
            let cut = &mut store[cut_start..cut_end];
            window.hole_count -= count_holes::<K>(cut);
            cut.fill(K::hole());
            if start <= window.start() {
                window.array_offset = cut_end;
                window.used_length = last - cut_end;
                window.index_offset -= removed;
            } else {
                store[cut_start..last].rotate_left(cut_end - cut_start);
                window.used_length -= cut_end - cut_start;
            }
            if window.is_empty() {
                window = Window::default();
            }
        }
        window.write(host);
    }
    host.set_length(host.length() - removed as u64);
    debug_check_window::<K, H>(host);
    settle(array, host, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ecmascript::builtins::array::ArrayHeapData,
        heap::element_array::{BackingStore, INT_HOLE, IntElements},
    };

    fn int_array(values: &[i32]) -> (ScriptArray, ArrayHeapData) {
        let mut host = ArrayHeapData::default();
        let mut array = ScriptArray::EMPTY;
        for (index, value) in values.iter().enumerate() {
            array = array
                .set_element(&mut host, index as i64, Value::Integer(*value), true)
                .unwrap();
        }
        (array, host)
    }

    fn ints(host: &ArrayHeapData) -> &[i32] {
        IntElements::store(&host.elements)
    }

    #[test]
    fn appends_grow_geometrically() {
        let (array, host) = int_array(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Int));
        assert_eq!(host.used_length, 9);
        assert_eq!(ints(&host).len(), 18);
        assert_eq!(host.length, 9);
    }

    #[test]
    fn prepending_moves_the_window_left() {
        let mut host = ArrayHeapData::default();
        let mut array = ScriptArray::EMPTY;
        for index in (3000..3010).rev() {
            array = array
                .set_element(&mut host, index, Value::Integer(index as i32), true)
                .unwrap();
        }
        assert_eq!(array.layout(), ArrayLayout::Contiguous(ElementType::Int));
        assert_eq!(array.first_element_index(&host), 3000);
        assert_eq!(array.last_element_index(&host), 3009);
        assert_eq!(array.get_element(&host, 3004), Value::Integer(3004));
        assert_eq!(host.hole_count, 0);
    }

    #[test]
    fn prepending_towards_zero_realigns_to_zero_based() {
        let mut host = ArrayHeapData::default();
        let mut array = ScriptArray::EMPTY;
        for index in (0..4).rev() {
            array = array
                .set_element(&mut host, index, Value::Integer(1), true)
                .unwrap();
        }
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Int));
        assert_eq!(host.index_offset, 0);
        assert_eq!(host.array_offset, 0);
    }

    #[test]
    fn gaps_become_holes_and_filling_them_narrows() {
        let (array, mut host) = int_array(&[1, 2]);
        let array = array.set_element(&mut host, 4, Value::Integer(5), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Holes(ElementType::Int));
        assert_eq!(host.hole_count, 2);
        assert_eq!(&ints(&host)[..5], &[1, 2, INT_HOLE, INT_HOLE, 5]);
        let array = array.set_element(&mut host, 2, Value::Integer(3), true).unwrap();
        assert_eq!(host.hole_count, 1);
        let array = array.set_element(&mut host, 3, Value::Integer(4), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Int));
        assert_eq!(host.hole_count, 0);
    }

    #[test]
    fn deleting_inside_a_dense_array_leaves_a_hole() {
        let (array, mut host) = int_array(&[1, 2, 3]);
        let array = array.delete_element(&mut host, 1, true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Holes(ElementType::Int));
        assert_eq!(host.hole_count, 1);
        assert_eq!(array.get_element(&host, 1), Value::Undefined);
        assert_eq!(array.next_element_index(&host, 0), 2);
    }

    #[test]
    fn deleting_the_last_dense_element_shrinks_the_window() {
        let (array, mut host) = int_array(&[1, 2, 3]);
        let array = array.delete_element(&mut host, 2, true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Int));
        assert_eq!(host.used_length, 2);
        assert_eq!(host.length, 3);
    }

    #[test]
    fn holes_boundary_deletes_trim_the_window() {
        let (array, mut host) = int_array(&[1, 2, 3, 4, 5]);
        let array = array.delete_element(&mut host, 1, true).unwrap();
        let array = array.delete_element(&mut host, 0, true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Holes(ElementType::Int));
        assert_eq!(host.array_offset, 2);
        assert_eq!(host.used_length, 3);
        assert_eq!(host.hole_count, 0);
        let array = array.delete_element(&mut host, 3, true).unwrap();
        let array = array.delete_element(&mut host, 4, true).unwrap();
        assert_eq!(host.used_length, 1);
        assert_eq!(host.hole_count, 0);
        let array = array.delete_element(&mut host, 2, true).unwrap();
        assert_eq!(host.used_length, 0);
        assert_eq!(array.first_element_index(&host), 0);
        assert_eq!(array.last_element_index(&host), -1);
        assert_eq!(host.length, 5);
    }

    #[test]
    fn truncation_trims_trailing_holes() {
        let (array, mut host) = int_array(&[1, 2, 3, 4]);
        let array = array.delete_element(&mut host, 1, true).unwrap();
        let array = array.set_length(&mut host, 2, true).unwrap();
        assert_eq!(host.length, 2);
        assert_eq!(host.used_length, 1);
        assert_eq!(host.hole_count, 0);
        assert_eq!(array.get_element(&host, 0), Value::Integer(1));
        assert_eq!(ints(&host)[1..4], [INT_HOLE; 3]);
    }

    #[test]
    fn truncating_below_the_window_drops_the_store() {
        let mut host = ArrayHeapData::default();
        let array = ScriptArray::EMPTY
            .set_element(&mut host, 100, Value::Integer(1), true)
            .unwrap();
        let array = array.set_length(&mut host, 50, true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ConstantEmpty);
        assert!(matches!(host.elements, BackingStore::Empty));
        assert_eq!(host.length, 50);
    }

    #[test]
    fn inserting_a_range_inside_the_window_opens_holes() {
        let (array, mut host) = int_array(&[1, 2, 3]);
        let array = array.add_range(&mut host, 1, 2).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Holes(ElementType::Int));
        assert_eq!(host.length, 5);
        assert_eq!(host.hole_count, 2);
        assert_eq!(array.get_element(&host, 3), Value::Integer(2));
        assert_eq!(array.get_element(&host, 4), Value::Integer(3));
        assert!(!array.has_element(&host, 1));
    }

    #[test]
    fn inserting_in_front_moves_the_window() {
        let (array, mut host) = int_array(&[1, 2, 3]);
        let array = array.add_range(&mut host, 0, 3).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Contiguous(ElementType::Int));
        assert_eq!(host.index_offset, 3);
        assert_eq!(array.first_element_index(&host), 3);
        assert_eq!(host.length, 6);
    }

    #[test]
    fn shifting_is_zero_copy() {
        let (array, mut host) = int_array(&[1, 2, 3, 4]);
        let array = array.shift_range(&mut host, 1).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Contiguous(ElementType::Int));
        assert_eq!(host.array_offset, 1);
        assert_eq!(host.index_offset, -1);
        assert_eq!(array.get_element(&host, 0), Value::Integer(2));
        assert_eq!(array.get_element(&host, 2), Value::Integer(4));
        assert_eq!(host.length, 3);
        let array = array.set_element(&mut host, 3, Value::Integer(5), true).unwrap();
        assert_eq!(array.get_element(&host, 3), Value::Integer(5));
    }

    #[test]
    fn removing_from_the_middle_moves_the_tail_down() {
        let (array, mut host) = int_array(&[1, 2, 3, 4, 5]);
        let array = array.remove_range(&mut host, 1, 3).unwrap();
        assert_eq!(array.layout(), ArrayLayout::ZeroBased(ElementType::Int));
        assert_eq!(host.length, 3);
        assert_eq!(&ints(&host)[..5], &[1, 4, 5, INT_HOLE, INT_HOLE]);
    }

    #[test]
    fn widening_keeps_the_window() {
        let mut host = ArrayHeapData::default();
        let array = ScriptArray::EMPTY
            .set_element(&mut host, 10, Value::Integer(1), true)
            .unwrap();
        let array = array.set_element(&mut host, 11, Value::Number(0.5), true).unwrap();
        assert_eq!(array.layout(), ArrayLayout::Contiguous(ElementType::Double));
        assert_eq!(array.get_element(&host, 10), Value::Integer(1));
        assert_eq!(array.get_element(&host, 11), Value::Number(0.5));
    }
}
