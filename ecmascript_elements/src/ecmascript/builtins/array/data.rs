// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::execution::Options,
    heap::element_array::BackingStore,
};

use super::ScriptArray;

/// Per-object fields that element strategies read and write.
///
/// The strategies themselves are stateless; everything they know about one
/// array lives behind this trait, owned by the embedding's object model.
pub trait ArrayHost {
    /// The script-visible `length`, at most 2^53 - 1.
    fn length(&self) -> u64;
    fn set_length(&mut self, length: u64);

    /// Number of slots in the used window of a writable store.
    fn used_length(&self) -> u32;
    fn set_used_length(&mut self, used_length: u32);

    /// Logical index of physical slot zero. May be negative after a shift.
    fn index_offset(&self) -> i64;
    fn set_index_offset(&mut self, index_offset: i64);

    /// Physical slot at which the used window starts.
    fn array_offset(&self) -> u32;
    fn set_array_offset(&mut self, array_offset: u32);

    /// Number of hole slots inside the used window.
    fn hole_count(&self) -> u32;
    fn set_hole_count(&mut self, hole_count: u32);

    fn elements(&self) -> &BackingStore;
    fn elements_mut(&mut self) -> &mut BackingStore;

    fn options(&self) -> Options {
        Options::DEFAULT
    }

    /// Called with the new strategy whenever an array changes layout.
    fn notify_allocation_site(&mut self, _array: ScriptArray) {}
}

/// An Array is an exotic object that gives special treatment to array index
/// property keys (see 6.1.7). A property whose property name is an array index
/// is also called an element.
///
/// This is the element bookkeeping of one array, the default [`ArrayHost`].
#[derive(Debug, Clone, Default)]
pub struct ArrayHeapData {
    pub length: u64,
    pub used_length: u32,
    pub index_offset: i64,
    pub array_offset: u32,
    pub hole_count: u32,
    pub elements: BackingStore,
    pub options: Options,
}

impl ArrayHeapData {
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }
}

impl ArrayHost for ArrayHeapData {
    #[inline]
    fn length(&self) -> u64 {
        self.length
    }

    #[inline]
    fn set_length(&mut self, length: u64) {
        self.length = length;
    }

    #[inline]
    fn used_length(&self) -> u32 {
        self.used_length
    }

    #[inline]
    fn set_used_length(&mut self, used_length: u32) {
        self.used_length = used_length;
    }

    #[inline]
    fn index_offset(&self) -> i64 {
        self.index_offset
    }

    #[inline]
    fn set_index_offset(&mut self, index_offset: i64) {
        self.index_offset = index_offset;
    }

    #[inline]
    fn array_offset(&self) -> u32 {
        self.array_offset
    }

    #[inline]
    fn set_array_offset(&mut self, array_offset: u32) {
        self.array_offset = array_offset;
    }

    #[inline]
    fn hole_count(&self) -> u32 {
        self.hole_count
    }

    #[inline]
    fn set_hole_count(&mut self, hole_count: u32) {
        self.hole_count = hole_count;
    }

    #[inline]
    fn elements(&self) -> &BackingStore {
        &self.elements
    }

    #[inline]
    fn elements_mut(&mut self) -> &mut BackingStore {
        &mut self.elements
    }

    fn options(&self) -> Options {
        self.options
    }
}
