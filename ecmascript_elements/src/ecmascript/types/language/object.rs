// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::heap::indexes::ObjectIndex;

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
///
/// A reference to an object owned by the embedding. Element stores keep
/// these unboxed when every element of an array is an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Object(ObjectIndex);

const _OPTIONAL_OBJECT_SIZE_IS_U32: () = assert!(size_of::<Option<Object>>() == size_of::<u32>());

impl Object {
    pub const fn from_index(index: ObjectIndex) -> Self {
        Self(index)
    }

    pub const fn from_u32_index(index: u32) -> Self {
        Self(ObjectIndex::from_u32_index(index))
    }

    pub const fn get_index(self) -> ObjectIndex {
        self.0
    }
}
