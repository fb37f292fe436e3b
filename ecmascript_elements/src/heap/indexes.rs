// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::{
    cmp::Ordering,
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::NonZeroU32,
};

/// A struct containing a non-zero index into an array or
/// vector of `T`s. Due to the non-zero value, the offset
/// in the vector is offset by one.
///
/// Element stores hold these as object references; the non-zero niche keeps
/// `Option<BaseIndex<T>>` at four bytes so an absent slot costs nothing extra.
pub struct BaseIndex<T: ?Sized>(NonZeroU32, PhantomData<T>);

const _INDEX_SIZE_IS_U32: () = assert!(size_of::<BaseIndex<()>>() == size_of::<u32>());
const _OPTION_INDEX_SIZE_IS_U32: () =
    assert!(size_of::<Option<BaseIndex<()>>>() == size_of::<u32>());

impl<T: ?Sized> Debug for BaseIndex<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.into_u32_index().fmt(f)
    }
}

impl<T: ?Sized> Clone for BaseIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for BaseIndex<T> {}

impl<T: ?Sized> PartialEq for BaseIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: ?Sized> Eq for BaseIndex<T> {}

impl<T: ?Sized> PartialOrd for BaseIndex<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for BaseIndex<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: ?Sized> Hash for BaseIndex<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: ?Sized> BaseIndex<T> {
    pub const fn into_index(self) -> usize {
        self.0.get() as usize - 1
    }

    pub const fn into_u32_index(self) -> u32 {
        self.0.get() - 1
    }

    pub const fn from_index(value: usize) -> Self {
        assert!(value < u32::MAX as usize);
        Self::from_u32_index(value as u32)
    }

    pub const fn from_u32_index(value: u32) -> Self {
        assert!(value != u32::MAX);
        match NonZeroU32::new(value + 1) {
            Some(index) => Self(index, PhantomData),
            None => unreachable!(),
        }
    }
}

/// Marker for records owned by the embedding's object model. The element
/// storage never dereferences these; it only stores and compares them.
#[derive(Debug)]
pub enum ObjectRecord {}

pub type ObjectIndex = BaseIndex<ObjectRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_offset_representation() {
        let index = ObjectIndex::from_u32_index(41);
        assert_eq!(index.into_u32_index(), 41);
        assert_eq!(index.into_index(), 41);
        assert_eq!(ObjectIndex::from_index(0).into_u32_index(), 0);
    }

    #[test]
    #[should_panic]
    fn max_index_is_rejected() {
        let _ = ObjectIndex::from_u32_index(u32::MAX);
    }
}
