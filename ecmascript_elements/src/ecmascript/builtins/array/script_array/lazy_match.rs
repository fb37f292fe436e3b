// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.2.7.8 MakeMatchIndicesIndexPairArray](https://tc39.es/ecma262/#sec-makematchindicesindexpairarray)
//!
//! Match results hold one element per capture group. Groups are only turned
//! into strings when a script reads them.

use core::{cell::OnceCell, fmt::Debug};
use std::rc::Rc;

use crate::ecmascript::types::Value;

/// Producer of the elements of a lazily materialised match result.
pub trait MatchResultSource: Debug {
    /// Number of elements, including the whole match at index 0.
    fn group_count(&self) -> usize;

    /// Materialises one element. Called at most once per index.
    fn group(&self, index: usize) -> Value;
}

/// The input of a successful match and the byte span of every capture
/// group; `None` marks a group that did not participate.
#[derive(Debug, Clone)]
pub struct CaptureGroups {
    input: Rc<str>,
    captures: Vec<Option<(usize, usize)>>,
}

impl CaptureGroups {
    pub fn new(input: impl Into<Rc<str>>, captures: Vec<Option<(usize, usize)>>) -> Self {
        Self {
            input: input.into(),
            captures,
        }
    }
}

impl MatchResultSource for CaptureGroups {
    fn group_count(&self) -> usize {
        self.captures.len()
    }

    fn group(&self, index: usize) -> Value {
        self.captures
            .get(index)
            .copied()
            .flatten()
            .and_then(|(start, end)| self.input.get(start..end))
            .map_or(Value::Undefined, Value::from)
    }
}

#[derive(Debug)]
pub struct LazyMatchResult {
    source: Box<dyn MatchResultSource>,
    cache: Box<[OnceCell<Value>]>,
}

impl LazyMatchResult {
    pub fn new(source: impl MatchResultSource + 'static) -> Self {
        let cache = (0..source.group_count()).map(|_| OnceCell::new()).collect();
        Self {
            source: Box::new(source),
            cache,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Reads one group, materialising it on first access.
    pub fn get(&self, index: usize) -> Value {
        match self.cache.get(index) {
            Some(cell) => cell.get_or_init(|| self.source.group(index)).clone(),
            None => Value::Undefined,
        }
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.cache.get(index).is_some_and(|cell| cell.get().is_some())
    }
}
