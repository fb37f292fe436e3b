// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## Notes
//!
//! - The storage engine has no realm or execution context of its own: errors
//!   are plain records that the embedding turns into Error objects.

use core::fmt;

/// Tunables of the element storage engine.
///
/// These are read through [`ArrayHost::options`] on every access that may
/// grow or transition a backing store.
///
/// [`ArrayHost::options`]: crate::ecmascript::builtins::array::ArrayHost::options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Largest gap a single write may open inside a holes array, and the
    /// largest range `add_range` inserts without going sparse.
    pub max_array_hole_size: u32,
    /// Smallest capacity allocated when a backing store grows.
    pub initial_array_size: u32,
    /// Capacity above which growing a backing store throws a RangeError.
    pub max_array_size: u32,
    /// Emit a `log` record on target `array_transitions` for every strategy
    /// change.
    pub trace_array_transitions: bool,
}

impl Options {
    pub const DEFAULT: Self = Self {
        max_array_hole_size: 5000,
        initial_array_size: 8,
        max_array_size: i32::MAX as u32 - 8,
        trace_array_transitions: false,
    };
}

impl Default for Options {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub type JsResult<T> = core::result::Result<T, JsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsError {
    kind: ExceptionType,
    message: &'static str,
}

impl JsError {
    pub(crate) const fn new(kind: ExceptionType, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub fn kind(self) -> ExceptionType {
        self.kind
    }

    pub fn message(self) -> &'static str {
        self.message
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for JsError {}

/// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
pub fn throw_exception(kind: ExceptionType, message: &'static str) -> JsError {
    JsError::new(kind, message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    AggregateError,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExceptionType::Error => "Error",
            ExceptionType::AggregateError => "AggregateError",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        })
    }
}
