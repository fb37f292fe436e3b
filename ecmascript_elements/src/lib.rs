// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed element storage for ECMAScript Array exotic objects.
//!
//! Every array points at one [`ScriptArray`] strategy: a small, copyable
//! description of how its elements are laid out. All mutable state lives in
//! the host record (see [`ArrayHost`]); strategies read and write those
//! fields and, when an access falls outside what the current layout can
//! serve, hand back a more general strategy that the caller must adopt.
//!
//! [`ScriptArray`]: ecmascript::builtins::array::ScriptArray
//! [`ArrayHost`]: ecmascript::builtins::array::ArrayHost

pub mod ecmascript;
pub mod heap;

pub use ecmascript::builtins::array::{Array, ArrayHeapData, ArrayHost, ScriptArray};
pub use ecmascript::execution::{ExceptionType, JsError, JsResult, Options};
pub use ecmascript::types::{Object, Value};
