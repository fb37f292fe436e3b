// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod language;

pub(crate) use language::canonicalize_nan;
pub use language::{
    MAX_SAFE_INTEGER, Number, Object, Value, is_canonical_nan, number_to_display_string,
};
