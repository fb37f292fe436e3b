// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::Value;

/// ### [21.1.2.6 Number.MAX_SAFE_INTEGER](https://tc39.es/ecma262/#sec-number.max_safe_integer)
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
///
/// Numbers that are integral and fit in an `i32` are always represented as
/// `Integer`; everything else, including `-0`, is a `Number`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i32),
    Number(f64),
}

impl Number {
    pub fn from_f64(value: f64) -> Self {
        let integer = value as i32;
        if integer as f64 == value && !(value == 0.0 && value.is_sign_negative()) {
            Number::Integer(integer)
        } else {
            Number::Number(canonicalize_nan(value))
        }
    }

    pub fn into_f64(self) -> f64 {
        match self {
            Number::Integer(value) => value as f64,
            Number::Number(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Number::Integer(value) => Value::Integer(value),
            Number::Number(value) => Value::Number(value),
        }
    }

    /// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
    ///
    /// Radix 10 only.
    pub fn to_string_radix_10(self) -> String {
        match self {
            Number::Integer(value) => lexical::to_string(value),
            Number::Number(value) => number_to_display_string(value),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
    }
}

/// Every NaN produced by arithmetic is folded onto the one quiet NaN so that
/// reserved NaN payloads stay unambiguous.
pub(crate) fn canonicalize_nan(value: f64) -> f64 {
    if value.is_nan() { f64::NAN } else { value }
}

pub fn is_canonical_nan(value: f64) -> bool {
    value.to_bits() == f64::NAN.to_bits()
}

pub fn number_to_display_string(value: f64) -> String {
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(value).to_owned()
}
