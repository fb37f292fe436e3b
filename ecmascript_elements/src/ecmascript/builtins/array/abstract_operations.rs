// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    execution::{ExceptionType, JsResult, throw_exception},
    types::{MAX_SAFE_INTEGER, Value},
};

use super::Array;

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
///
/// The abstract operation ArrayCreate takes argument length (a non-negative
/// integer) and returns either a normal completion containing an Array
/// exotic object or a throw completion.
pub fn array_create(length: u64) -> JsResult<Array> {
    // 1. If length > 2**53 - 1, throw a RangeError exception.
    if length > MAX_SAFE_INTEGER as u64 {
        return Err(throw_exception(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    // 6. Set A.[[Length]] to length.
    Array::with_length(length)
}

/// ### [7.3.18 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub fn create_array_from_list(elements: &[Value]) -> Array {
    Array::from_values(elements)
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
///
/// Objects would need ToPrimitive, which belongs to the embedding.
pub(crate) fn to_number(argument: &Value) -> JsResult<f64> {
    match argument {
        // 2. If argument is either Symbol or BigInt, throw a TypeError exception.
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        Value::Integer(value) => Ok(f64::from(*value)),
        Value::Number(value) => Ok(*value),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::String(string) => Ok(string_to_number(string)),
        Value::Object(_) => Err(throw_exception(
            ExceptionType::TypeError,
            "Cannot convert object to primitive value",
        )),
    }
}

/// WhiteSpace and LineTerminator code points.
fn is_trimmable_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{FEFF}'
            | '\u{000A}'
            | '\u{000D}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
fn string_to_number(string: &str) -> f64 {
    // 1. Let literal be ParseText(str, StringNumericLiteral).
    let literal = string.trim_matches(is_trimmable_whitespace);
    // StringNumericLiteral ::: StrWhiteSpace_opt
    if literal.is_empty() {
        return 0.0;
    }
    // NonDecimalIntegerLiteral: no sign, at least one digit.
    let bytes = literal.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return literal[2..]
                .chars()
                .try_fold(0.0, |value: f64, c| {
                    c.to_digit(radix)
                        .map(|digit| value * f64::from(radix) + f64::from(digit))
                })
                .unwrap_or(f64::NAN);
        }
    }
    // StrDecimalLiteral ::: +StrUnsignedDecimalLiteral | -StrUnsignedDecimalLiteral
    let (sign, unsigned) = match bytes[0] {
        b'-' => (-1.0, &literal[1..]),
        b'+' => (1.0, &literal[1..]),
        _ => (1.0, literal),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    // fast_float also takes "inf" and "nan" in any case, which are not
    // decimal literals.
    let is_decimal = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && unsigned
            .bytes()
            .all(|c| c.is_ascii_digit() || matches!(c, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal {
        // 2. If literal is a List of errors, return NaN.
        return f64::NAN;
    }
    // 3. Return the StringNumericValue of literal.
    fast_float::parse::<f64, _>(unsigned).map_or(f64::NAN, |value| sign * value)
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
///
/// Steps 3 to 5: turns the `[[Value]]` of a length descriptor into a length.
pub fn to_array_length(value: &Value) -> JsResult<u64> {
    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number_len = to_number(value)?;
    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError exception.
    if number_len.fract() != 0.0 || !(0.0..=MAX_SAFE_INTEGER as f64).contains(&number_len) {
        return Err(throw_exception(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    Ok(number_len as u64)
}
