//! Value coercion by declared rule type.
//!
//! Rule builders hand over values as typed by the user, usually strings.
//! [`coerce`] converts them to the declared type before they reach a dialect
//! filter. Numeric parsing reads the longest numeric prefix of the value's
//! textual form; when no prefix parses, the result is the
//! [`Coerced::NotANumber`] sentinel rather than an error.

use serde_json::{Number, Value};

use crate::rule::ValueType;

/// Result of coercing a raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Integer(i64),
    Double(f64),
    Bool(bool),
    /// Numeric parsing found no digits.
    NotANumber,
    /// The declared type does not coerce; the raw value is kept.
    Raw(Value),
}

impl Coerced {
    /// Returns `true` when the value is not usable as a number.
    pub fn is_nan(&self) -> bool {
        match self {
            Coerced::NotANumber => true,
            Coerced::Double(value) => value.is_nan(),
            _ => false,
        }
    }
}

impl From<Coerced> for Value {
    /// Converts to JSON. Values JSON cannot carry (not-a-number, infinities)
    /// become `null`.
    fn from(coerced: Coerced) -> Self {
        match coerced {
            Coerced::Integer(value) => Value::Number(value.into()),
            Coerced::Double(value) => Number::from_f64(value).map_or(Value::Null, Value::Number),
            Coerced::Bool(value) => Value::Bool(value),
            Coerced::NotANumber => Value::Null,
            Coerced::Raw(value) => value,
        }
    }
}

/// Coerces `value` according to `value_type`.
///
/// - `integer` parses a leading integer (decimal or `0x` hexadecimal).
/// - `double` parses a leading floating point number.
/// - `boolean` is true for `"true"` (any case) or `"1"` after trimming, or
///   for the number `1`. With `bool_as_int` the result is `1`/`0`.
/// - anything else, including no declared type, is returned unchanged.
pub fn coerce(value: &Value, value_type: Option<&ValueType>, bool_as_int: bool) -> Coerced {
    match value_type {
        Some(ValueType::Integer) => parse_int(&text_of(value)),
        Some(ValueType::Double) => parse_float(&text_of(value)),
        Some(ValueType::Boolean) => {
            let truthy = match value {
                Value::String(s) => {
                    let trimmed = s.trim();
                    trimmed.eq_ignore_ascii_case("true") || trimmed == "1"
                }
                Value::Number(n) => n.as_f64() == Some(1.0),
                Value::Bool(b) => *b,
                _ => false,
            };

            if bool_as_int {
                Coerced::Integer(truthy as i64)
            } else {
                Coerced::Bool(truthy)
            }
        }
        _ => Coerced::Raw(value.clone()),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => text_of(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn parse_int(text: &str) -> Coerced {
    let (negative, rest) = split_sign(text.trim_start());

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let digits = &digits[..len];

    if digits.is_empty() {
        return Coerced::NotANumber;
    }

    match i64::from_str_radix(digits, radix) {
        Ok(value) => Coerced::Integer(if negative { -value } else { value }),
        Err(_) => {
            // Too wide for i64; keep the magnitude as a double.
            let value = digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0f64, |acc, d| acc * radix as f64 + d as f64);
            Coerced::Double(if negative { -value } else { value })
        }
    }
}

fn parse_float(text: &str) -> Coerced {
    let trimmed = text.trim_start();
    let (negative, rest) = split_sign(trimmed);

    if rest.starts_with("Infinity") {
        return Coerced::Double(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let bytes = rest.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits_from(0);
    let mut end = int_digits;
    let mut frac_digits = 0;

    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        end += 1 + frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return Coerced::NotANumber;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    match rest[..end].parse::<f64>() {
        Ok(value) => Coerced::Double(if negative { -value } else { value }),
        Err(_) => Coerced::NotANumber,
    }
}
