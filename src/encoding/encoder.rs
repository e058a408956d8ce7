//! Packed typed-value encoder
//!
//! Values are concatenated in input order with no padding between them and
//! no length prefixes. Strings contribute their raw UTF-8 bytes; every other
//! type has a fixed width.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::One;

use super::types::*;
use crate::keys::Address;

/// Encode values into one canonical byte string
pub fn encode(values: &[TypedValue]) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(estimated_len(values));
    for (index, value) in values.iter().enumerate() {
        encode_value(index, value, &mut out)?;
    }
    Ok(out)
}

/// Encode parallel lists of type names and textual values
pub fn encode_parts<T, A>(types: &[T], args: &[A]) -> Result<Vec<u8>, EncodingError>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    let values = TypedValue::from_parts(types, args)?;
    encode(&values)
}

fn estimated_len(values: &[TypedValue]) -> usize {
    values
        .iter()
        .map(|v| v.tag.width().unwrap_or(v.text.len()))
        .sum()
}

fn encode_value(index: usize, value: &TypedValue, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    let fail = |reason: String| EncodingError::ParseFailure {
        index,
        tag: value.tag,
        reason,
    };

    match value.tag.rule() {
        EncodingRule::Utf8 => out.extend_from_slice(value.text.as_bytes()),
        EncodingRule::Address => {
            let address = Address::from_hex(&value.text).map_err(|e| fail(e.to_string()))?;
            out.extend_from_slice(address.as_bytes());
        }
        EncodingRule::Bool => out.push(parse_bool(&value.text).map_err(fail)? as u8),
        EncodingRule::Integer(rule) => {
            let parsed = parse_integer(&value.text, rule.signed).map_err(fail)?;
            out.extend(encode_integer(&parsed, rule).map_err(fail)?);
        }
    }
    Ok(())
}

fn parse_bool(text: &str) -> Result<bool, String> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("expected 'true' or 'false', got '{}'", text))
    }
}

/// Parse a decimal integer of any size
///
/// Accepts an optional leading `+`, and `-` for signed types only.
fn parse_integer(text: &str, signed: bool) -> Result<BigInt, String> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') if signed => (true, &text[1..]),
        Some(b'-') => return Err(format!("negative value '{}' for an unsigned type", text)),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal integer", text));
    }

    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| format!("'{}' is not a decimal integer", text))?;
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// Big-endian, fixed-width
///
/// Negatives are two's complement or zero-padded magnitude, per the rule.
fn encode_integer(value: &BigInt, rule: IntegerRule) -> Result<Vec<u8>, String> {
    if rule.overflow == Overflow::Reject && !fits(value, rule) {
        return Err(format!("{} does not fit in {} bits", value, rule.bits));
    }

    let magnitude = match rule.negative {
        Negative::TwosComplement => {
            let modulus = BigInt::one() << rule.bits;
            value.mod_floor(&modulus).to_bytes_be().1
        }
        Negative::Magnitude => value.magnitude().to_bytes_be(),
    };

    let width = rule.width();
    let mut out = vec![0u8; width - magnitude.len()];
    out.extend_from_slice(&magnitude);
    Ok(out)
}

fn fits(value: &BigInt, rule: IntegerRule) -> bool {
    if rule.signed && rule.negative == Negative::Magnitude {
        return *value.magnitude() < (BigUint::one() << rule.bits);
    }
    if rule.signed {
        let bound = BigInt::one() << (rule.bits - 1);
        *value >= -bound.clone() && *value < bound
    } else {
        let bound = BigInt::one() << rule.bits;
        value.sign() != Sign::Minus && *value < bound
    }
}
