//! Wei / ether conversion
//!
//! Exact fixed-point arithmetic on `U256`; amounts never pass through a
//! binary float. The signing core does not depend on this module.

use ethers_core::types::U256;

use crate::error::{CoreError, CoreResult};

/// Fractional digits in one ether
pub const ETHER_DECIMALS: usize = 18;

fn wei_per_ether() -> U256 {
    U256::exp10(ETHER_DECIMALS)
}

/// Convert a decimal wei amount to ether, trailing fractional zeros trimmed
///
/// `"10000000000000000"` becomes `"0.01"`.
pub fn wei_to_ether(wei: &str) -> CoreResult<String> {
    let trimmed = wei.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::invalid_amount(format!(
            "'{}' is not a decimal wei amount",
            wei
        )));
    }

    let raw = U256::from_dec_str(trimmed)
        .map_err(|e| CoreError::invalid_amount(format!("Invalid wei amount: {}", e)))?;

    let (integer, fractional) = raw.div_mod(wei_per_ether());
    if fractional.is_zero() {
        return Ok(integer.to_string());
    }

    let frac_str = format!("{:0>width$}", fractional.to_string(), width = ETHER_DECIMALS);
    Ok(format!("{}.{}", integer, frac_str.trim_end_matches('0')))
}

/// Convert a decimal ether amount to wei
///
/// Accepts `digits` or `digits.digits` with at most 18 fractional digits.
pub fn ether_to_wei(ether: &str) -> CoreResult<String> {
    let trimmed = ether.trim();
    let (integer_str, fractional_str) = match trimmed.split_once('.') {
        Some((integer, fractional)) => (integer, fractional),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if integer_str.is_empty()
        || !all_digits(integer_str)
        || !all_digits(fractional_str)
        || (trimmed.contains('.') && fractional_str.is_empty())
    {
        return Err(CoreError::invalid_amount(format!(
            "'{}' is not a decimal ether amount",
            ether
        )));
    }

    if fractional_str.len() > ETHER_DECIMALS {
        return Err(CoreError::invalid_amount(format!(
            "Too many decimal places: ether has max {} decimals",
            ETHER_DECIMALS
        )));
    }

    let integer = U256::from_dec_str(integer_str)
        .map_err(|e| CoreError::invalid_amount(format!("Invalid integer part: {}", e)))?;

    // Pad fractional part to full precision
    let padded = format!("{:0<width$}", fractional_str, width = ETHER_DECIMALS);
    let fractional = U256::from_dec_str(&padded)
        .map_err(|e| CoreError::invalid_amount(format!("Invalid fractional part: {}", e)))?;

    let raw = integer
        .checked_mul(wei_per_ether())
        .and_then(|v| v.checked_add(fractional))
        .ok_or_else(|| CoreError::invalid_amount("Amount overflow"))?;

    Ok(raw.to_string())
}
