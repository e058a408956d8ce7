//! Ethereum Personal Message Hashing (EIP-191)
//!
//! Reference: https://eips.ethereum.org/EIPS/eip-191
//!
//! Format: "\x19Ethereum Signed Message:\n" + len(message) + message
//! where the length is written as decimal ASCII digits.

use crate::utils::crypto::keccak256;

/// Ethereum message prefix for personal_sign
pub const MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// A 32-byte Keccak-256 digest
pub type Digest = [u8; 32];

/// Keccak-256 of arbitrary bytes
pub fn hash(data: &[u8]) -> Digest {
    keccak256(data)
}

/// Hash a message with the personal-message prefix
pub fn personal_digest(message: &[u8]) -> Digest {
    let prefix = format!("{}{}", MESSAGE_PREFIX, message.len());
    let mut data = Vec::with_capacity(prefix.len() + message.len());
    data.extend_from_slice(prefix.as_bytes());
    data.extend_from_slice(message);
    hash(&data)
}
