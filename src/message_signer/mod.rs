//! Message Signing Module
//!
//! EIP-191 `personal_sign` over secp256k1:
//! - `digest`: Keccak-256 and personal-message framing
//! - `signer`: deterministic (RFC 6979) recoverable signatures
//! - `verifier`: public-key recovery and address comparison
//!
//! Signatures are 65 bytes, `r || s || v`. On the wire `v` is 27 or 28;
//! libsecp256k1 works with 0 or 1. [`RecoveryId`] is the only place where
//! one is turned into the other.

pub mod digest;
pub mod signer;
pub mod verifier;

pub use digest::{hash, personal_digest, Digest, MESSAGE_PREFIX};
pub use signer::sign_digest;
pub use verifier::{recover_address, verify_personal_sign, Verification};

use std::fmt;
use serde::{Deserialize, Serialize};

/// Recovery id in its internal form (0 or 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Added to the raw id to obtain the wire-form `v`
    pub const WIRE_OFFSET: u8 = 27;

    /// Build from the raw 0/1 form
    #[cfg(test)]
    pub(crate) fn new(raw: u8) -> Result<Self, RecoveryError> {
        match raw {
            0 | 1 => Ok(Self(raw)),
            other => Err(RecoveryError::InvalidSignature(format!(
                "recovery id must be 0 or 1, got {}",
                other
            ))),
        }
    }

    /// Normalize a `v` byte; accepts 27/28 and an already-raw 0/1
    pub fn from_wire_form(v: u8) -> Result<Self, RecoveryError> {
        match v {
            27 | 28 => Ok(Self(v - Self::WIRE_OFFSET)),
            0 | 1 => Ok(Self(v)),
            other => Err(RecoveryError::InvalidSignature(format!(
                "invalid recovery byte {}, expected 27, 28, 0 or 1",
                other
            ))),
        }
    }

    /// The `v` byte emitted in signatures (27 or 28)
    pub fn to_wire_form(self) -> u8 {
        self.0 + Self::WIRE_OFFSET
    }

    /// The raw 0/1 form
    pub fn to_raw(self) -> u8 {
        self.0
    }

    pub(crate) fn from_secp(id: secp256k1::ecdsa::RecoveryId) -> Result<Self, SigningError> {
        match id.to_i32() {
            0 => Ok(Self(0)),
            1 => Ok(Self(1)),
            other => Err(SigningError::UnexpectedRecoveryId(other)),
        }
    }

    pub(crate) fn to_secp(self) -> Result<secp256k1::ecdsa::RecoveryId, RecoveryError> {
        secp256k1::ecdsa::RecoveryId::from_i32(i32::from(self.0))
            .map_err(|e| RecoveryError::InvalidSignature(e.to_string()))
    }
}

/// A recoverable ECDSA signature
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: RecoveryId,
}

impl Signature {
    pub const LENGTH: usize = 65;

    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: RecoveryId) -> Self {
        Self { r, s, recovery_id }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Parse 65 wire bytes; `v` may be 27/28 or 0/1
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecoveryError> {
        if bytes.len() != Self::LENGTH {
            return Err(RecoveryError::InvalidSignature(format!(
                "Expected {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let recovery_id = RecoveryId::from_wire_form(bytes[64])?;
        Ok(Self { r, s, recovery_id })
    }

    /// Parse hex with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self, RecoveryError> {
        Self::from_bytes(&decode_signature_hex(s)?)
    }

    /// Wire bytes, `v` in 27/28 form
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id.to_wire_form();
        out
    }

    /// `0x` + 130 lowercase hex characters
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    pub(crate) fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Decode signature hex and check the length, without interpreting `v`
pub fn decode_signature_hex(s: &str) -> Result<Vec<u8>, RecoveryError> {
    let bytes = hex::decode(crate::utils::crypto::strip_hex_prefix(s))
        .map_err(|e| RecoveryError::InvalidSignature(format!("Invalid hex: {}", e)))?;
    if bytes.len() != Signature::LENGTH {
        return Err(RecoveryError::InvalidSignature(format!(
            "Expected {} bytes, got {}",
            Signature::LENGTH,
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Signature broken into its components, for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParts {
    /// The full signature as hex
    pub signature: String,
    /// R component
    pub r: String,
    /// S component
    pub s: String,
    /// Wire-form v (27 or 28)
    pub v: u8,
    /// Raw recovery id (0 or 1)
    pub recovery_id: u8,
}

impl From<&Signature> for SignatureParts {
    fn from(sig: &Signature) -> Self {
        Self {
            signature: sig.to_hex(),
            r: format!("0x{}", hex::encode(sig.r())),
            s: format!("0x{}", hex::encode(sig.s())),
            v: sig.recovery_id().to_wire_form(),
            recovery_id: sig.recovery_id().to_raw(),
        }
    }
}

/// Signing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("signer produced recovery id {0}, expected 0 or 1")]
    UnexpectedRecoveryId(i32),
}

/// Recovery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecoveryError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("no public key could be recovered from the signature")]
    NoPublicKey,
}
