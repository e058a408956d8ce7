//! Recoverable ECDSA signing
//!
//! Nonces follow RFC 6979 and `s` is normalized to the lower half of the
//! curve order (libsecp256k1 behavior), so a digest and key always produce
//! the same 65 bytes.

use secp256k1::{Message, Secp256k1};

use super::digest::Digest;
use super::{RecoveryId, Signature, SigningError};
use crate::keys::PrivateKeyScalar;

/// Sign a 32-byte digest directly (no prefix is applied here)
pub fn sign_digest(digest: &Digest, key: &PrivateKeyScalar) -> Result<Signature, SigningError> {
    let secp = Secp256k1::signing_only();
    let mut secret_key = key
        .secret_key()
        .map_err(|e| SigningError::InvalidKey(e.to_string()))?;

    let msg = Message::from_digest(*digest);
    let sig = secp.sign_ecdsa_recoverable(&msg, &secret_key);
    secret_key.non_secure_erase();

    let (recovery_id, sig_bytes) = sig.serialize_compact();
    let recovery_id = RecoveryId::from_secp(recovery_id)?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    Ok(Signature::new(r, s, recovery_id))
}
