//! Public-key recovery and personal_sign verification

use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1};

use super::digest::{personal_digest, Digest};
use super::{RecoveryError, Signature};
use crate::keys::Address;

/// Outcome of a verification that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub matched: bool,
    /// The recovered signer, only set when it matched
    pub recovered: Option<Address>,
}

impl Verification {
    fn mismatch() -> Self {
        Self {
            matched: false,
            recovered: None,
        }
    }
}

/// Recover the address that signed `digest`
pub fn recover_address(digest: &Digest, signature: &Signature) -> Result<Address, RecoveryError> {
    let secp = Secp256k1::verification_only();
    let msg = Message::from_digest(*digest);

    let rec_id = signature.recovery_id().to_secp()?;
    let recoverable = RecoverableSignature::from_compact(&signature.to_compact(), rec_id)
        .map_err(|e| RecoveryError::InvalidSignature(e.to_string()))?;

    let public_key = secp
        .recover_ecdsa(&msg, &recoverable)
        .map_err(|_| RecoveryError::NoPublicKey)?;

    Ok(Address::from_public_key(&public_key))
}

/// Verify a personal_sign signature against an expected address
///
/// `signature` is the 65 wire bytes; `v` may be 27/28 or 0/1. The
/// comparison is exact string equality with the recovered address's
/// checksummed form. Only a wrong length is an error: a signature that
/// cannot be recovered simply does not match.
pub fn verify_personal_sign(
    signature: &[u8],
    message: &[u8],
    expected_address: &str,
) -> Result<Verification, RecoveryError> {
    if signature.len() != Signature::LENGTH {
        return Err(RecoveryError::InvalidSignature(format!(
            "Expected {} bytes, got {}",
            Signature::LENGTH,
            signature.len()
        )));
    }

    let recovered = Signature::from_bytes(signature)
        .and_then(|sig| recover_address(&personal_digest(message), &sig));

    let recovered = match recovered {
        Ok(address) => address,
        Err(e) => {
            crate::log_debug!("verifier", "signature did not recover", reason = e);
            return Ok(Verification::mismatch());
        }
    };

    if recovered.matches_checksummed(expected_address) {
        Ok(Verification {
            matched: true,
            recovered: Some(recovered),
        })
    } else {
        if !is_checksummed(expected_address) {
            crate::log_warn!(
                "verifier",
                "expected address is not EIP-55 checksummed",
                expected = expected_address,
            );
        }
        crate::log_debug!(
            "verifier",
            "recovered address does not match",
            recovered = recovered,
            expected = expected_address,
        );
        Ok(Verification::mismatch())
    }
}

fn is_checksummed(candidate: &str) -> bool {
    Address::from_hex(candidate).is_ok_and(|address| address.matches_checksummed(candidate))
}
