//! Signing facade
//!
//! String-in/string-out entry points shared by the CLI and the C ABI.
//! Keys and addresses accept an optional `0x`; signatures are emitted as
//! `0x` + lowercase hex.

use crate::encoding::{self, TypedValue};
use crate::error::CoreResult;
use crate::keys::{derive_address, PrivateKeyScalar};
use crate::message_signer::{self, decode_signature_hex, hash, personal_digest, sign_digest, Signature};

/// Sign typed values, returning the structured signature
///
/// The payload is hashed, and the personal-message digest of that 32-byte
/// hash is what gets signed.
pub fn sign_typed<T, A>(types: &[T], args: &[A], private_key_hex: &str) -> CoreResult<Signature>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    let values = TypedValue::from_parts(types, args)?;
    let payload = encoding::encode(&values)?;
    let payload_hash = hash(&payload);

    let key = PrivateKeyScalar::from_hex(private_key_hex)?;
    let signature = sign_digest(&personal_digest(&payload_hash), &key)?;

    crate::log_debug!(
        "signing",
        "typed message signed",
        values = values.len(),
        payload_hash = format!("0x{}", hex::encode(payload_hash)),
        signature = signature,
    );
    Ok(signature)
}

/// Sign typed values, returning `0x`-prefixed signature hex
pub fn sign_typed_message<T, A>(types: &[T], args: &[A], private_key_hex: &str) -> CoreResult<String>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    Ok(sign_typed(types, args, private_key_hex)?.to_hex())
}

/// personal_sign over raw message bytes, returning the structured signature
pub fn sign_personal(message: impl AsRef<[u8]>, private_key_hex: &str) -> CoreResult<Signature> {
    let message = message.as_ref();
    let key = PrivateKeyScalar::from_hex(private_key_hex)?;
    let signature = sign_digest(&personal_digest(message), &key)?;

    crate::log_debug!(
        "signing",
        "personal message signed",
        message_len = message.len(),
        signature = signature,
    );
    Ok(signature)
}

/// personal_sign over raw message bytes, returning `0x`-prefixed signature hex
pub fn personal_sign(message: impl AsRef<[u8]>, private_key_hex: &str) -> CoreResult<String> {
    Ok(sign_personal(message, private_key_hex)?.to_hex())
}

/// Check a personal_sign signature against an expected address
///
/// Returns `(true, recovered)` on an exact checksummed match and
/// `(false, "")` otherwise. Only undecodable hex or a length other than
/// 65 bytes is an error.
pub fn verify_personal_sign(
    signature_hex: &str,
    message: impl AsRef<[u8]>,
    address: &str,
) -> CoreResult<(bool, String)> {
    let signature = decode_signature_hex(signature_hex)?;
    let outcome = message_signer::verify_personal_sign(&signature, message.as_ref(), address)?;

    match outcome.recovered {
        Some(recovered) if outcome.matched => Ok((true, recovered.to_checksum())),
        _ => Ok((false, String::new())),
    }
}

/// Recover the checksummed address that produced a personal_sign signature
pub fn recover_personal_signer(signature_hex: &str, message: impl AsRef<[u8]>) -> CoreResult<String> {
    let signature = Signature::from_hex(signature_hex)?;
    let recovered = message_signer::recover_address(&personal_digest(message.as_ref()), &signature)?;
    Ok(recovered.to_checksum())
}

/// Checksummed address for a hex private key
pub fn private_key_to_address(private_key_hex: &str) -> CoreResult<String> {
    let key = PrivateKeyScalar::from_hex(private_key_hex)?;
    Ok(derive_address(&key)?.to_checksum())
}

/// Encoded payload for parallel type/value lists, without signing
pub fn encode_typed_data<T, A>(types: &[T], args: &[A]) -> CoreResult<Vec<u8>>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    let payload = encoding::encode_parts(types, args)?;
    crate::log_debug!("signing", "typed data encoded", payload_len = payload.len());
    Ok(payload)
}
