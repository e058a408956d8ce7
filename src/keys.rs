//! Private keys and account addresses
//!
//! An address is the last 20 bytes of the Keccak-256 hash of the
//! uncompressed public key (without its `0x04` tag byte). Its canonical
//! text form is EIP-55 checksummed hex.

use std::fmt;
use std::str::FromStr;

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

use crate::utils::crypto::{keccak256, strip_hex_prefix, to_checksum_address};

/// Key errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),
}

/// A secp256k1 private scalar, `1 <= k < n`
///
/// The raw bytes are zeroed on drop and never printed.
pub struct PrivateKeyScalar {
    bytes: Zeroizing<[u8; 32]>,
}

impl PrivateKeyScalar {
    pub const LENGTH: usize = 32;

    /// Parse 64 hex characters, with or without `0x`
    pub fn from_hex(key_hex: &str) -> Result<Self, KeyError> {
        let digits = strip_hex_prefix(key_hex);
        if digits.len() != Self::LENGTH * 2 {
            return Err(KeyError::InvalidKey(format!(
                "expected {} hex characters, got {}",
                Self::LENGTH * 2,
                digits.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(digits, &mut bytes[..])
            .map_err(|e| KeyError::InvalidKey(e.to_string()))?;
        Self::from_array(bytes)
    }

    /// Build from 32 raw big-endian bytes
    #[cfg(test)]
    pub(crate) fn from_bytes(raw: &[u8]) -> Result<Self, KeyError> {
        if raw.len() != Self::LENGTH {
            return Err(KeyError::InvalidKey(format!(
                "expected {} bytes, got {}",
                Self::LENGTH,
                raw.len()
            )));
        }
        let mut bytes = Zeroizing::new([0u8; 32]);
        bytes.copy_from_slice(raw);
        Self::from_array(bytes)
    }

    fn from_array(bytes: Zeroizing<[u8; 32]>) -> Result<Self, KeyError> {
        // Rejects zero and anything >= the curve order
        SecretKey::from_slice(&bytes[..])
            .map_err(|_| KeyError::InvalidKey("scalar is zero or not below the curve order".into()))?;
        Ok(Self { bytes })
    }

    pub(crate) fn secret_key(&self) -> Result<SecretKey, KeyError> {
        SecretKey::from_slice(&self.bytes[..]).map_err(|e| KeyError::InvalidKey(e.to_string()))
    }

    /// The matching public point
    pub fn public_key(&self) -> Result<PublicKey, KeyError> {
        let secp = Secp256k1::signing_only();
        let mut secret_key = self.secret_key()?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        secret_key.non_secure_erase();
        Ok(public_key)
    }

    /// The account address controlled by this key
    pub fn address(&self) -> Result<Address, KeyError> {
        Ok(Address::from_public_key(&self.public_key()?))
    }
}

impl fmt::Debug for PrivateKeyScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKeyScalar([REDACTED])")
    }
}

/// Derive the checksummed account address for a private key
pub fn derive_address(key: &PrivateKeyScalar) -> Result<Address, KeyError> {
    key.address()
}

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const LENGTH: usize = 20;

    /// Parse 40 hex characters, with or without `0x`; casing is ignored
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(strip_hex_prefix(s), &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Keccak-256 of the 64 coordinate bytes, last 20 bytes kept
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 checksummed form, `0x` prefixed
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.0)
    }

    /// Case-sensitive comparison against a caller-supplied address string
    ///
    /// `0x0c9b…` does not match `0x0c9B…`: only the exact checksummed
    /// spelling is accepted.
    pub fn matches_checksummed(&self, candidate: &str) -> bool {
        self.to_checksum() == candidate
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "cc9c0c2a98e539a19cfb44f674b4a1fb1f07e0072184cbdcd0524136542ea060";
    const TEST_ADDRESS: &str = "0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17C6";

    // Well-known development key (first Hardhat/Anvil account)
    const DEV_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_derive_address() {
        let key = PrivateKeyScalar::from_hex(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(derive_address(&key).unwrap().to_checksum(), TEST_ADDRESS);

        let key = PrivateKeyScalar::from_hex(DEV_PRIVATE_KEY).unwrap();
        assert_eq!(key.address().unwrap().to_string(), DEV_ADDRESS);
    }

    #[test]
    fn test_prefix_is_optional() {
        let bare = PrivateKeyScalar::from_hex(TEST_PRIVATE_KEY).unwrap();
        let prefixed = PrivateKeyScalar::from_hex(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(bare.address().unwrap(), prefixed.address().unwrap());
    }

    #[test]
    fn test_scalar_one() {
        let key = PrivateKeyScalar::from_hex(&format!("{:0>64}", "1")).unwrap();
        assert_eq!(
            key.address().unwrap().to_checksum(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_rejects_zero_and_order() {
        assert!(PrivateKeyScalar::from_hex(&"0".repeat(64)).is_err());
        // secp256k1 group order n
        let order = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(PrivateKeyScalar::from_hex(order).is_err());
        let order_minus_one = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";
        assert!(PrivateKeyScalar::from_hex(order_minus_one).is_ok());
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(PrivateKeyScalar::from_hex("").is_err());
        assert!(PrivateKeyScalar::from_hex(&TEST_PRIVATE_KEY[..62]).is_err());
        assert!(PrivateKeyScalar::from_hex(&format!("{}00", TEST_PRIVATE_KEY)).is_err());
        let bad = format!("zz{}", &TEST_PRIVATE_KEY[2..]);
        assert!(matches!(PrivateKeyScalar::from_hex(&bad), Err(KeyError::InvalidKey(_))));
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(PrivateKeyScalar::from_bytes(&[1u8; 31]).is_err());
        assert!(PrivateKeyScalar::from_bytes(&[1u8; 32]).is_ok());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PrivateKeyScalar::from_hex(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains("cc9c0c2a"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_address_parsing() {
        let address: Address = TEST_ADDRESS.parse().unwrap();
        assert_eq!(address.to_checksum(), TEST_ADDRESS);
        assert_eq!(Address::from_hex(&TEST_ADDRESS.to_lowercase()).unwrap(), address);
        assert!(Address::from_hex("0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17").is_err());
    }

    #[test]
    fn test_checksummed_match_is_case_sensitive() {
        let address = Address::from_hex(TEST_ADDRESS).unwrap();
        assert!(address.matches_checksummed(TEST_ADDRESS));
        assert!(!address.matches_checksummed(&TEST_ADDRESS.to_lowercase()));
        assert!(!address.matches_checksummed(&TEST_ADDRESS[2..]));
    }

    #[test]
    fn test_address_serializes_checksummed() {
        let address = Address::from_hex(&TEST_ADDRESS.to_lowercase()).unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), format!("\"{}\"", TEST_ADDRESS));
    }
}
