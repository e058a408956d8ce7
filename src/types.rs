//! Shared response types
//!
//! Everything the CLI prints in JSON mode and everything the C ABI returns
//! is wrapped in an [`ApiResponse`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Operation Results
// =============================================================================

/// Result of a signature verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    /// Recovered checksummed address; empty when not verified
    pub address: String,
}

impl From<(bool, String)> for VerificationResult {
    fn from((verified, address): (bool, String)) -> Self {
        Self { verified, address }
    }
}

/// A checksummed account address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResult {
    pub address: String,
}

/// An encoded typed-value payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPayload {
    /// `0x`-prefixed lowercase hex
    pub payload: String,
    /// Length in bytes
    pub length: usize,
}

impl EncodedPayload {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            payload: format!("0x{}", hex::encode(bytes)),
            length: bytes.len(),
        }
    }
}

/// A converted amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountResult {
    pub amount: String,
    pub unit: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<CoreError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: CoreError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::ok(AddressResult {
            address: "0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17C6".to_string(),
        });
        let json: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["address"], "0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17C6");
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_api_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::err(CoreError::new(ErrorCode::UnsupportedType, "bytes32"));
        let json: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "unsupported_type");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_encoded_payload() {
        let encoded = EncodedPayload::from_bytes(&[0xde, 0xad, 0x01]);
        assert_eq!(encoded.payload, "0xdead01");
        assert_eq!(encoded.length, 3);
    }

    #[test]
    fn test_verification_result_from_tuple() {
        let result = VerificationResult::from((false, String::new()));
        assert!(!result.verified);
        assert!(result.address.is_empty());
    }
}
