//! Unified error types for the signer core
//!
//! Component errors (`EncodingError`, `KeyError`, `SigningError`,
//! `RecoveryError`) flow through this module so the facade, the CLI and the
//! C ABI all report the same serializable error shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoding::EncodingError;
use crate::keys::KeyError;
use crate::message_signer::{RecoveryError, SigningError};

/// Main error type for all facade operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl CoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CoreError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Encoding errors
    LengthMismatch,
    ParseFailure,
    UnsupportedType,

    // Key and signature errors
    InvalidKey,
    InvalidSignature,
    NoPublicKey,

    // Unit conversion
    InvalidAmount,

    // Outer surfaces (CLI, C ABI)
    InvalidInput,
    Internal,
}

/// Result type alias for facade operations
pub type CoreResult<T> = Result<T, CoreError>;

impl From<EncodingError> for CoreError {
    fn from(e: EncodingError) -> Self {
        let code = match e {
            EncodingError::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            EncodingError::ParseFailure { .. } => ErrorCode::ParseFailure,
            EncodingError::UnsupportedType { .. } => ErrorCode::UnsupportedType,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<KeyError> for CoreError {
    fn from(e: KeyError) -> Self {
        CoreError::new(ErrorCode::InvalidKey, e.to_string())
    }
}

impl From<SigningError> for CoreError {
    fn from(e: SigningError) -> Self {
        let code = match e {
            SigningError::InvalidKey(_) => ErrorCode::InvalidKey,
            SigningError::UnexpectedRecoveryId(_) => ErrorCode::Internal,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<RecoveryError> for CoreError {
    fn from(e: RecoveryError) -> Self {
        let code = match e {
            RecoveryError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            RecoveryError::NoPublicKey => ErrorCode::NoPublicKey,
        };
        CoreError::new(code, e.to_string())
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::new(ErrorCode::InvalidInput, format!("Invalid hex: {}", e))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::new(ErrorCode::InvalidInput, format!("Invalid JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TypeTag;

    #[test]
    fn test_error_serialization() {
        let err = CoreError::new(ErrorCode::InvalidSignature, "Expected 65 bytes, got 64")
            .with_details("signature=0x1234");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("invalid_signature"));
        assert!(json.contains("Expected 65 bytes"));
    }

    #[test]
    fn test_encoding_error_codes() {
        let mismatch: CoreError = EncodingError::LengthMismatch { types: 2, values: 1 }.into();
        assert_eq!(mismatch.code, ErrorCode::LengthMismatch);

        let parse: CoreError = EncodingError::ParseFailure {
            index: 0,
            tag: TypeTag::Bool,
            reason: "expected true or false".to_string(),
        }
        .into();
        assert_eq!(parse.code, ErrorCode::ParseFailure);

        let unsupported: CoreError = EncodingError::UnsupportedType {
            index: 3,
            name: "bytes32".to_string(),
        }
        .into();
        assert_eq!(unsupported.code, ErrorCode::UnsupportedType);
        assert!(unsupported.message.contains("bytes32"));
    }

    #[test]
    fn test_recovery_error_codes() {
        let err: CoreError = RecoveryError::NoPublicKey.into();
        assert_eq!(err.code, ErrorCode::NoPublicKey);

        let err: CoreError = RecoveryError::InvalidSignature("bad v".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidSignature);
    }

    #[test]
    fn test_hex_error_is_invalid_input() {
        let err: CoreError = hex::decode("zz").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.starts_with("Invalid hex"));
    }

    #[test]
    fn test_display_includes_details() {
        let err = CoreError::new(ErrorCode::InvalidKey, "scalar out of range").with_details("index 0");
        assert_eq!(err.to_string(), "[InvalidKey] scalar out of range (index 0)");
    }
}
