//! Personal Signer Core Library
//!
//! Deterministic message signing for Ethereum accounts.
//!
//! # Architecture
//!
//! This crate provides:
//! - **encoding**: typed `(type, text)` values → packed canonical bytes
//! - **message_signer**: Keccak-256, EIP-191 personal-message digests,
//!   recoverable secp256k1 signatures and signer recovery
//! - **keys**: private-key scalars and EIP-55 checksummed addresses
//! - **signing**: string-in/string-out facade used by the CLI and C ABI
//! - **units**: exact wei/ether conversion
//! - **ffi**: C-ABI exports
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `personal_signer_free_string`)
//!
//! # Security
//!
//! Private-key bytes are held in `zeroize` buffers and cleared on drop.
//! Keys are never logged.
//!
//! # Example
//!
//! ```rust,ignore
//! use personal_signer::{personal_sign, verify_personal_sign, private_key_to_address};
//!
//! let address = private_key_to_address(key_hex)?;
//! let signature = personal_sign("helloworld", key_hex)?;
//! assert_eq!(verify_personal_sign(&signature, "helloworld", &address)?, (true, address));
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod ffi;
pub mod utils;

pub mod encoding;
pub mod keys;
pub mod message_signer;
pub mod signing;
pub mod units;

// Re-export key types for convenience
pub use error::{CoreError, CoreResult, ErrorCode};
pub use types::*;

// Re-export the facade
pub use signing::{
    encode_typed_data,
    personal_sign,
    private_key_to_address,
    recover_personal_signer,
    sign_personal,
    sign_typed,
    sign_typed_message,
    verify_personal_sign,
};

pub use units::{ether_to_wei, wei_to_ether};

// Re-export crypto utilities for binaries
pub use utils::crypto::{keccak256, to_checksum_address};

// Re-export FFI functions at crate root
pub use ffi::{
    personal_signer_free_string,
    personal_signer_personal_sign,
    personal_signer_private_key_to_address,
    personal_signer_sign_typed_message,
    personal_signer_verify_personal_sign,
};
