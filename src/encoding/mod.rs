//! Typed-value encoding
//!
//! Turns `(type, text)` pairs into one canonical byte string, the payload
//! that gets hashed and signed by [`crate::signing::sign_typed_message`].
//!
//! Unlike the Solidity ABI, values are tightly packed: no 32-byte slots and
//! no length prefixes.
//!
//! # Example
//! ```rust,ignore
//! use personal_signer::encoding::encode_parts;
//!
//! let payload = encode_parts(&["string", "uint8"], &["hi", "7"])?;
//! assert_eq!(payload, b"hi\x07");
//! ```

pub mod types;
pub mod encoder;


pub use types::*;
pub use encoder::*;
