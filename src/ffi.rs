//! FFI Layer
//!
//! All C-ABI exports are defined here. Every function follows the same
//! pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `personal_signer_free_string`)
//!
//! Error handling: All functions return JSON with a `success` field.
//! On error, `success: false` and the `error` object is populated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, ErrorCode};
use crate::signing;
use crate::types::*;

const FALLBACK_ERROR: &[u8] =
    b"{\"success\":false,\"error\":{\"code\":\"internal\",\"message\":\"String conversion failed\"}}\0";

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any personal_signer_* function
///
/// # Safety
/// The pointer must have been returned by a personal_signer_* function and
/// must not be used afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn personal_signer_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Copy a C string into an owned Rust string, or an error response pointer
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(CoreError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(error_response(CoreError::invalid_input("Invalid UTF-8 string"))),
    }
}

/// Parse the JSON request carried by a C string
fn parse_request<T: serde::de::DeserializeOwned>(input: *const c_char) -> Result<T, *mut c_char> {
    let mut json_str = parse_input(input)?;
    let parsed = serde_json::from_str(&json_str).map_err(|e| error_response(CoreError::from(e)));
    json_str.zeroize();
    parsed
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: CoreError) -> *mut c_char {
    if error.code == ErrorCode::Internal {
        crate::log_error!("ffi", "request failed", message = error.message);
    }
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

fn respond<T: serde::Serialize>(result: Result<T, CoreError>) -> *mut c_char {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(e),
    }
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => match CStr::from_bytes_with_nul(FALLBACK_ERROR) {
            Ok(fallback) => fallback.to_owned().into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct SignTypedRequest {
    types: Vec<String>,
    args: Vec<String>,
    private_key: String,
}

#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct PersonalSignRequest {
    message: String,
    private_key: String,
}

#[derive(Deserialize)]
struct VerifyRequest {
    signature: String,
    message: String,
    address: String,
}

#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct AddressRequest {
    private_key: String,
}

// =============================================================================
// Signing Operations
// =============================================================================

/// Sign a list of typed values
///
/// # Input
/// ```json
/// { "types": ["string", "uint256"], "args": ["hello", "1"], "private_key": "0x..." }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "signature": "0x...", "r": "0x...", "s": "0x...", "v": 27, "recovery_id": 0 } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn personal_signer_sign_typed_message(input: *const c_char) -> *mut c_char {
    let request: SignTypedRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(
        signing::sign_typed(&request.types, &request.args, &request.private_key)
            .map(|sig| crate::message_signer::SignatureParts::from(&sig)),
    )
}

/// personal_sign a UTF-8 message
///
/// # Input
/// ```json
/// { "message": "helloworld", "private_key": "0x..." }
/// ```
///
/// # Output
/// Same shape as `personal_signer_sign_typed_message`.
#[unsafe(no_mangle)]
pub extern "C" fn personal_signer_personal_sign(input: *const c_char) -> *mut c_char {
    let request: PersonalSignRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(
        signing::sign_personal(&request.message, &request.private_key)
            .map(|sig| crate::message_signer::SignatureParts::from(&sig)),
    )
}

/// Verify a personal_sign signature
///
/// # Input
/// ```json
/// { "signature": "0x...", "message": "helloworld", "address": "0x0c9B..." }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "verified": true, "address": "0x0c9B..." } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn personal_signer_verify_personal_sign(input: *const c_char) -> *mut c_char {
    let request: VerifyRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(
        signing::verify_personal_sign(&request.signature, &request.message, &request.address)
            .map(VerificationResult::from),
    )
}

/// Derive the checksummed address for a private key
///
/// # Input
/// ```json
/// { "private_key": "0x..." }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "address": "0x0c9B..." } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn personal_signer_private_key_to_address(input: *const c_char) -> *mut c_char {
    let request: AddressRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    respond(signing::private_key_to_address(&request.private_key).map(|address| AddressResult { address }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "cc9c0c2a98e539a19cfb44f674b4a1fb1f07e0072184cbdcd0524136542ea060";
    const TEST_ADDRESS: &str = "0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17C6";

    fn call(f: extern "C" fn(*const c_char) -> *mut c_char, input: &serde_json::Value) -> serde_json::Value {
        let input = CString::new(input.to_string()).unwrap();
        let ptr = f(input.as_ptr());
        assert!(!ptr.is_null());
        let output = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        personal_signer_free_string(ptr);
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_personal_sign_and_verify() {
        let signed = call(
            personal_signer_personal_sign,
            &serde_json::json!({ "message": "helloworld", "private_key": TEST_PRIVATE_KEY }),
        );
        assert_eq!(signed["success"], true);
        let signature = signed["data"]["signature"].as_str().unwrap().to_owned();
        assert!(signature.starts_with("0x606de978"));
        assert_eq!(signed["data"]["v"], 27);

        let verified = call(
            personal_signer_verify_personal_sign,
            &serde_json::json!({ "signature": signature, "message": "helloworld", "address": TEST_ADDRESS }),
        );
        assert_eq!(verified["data"]["verified"], true);
        assert_eq!(verified["data"]["address"], TEST_ADDRESS);
    }

    #[test]
    fn test_sign_typed_message() {
        let signed = call(
            personal_signer_sign_typed_message,
            &serde_json::json!({
                "types": ["string", "address", "uint256"],
                "args": ["hello world", "0x1cE28c56C1Eb78C2d8c0059f37f6BF2B21484616", "1000000000000000000"],
                "private_key": TEST_PRIVATE_KEY,
            }),
        );
        assert_eq!(signed["success"], true);
        assert!(signed["data"]["signature"].as_str().unwrap().starts_with("0x5ae4bb27"));
        assert_eq!(signed["data"]["v"], 28);
        assert_eq!(signed["data"]["recovery_id"], 1);
    }

    #[test]
    fn test_private_key_to_address() {
        let result = call(
            personal_signer_private_key_to_address,
            &serde_json::json!({ "private_key": TEST_PRIVATE_KEY }),
        );
        assert_eq!(result["data"]["address"], TEST_ADDRESS);
    }

    #[test]
    fn test_errors_are_reported_as_json() {
        let result = call(
            personal_signer_sign_typed_message,
            &serde_json::json!({ "types": ["bytes"], "args": ["00"], "private_key": TEST_PRIVATE_KEY }),
        );
        assert_eq!(result["success"], false);
        assert_eq!(result["error"]["code"], "unsupported_type");

        let result = call(personal_signer_private_key_to_address, &serde_json::json!({ "key": "x" }));
        assert_eq!(result["error"]["code"], "invalid_input");
    }

    #[test]
    fn test_internal_error_envelope() {
        let ptr = error_response(CoreError::internal("unexpected recovery id 4"));
        let output = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        personal_signer_free_string(ptr);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"]["code"], "internal");
        assert_eq!(parsed["error"]["message"], "unexpected recovery id 4");
    }

    #[test]
    fn test_null_input() {
        let ptr = personal_signer_personal_sign(std::ptr::null());
        let output = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        personal_signer_free_string(ptr);
        assert!(output.contains("Null input pointer"));
        personal_signer_free_string(std::ptr::null_mut());
    }
}
