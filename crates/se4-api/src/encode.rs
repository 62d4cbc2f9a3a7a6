//! Wire encoding for SE4 responses.
//!
//! All encoders are pure: the same input always yields the same bytes.

use serde::Serialize;
use se4_health::Report;
use thiserror::Error;

/// Body of the plain-text views when every selected test passed.
pub const TOKEN_OK: &[u8] = b"\"OK\"";
/// Body of the plain-text views when a selected test failed.
pub const TOKEN_BAD: &[u8] = b"\"Bad\"";

/// Failure to serialize a response document.
#[derive(Debug, Error)]
#[error("failed to encode response: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Encode any JSON document.
pub fn encode_json<T: Serialize + ?Sized>(doc: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(doc)?)
}

/// Encode a healthcheck report.
pub fn encode_report(report: &Report) -> Result<Vec<u8>, EncodeError> {
    encode_json(report)
}

/// The literal `"OK"` / `"Bad"` token.
pub fn encode_token(failed: bool) -> &'static [u8] {
    if failed { TOKEN_BAD } else { TOKEN_OK }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    message: &'a str,
}

/// Encode an error as `{"status":..,"message":..}`.
pub fn encode_error(status: u16, message: &str) -> Result<Vec<u8>, EncodeError> {
    encode_json(&ErrorBody { status, message })
}
