//! Signing-key material decoding.
//!
//! Operators supply the signing secret in whichever encoding their tooling
//! produces. Decoding tries the structured encodings first and falls back to
//! the raw UTF-8 bytes, so a configured secret only ever fails when it is
//! absent entirely.

use base64ct::{Base64, Encoding};

use crate::config::ConfigError;

/// Decode configured secret material into raw key bytes.
///
/// Attempts, in order, first success wins:
/// 1. standard base64
/// 2. hexadecimal (optional `0x` prefix; odd-length input is left-padded
///    with a leading zero)
/// 3. the raw UTF-8 bytes of the string
///
/// Deterministic and pure. Fails only when the secret is empty or blank.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, ConfigError> {
    if secret.trim().is_empty() {
        return Err(ConfigError::MissingSecret);
    }

    if let Ok(bytes) = Base64::decode_vec(secret) {
        return Ok(bytes);
    }

    if let Some(bytes) = decode_hex(secret) {
        return Ok(bytes);
    }

    Ok(secret.as_bytes().to_vec())
}

fn decode_hex(secret: &str) -> Option<Vec<u8>> {
    let digits = secret.strip_prefix("0x").unwrap_or(secret);
    if digits.is_empty() {
        return None;
    }

    if digits.len() % 2 == 0 {
        hex::decode(digits).ok()
    } else {
        hex::decode(format!("0{digits}")).ok()
    }
}
