//! Cryptographic Utilities
//!
//! Signed tokens have the shape `"<payload>.<base64url(HMAC-SHA256(payload))>"`.

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate a random 32-byte secret key
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Decode standard (padded) base64, as used for secrets in the environment
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Sign a payload, producing `payload.signature`
pub fn sign_token(key: &[u8], payload: &str) -> String {
    let signature = hmac_sha256(key, payload.as_bytes());
    format!("{}.{}", payload, to_base64_url(&signature))
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// The signature comparison is constant-time.
pub fn verify_token<'a>(key: &[u8], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.split_once('.')?;
    if payload.is_empty() || signature_b64.contains('.') {
        return None;
    }

    let signature = from_base64_url(signature_b64).ok()?;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}
