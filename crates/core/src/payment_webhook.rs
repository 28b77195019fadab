//! Payment-completion webhook signatures.
//!
//! The payment processor signs each notification with HMAC-SHA256 over
//! `"{timestamp}.{body}"` and sends `t=<unix>,v1=<hex>` in the
//! [`SIGNATURE_HEADER`] header. Notifications older than the tolerance are
//! rejected to limit replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "koda-signature";

/// Default maximum age of a signed notification.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Hex-encoded signature of `payload` at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(mac_for(secret, timestamp, payload).finalize().into_bytes())
}

/// Full header value for `payload` at `timestamp`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={timestamp},v1={}",
        compute_signature(secret, timestamp, payload)
    )
}

/// Verify a signature header against `payload`.
///
/// `now` is the current Unix time. Any malformed, stale, or mismatching
/// header yields [`CoreError::Unauthorized`].
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<(), CoreError> {
    let invalid = || CoreError::Unauthorized("Invalid payment signature".into());

    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or_else(invalid)?;
    if (now - timestamp).abs() > tolerance_secs {
        return Err(invalid());
    }

    let matches = signatures.iter().any(|sig| {
        hex::decode(sig).is_some_and(|bytes| {
            mac_for(secret, timestamp, payload)
                .verify_slice(&bytes)
                .is_ok()
        })
    });
    if matches {
        Ok(())
    } else {
        Err(invalid())
    }
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
            .collect()
    }
}
