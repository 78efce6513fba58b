//! Webhook Signature Verification
//!
//! Stripe signs each delivery with `t=<unix>,v1=<hex hmac>`, where the HMAC
//! is SHA-256 over `"{t}.{body}"` keyed by the endpoint's signing secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum accepted age of a signed delivery, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

struct ParsedHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(value.parse::<i64>().map_err(|_| {
                    PaymentError::WebhookSignature("Malformed timestamp".into())
                })?);
            }
            // Non-hex entries cannot match; skip rather than reject
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| PaymentError::WebhookSignature("Missing timestamp".into()))?;
    if signatures.is_empty() {
        return Err(PaymentError::WebhookSignature("No v1 signature".into()));
    }

    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn mac_for(payload: &str, secret: &str, timestamp: i64) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Config(format!("Invalid webhook secret: {e}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Verify a signature header against the raw payload.
///
/// `now` is the current unix time; deliveries whose timestamp is more than
/// `tolerance_secs` away from it are rejected.
pub fn verify(
    payload: &str,
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<()> {
    let parsed = parse_header(header)?;
    let mac = mac_for(payload, secret, parsed.timestamp)?;

    let matched = parsed
        .signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());
    if !matched {
        return Err(PaymentError::WebhookSignature(
            "No signature matches the payload".into(),
        ));
    }

    if now.abs_diff(parsed.timestamp) > tolerance_secs.unsigned_abs() {
        return Err(PaymentError::WebhookSignature(
            "Timestamp outside tolerance".into(),
        ));
    }

    Ok(())
}

/// Produce a signature header for a payload, as Stripe would
pub fn sign(payload: &str, secret: &str, timestamp: i64) -> Result<String> {
    let signature = mac_for(payload, secret, timestamp)?.finalize().into_bytes();
    Ok(format!("t={timestamp},v1={}", hex::encode(signature)))
}
