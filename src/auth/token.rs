//! Signed bearer tokens (HS256, JWT compact form)
//!
//! `header.payload.signature`, each part base64url without padding. The
//! signature is HMAC-SHA256 over `header.payload`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    /// Token id, the unit of revocation
    pub jti: String,
}

fn sign(secret: &[u8], signing_input: &str) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidSecret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn encode_token(claims: &Claims, secret: &[u8]) -> Result<String, AuthError> {
    let payload = serde_json::to_vec(claims).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER_JSON),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign(secret, &signing_input)?;
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Check a token against the signing secret, the current time and the
/// revoked token ids (mapped to their expiry). Pure: the same inputs always
/// give the same answer.
pub fn validate_token(
    token: &str,
    secret: &[u8],
    now: i64,
    revoked: &FxHashMap<String, i64>,
) -> Result<Claims, AuthError> {
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(AuthError::MalformedToken("expected three segments".to_string())),
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| AuthError::MalformedToken(format!("header: {}", e)))?;
    let header_value: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|e| AuthError::MalformedToken(format!("header: {}", e)))?;
    if header_value["alg"] != "HS256" {
        return Err(AuthError::MalformedToken("unsupported algorithm".to_string()));
    }

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| AuthError::MalformedToken(format!("signature: {}", e)))?;
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidSecret)?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature_bytes)
        .map_err(|_| AuthError::InvalidSignature)?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&payload_bytes)
        .map_err(|e| AuthError::MalformedToken(format!("payload: {}", e)))?;

    if now >= claims.exp {
        return Err(AuthError::Expired);
    }
    if revoked.contains_key(&claims.jti) {
        return Err(AuthError::Revoked);
    }

    Ok(claims)
}
