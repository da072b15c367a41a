//! Webhook signature verification
//!
//! When `hub.webhook_secret` is configured, inbound hub calls must carry
//! `x-hub-signature: base64(HMAC-SHA256(secret, body))`.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AppError, AppResult};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Largest webhook body accepted for verification
const MAX_WEBHOOK_BODY: usize = 1024 * 1024;

/// Compute the signature for a body
pub fn sign(secret: &str, body: &[u8]) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Configuration("Failed to create HMAC".to_string()))?;
    mac.update(body);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Check a base64 signature against a body in constant time
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> AppResult<()> {
    let provided = BASE64
        .decode(signature.trim())
        .map_err(|_| AppError::Unauthorized("Invalid signature".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Configuration("Failed to create HMAC".to_string()))?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| AppError::Unauthorized("Invalid signature".to_string()))
}

/// Signature middleware for the hub webhook routes
pub async fn verify_hub_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let secret = match state.config.hub.webhook_secret.as_deref() {
        Some(secret) if !secret.is_empty() => secret,
        _ => return Ok(next.run(request).await),
    };

    let (parts, body) = request.into_parts();

    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", SIGNATURE_HEADER)))?
        .to_string();

    let bytes = to_bytes(body, MAX_WEBHOOK_BODY)
        .await
        .map_err(|e| AppError::ValidationError(format!("Unreadable request body: {}", e)))?;

    if let Err(e) = verify_signature(secret, &bytes, &signature) {
        tracing::warn!("Hub webhook signature verification failed");
        return Err(e);
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let body = br#"{"reference":"PR00001","items":[]}"#;
        let signature = sign("topsecret", body).unwrap();
        assert!(verify_signature("topsecret", body, &signature).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let signature = sign("topsecret", body).unwrap();
        assert!(matches!(
            verify_signature("other", body, &signature),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = sign("topsecret", b"payload").unwrap();
        assert!(verify_signature("topsecret", b"payload!", &signature).is_err());
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(verify_signature("topsecret", b"payload", "not base64!!").is_err());
    }
}
