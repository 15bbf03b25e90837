// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook authentication (§6): HMAC-SHA256 of the raw body, compared in
//! constant time against a shared secret. A mismatch is an
//! [`ApiError::AuthenticationFailure`] with no body detail — the caller
//! learns nothing about why the signature failed.

use crate::error::ApiError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `signature_header` is expected in the `sha256=<hex>` shape GitHub-style
/// webhooks use; a bare hex digest is also accepted.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature_header: &str) -> Result<(), ApiError> {
    let provided_hex = signature_header
        .strip_prefix("sha256=")
        .unwrap_or(signature_header);
    let provided = hex::decode(provided_hex).map_err(|_| ApiError::AuthenticationFailure)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| ApiError::AuthenticationFailure)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| ApiError::AuthenticationFailure)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
