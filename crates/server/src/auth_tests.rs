use super::*;
use hmac::Mac;

fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn accepts_a_correctly_signed_body() {
    let body = b"push event payload";
    let sig = sign("shared-secret", body);
    assert!(verify_webhook_signature("shared-secret", body, &format!("sha256={sig}")).is_ok());
}

#[test]
fn accepts_a_bare_hex_signature_without_the_prefix() {
    let body = b"push event payload";
    let sig = sign("shared-secret", body);
    assert!(verify_webhook_signature("shared-secret", body, &sig).is_ok());
}

#[test]
fn rejects_a_signature_from_the_wrong_secret() {
    let body = b"push event payload";
    let sig = sign("wrong-secret", body);
    let err = verify_webhook_signature("shared-secret", body, &format!("sha256={sig}"));
    assert!(matches!(err, Err(ApiError::AuthenticationFailure)));
}

#[test]
fn rejects_malformed_hex() {
    let err = verify_webhook_signature("shared-secret", b"body", "sha256=not-hex");
    assert!(matches!(err, Err(ApiError::AuthenticationFailure)));
}
