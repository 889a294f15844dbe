//! HMAC-SHA384 request signing (§4.3).

use hmac::{Hmac, Mac};
use sha2::Sha384;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha384 = Hmac<Sha384>;

/// Current wall-clock milliseconds, scaled by 1000, as a decimal string —
/// the nonce format the venue expects.
pub fn nonce_now() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis();
    (millis * 1000).to_string()
}

/// Signs `"AUTH" || nonce || nonce` with `api_secret`, returning the
/// lowercase hex digest.
pub fn sign_auth_payload(api_secret: &str, nonce: &str) -> String {
    let payload = format!("AUTH{nonce}{nonce}");
    let mut mac =
        HmacSha384::new_from_slice(api_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_lowercase_hex_of_expected_length() {
        let sig = sign_auth_payload("secret", "1234567890000");
        assert_eq!(sig.len(), 96);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn same_inputs_are_deterministic() {
        let a = sign_auth_payload("secret", "42");
        let b = sign_auth_payload("secret", "42");
        assert_eq!(a, b);
    }

    #[test]
    fn different_nonces_change_signature() {
        let a = sign_auth_payload("secret", "1");
        let b = sign_auth_payload("secret", "2");
        assert_ne!(a, b);
    }

    #[test]
    fn nonce_now_is_numeric_and_ends_in_three_zeros() {
        let nonce = nonce_now();
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        assert!(nonce.ends_with("000"));
    }
}
