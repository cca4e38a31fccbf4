use crate::{
    error::{Error, TokenError},
    percent_encode_component,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

///Self-verifying invite credential. Never stored server-side; the signature
///is the only proof of authenticity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InvitePayload {
    pub email: String,
    ///unix seconds
    pub exp: i64,
}

///Issues and verifies `base64url(payload).base64url(hmac-sha256)` invite
///tokens. Constructed only when a signing secret is configured; a missing
///secret disables the invite flow entirely.
pub struct InviteTokenCodec {
    secret: Vec<u8>,
}

impl InviteTokenCodec {
    pub fn new(secret: &str) -> Option<Self> {
        let secret = secret.trim();
        if secret.is_empty() {
            return None;
        }
        Some(Self {
            secret: secret.as_bytes().to_vec(),
        })
    }

    pub fn issue(&self, email: &str, lifetime_seconds: i64) -> Result<String, Error> {
        let payload = InvitePayload {
            email: email.to_string(),
            exp: Utc::now().timestamp() + lifetime_seconds,
        };
        let encoded_payload = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(&payload).map_err(TokenError::PayloadSerialisation)?);
        let signature = self.sign(encoded_payload.as_bytes());
        Ok(format!("{}.{}", encoded_payload, signature))
    }

    ///Every failure mode collapses to None: bad shape, bad base64/JSON,
    ///missing fields, past expiry, signature mismatch. Callers must not
    ///reveal which check failed.
    pub fn verify(&self, token: &str) -> Option<InvitePayload> {
        let (encoded_payload, encoded_signature) = token.split_once('.')?;
        if encoded_payload.is_empty() || encoded_signature.is_empty() {
            return None;
        }
        let payload_bytes = URL_SAFE_NO_PAD.decode(encoded_payload).ok()?;
        let payload: InvitePayload = serde_json::from_slice(&payload_bytes).ok()?;
        if payload.email.is_empty() {
            return None;
        }
        if Utc::now().timestamp() > payload.exp {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(encoded_signature).ok()?;
        //constant-time comparison over the exact encoded-payload bytes
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(encoded_payload.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(payload)
    }

    ///`{base}/invite?t={token}&c={code}` — the link mailed to invitees.
    pub fn invite_url(base_url: &str, token: &str, code: Option<&str>) -> String {
        let base = base_url.trim_end_matches('/');
        match code {
            Some(code) if !code.is_empty() => format!(
                "{}/invite?t={}&c={}",
                base,
                token,
                percent_encode_component(code)
            ),
            _ => format!("{}/invite?t={}", base, token),
        }
    }

    fn sign(&self, data: &[u8]) -> String {
        //Hmac<Sha256> accepts keys of any length
        let mut mac = match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(data);
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> InviteTokenCodec {
        InviteTokenCodec::new("unit-test-signing-secret").unwrap()
    }

    #[test]
    fn empty_secret_disables_codec() {
        assert!(InviteTokenCodec::new("").is_none());
        assert!(InviteTokenCodec::new("   ").is_none());
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let codec = codec();
        let token = codec.issue("ava@example.com", 600).unwrap();
        let payload = codec.verify(&token).expect("fresh token should verify");
        assert_eq!(payload.email, "ava@example.com");
        let expected_exp = Utc::now().timestamp() + 600;
        assert!((payload.exp - expected_exp).abs() <= 2);
    }

    #[test]
    fn wire_format_is_payload_dot_signature() {
        let codec = codec();
        let token = codec.issue("ava@example.com", 600).unwrap();
        let (p64, s64) = token.split_once('.').unwrap();
        let payload_bytes = URL_SAFE_NO_PAD.decode(p64).unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).unwrap();
        assert_eq!(payload["email"], "ava@example.com");
        assert!(payload["exp"].is_i64());
        assert!(URL_SAFE_NO_PAD.decode(s64).is_ok());
    }

    #[test]
    fn expired_token_is_invalid_despite_good_signature() {
        let codec = codec();
        let token = codec.issue("ava@example.com", -60).unwrap();
        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let codec = codec();
        let token = codec.issue("ava@example.com", 600).unwrap();
        let (_, s64) = token.split_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&InvitePayload {
                email: "mallory@example.com".to_string(),
                exp: Utc::now().timestamp() + 600,
            })
            .unwrap(),
        );
        assert!(codec
            .verify(&format!("{}.{}", forged_payload, s64))
            .is_none());
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let codec = codec();
        let token = codec.issue("ava@example.com", 600).unwrap();
        let (p64, _) = token.split_once('.').unwrap();
        assert!(codec.verify(&format!("{}.{}", p64, "AAAA")).is_none());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = codec().issue("ava@example.com", 600).unwrap();
        let other = InviteTokenCodec::new("different-secret").unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn malformed_shapes_are_invalid() {
        let codec = codec();
        for token in ["", "no-dot", ".", "a.", ".b", "!!!.!!!", "e30.AAAA"] {
            assert!(codec.verify(token).is_none(), "accepted {:?}", token);
        }
    }

    #[test]
    fn invite_url_encodes_the_code() {
        let url = InviteTokenCodec::invite_url("http://localhost:5000/", "abc.def", Some("IC 1234"));
        assert_eq!(url, "http://localhost:5000/invite?t=abc.def&c=IC%201234");
        let bare = InviteTokenCodec::invite_url("http://localhost:5000", "abc.def", None);
        assert_eq!(bare, "http://localhost:5000/invite?t=abc.def");
    }
}
