use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::claims::Claims;

/// Errors returned while parsing and verifying a token.
///
/// The Display text is what the gate puts in the 403 body.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{0}")]
    Malformed(String),
    #[error("unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),
    #[error("{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("cannot decode claims: {0}")]
    Claims(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read the declared `alg` of a compact token and accept the HMAC family only.
///
/// This runs before any key is touched, so an RS*/ES*/EdDSA or `none` header
/// never reaches signature verification.
pub fn signing_method(token: &str) -> Result<Algorithm, VerifyError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(VerifyError::Malformed(
            "token contains an invalid number of segments".into(),
        ));
    }

    let raw = URL_SAFE_NO_PAD
        .decode(segments[0].trim_end_matches('='))
        .map_err(|e| VerifyError::Malformed(format!("malformed token header: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&raw)
        .map_err(|e| VerifyError::Malformed(format!("malformed token header: {e}")))?;

    match header.alg.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(VerifyError::UnexpectedSigningMethod(other.to_string())),
    }
}

/// HMAC (HS256/HS384/HS512) token verifier over a shared secret.
///
/// - Key material is intentionally not printable via Debug.
/// - Only signature and structure are checked here; exp/nbf/iat belong to
///   `Claims::validate`.
#[derive(Clone)]
pub struct HmacVerifier {
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for HmacVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacVerifier").finish_non_exhaustive()
    }
}

impl HmacVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Verify the signature and return the raw payload object.
    pub fn verify_payload(&self, token: &str) -> Result<Map<String, Value>, VerifyError> {
        let alg = signing_method(token)?;

        let mut validation = Validation::new(alg);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &validation,
        )?;

        Ok(data.claims)
    }

    /// Verify the token and decode its payload on top of `claims`.
    ///
    /// Payload fields replace the values in `claims`; fields the payload does
    /// not carry, or carries as `null`, keep whatever `claims` already held.
    pub fn verify_into<C: Claims>(&self, token: &str, claims: C) -> Result<C, VerifyError> {
        let payload = self.verify_payload(token)?;

        let merged = match serde_json::to_value(claims)? {
            Value::Object(mut fields) => {
                for (key, value) in payload {
                    if value.is_null() && fields.contains_key(&key) {
                        continue;
                    }
                    fields.insert(key, value);
                }
                fields
            }
            _ => payload,
        };

        Ok(serde_json::from_value(Value::Object(merged))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::{ClaimsError, RegisteredClaims};
    use jsonwebtoken::{EncodingKey, Header, errors::ErrorKind};
    use serde::Serialize;
    use serde_json::json;

    const SECRET: &[u8] = b"top-secret";

    fn sign<T: Serialize>(alg: Algorithm, claims: &T, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    // Same payload and signature, but the header claims another algorithm.
    fn with_alg(token: &str, alg: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(json!({ "alg": alg, "typ": "JWT" }).to_string());
        let (_, rest) = token.split_once('.').unwrap();
        format!("{header}.{rest}")
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TenantClaims {
        #[serde(flatten)]
        registered: RegisteredClaims,
        tenant: String,
    }

    impl Claims for TenantClaims {
        fn validate(&self) -> Result<(), ClaimsError> {
            self.registered.validate()
        }
    }

    #[test]
    fn hmac_family_is_accepted() {
        let claims = json!({ "sub": "alice" });
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign(alg, &claims, SECRET);
            assert_eq!(signing_method(&token).unwrap(), alg);
            let payload = HmacVerifier::new(SECRET).verify_payload(&token).unwrap();
            assert_eq!(payload["sub"], "alice");
        }
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let token = sign(Algorithm::HS256, &json!({ "sub": "alice" }), b"other");
        let err = HmacVerifier::new(SECRET).verify_payload(&token).unwrap_err();
        match err {
            VerifyError::Jwt(e) => assert!(matches!(e.kind(), ErrorKind::InvalidSignature)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn asymmetric_alg_is_rejected_before_verification() {
        let token = with_alg(&sign(Algorithm::HS256, &json!({}), SECRET), "RS256");
        let err = HmacVerifier::new(SECRET).verify_payload(&token).unwrap_err();
        assert_eq!(err.to_string(), "unexpected signing method: RS256");
    }

    #[test]
    fn none_alg_is_rejected() {
        let token = with_alg(&sign(Algorithm::HS256, &json!({}), SECRET), "none");
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let unsigned = format!("{unsigned}.");

        for candidate in [token, unsigned] {
            let err = HmacVerifier::new(SECRET)
                .verify_payload(&candidate)
                .unwrap_err();
            assert!(matches!(err, VerifyError::UnexpectedSigningMethod(ref alg) if alg == "none"));
        }
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let err = HmacVerifier::new(SECRET)
            .verify_payload("abc.def")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "token contains an invalid number of segments"
        );
    }

    #[test]
    fn garbage_header_is_malformed() {
        let err = signing_method("!!!.e30.sig").unwrap_err();
        assert!(matches!(err, VerifyError::Malformed(_)));
    }

    #[test]
    fn payload_overlays_factory_instance() {
        let token = sign(Algorithm::HS256, &json!({ "sub": "alice" }), SECRET);
        let base = TenantClaims {
            registered: RegisteredClaims::default(),
            tenant: "default-tenant".into(),
        };

        let claims = HmacVerifier::new(SECRET).verify_into(&token, base).unwrap();
        assert_eq!(claims.registered.sub.as_deref(), Some("alice"));
        assert_eq!(claims.tenant, "default-tenant");
    }

    #[test]
    fn null_claim_keeps_factory_value() {
        let token = sign(
            Algorithm::HS256,
            &json!({ "sub": "alice", "tenant": null }),
            SECRET,
        );
        let base = TenantClaims {
            registered: RegisteredClaims::default(),
            tenant: "default-tenant".into(),
        };

        let claims = HmacVerifier::new(SECRET).verify_into(&token, base).unwrap();
        assert_eq!(claims.registered.sub.as_deref(), Some("alice"));
        assert_eq!(claims.tenant, "default-tenant");
    }

    #[test]
    fn mistyped_claim_is_a_decode_error() {
        let token = sign(Algorithm::HS256, &json!({ "tenant": 42 }), SECRET);
        let base = TenantClaims {
            registered: RegisteredClaims::default(),
            tenant: String::new(),
        };

        let err = HmacVerifier::new(SECRET)
            .verify_into(&token, base)
            .unwrap_err();
        assert!(matches!(err, VerifyError::Claims(_)));
    }
}
