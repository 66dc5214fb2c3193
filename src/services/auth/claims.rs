use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Why a verified token was still refused by its own claims.
///
/// Never sent to the client; the gate answers with a generic message and only
/// logs this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token used before issued")]
    IssuedInFuture,
    #[error("{0}")]
    Rejected(String),
}

/// Capability a claim set needs to pass through the HS256 gate.
///
/// - decoded from the token payload (serde)
/// - cloned out of request extensions by handlers
/// - validates itself once the signature is known to be good (exp/nbf/iss...)
pub trait Claims: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn validate(&self) -> Result<(), ClaimsError>;
}

/// Registered claim names (RFC 7519 section 4.1), all optional.
///
/// Embed with `#[serde(flatten)]` in an application claim set and delegate
/// `validate` to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl RegisteredClaims {
    /// Time checks against an explicit "now" (Unix seconds).
    ///
    /// A time claim of `0` counts as not set.
    pub fn validate_at(&self, now: i64) -> Result<(), ClaimsError> {
        if set(self.exp).is_some_and(|exp| now > exp) {
            return Err(ClaimsError::Expired);
        }
        if set(self.iat).is_some_and(|iat| now < iat) {
            return Err(ClaimsError::IssuedInFuture);
        }
        if set(self.nbf).is_some_and(|nbf| now < nbf) {
            return Err(ClaimsError::NotYetValid);
        }
        Ok(())
    }

    /// Compare `iss` with the expected issuer. A missing claim passes unless `required`.
    pub fn verify_issuer(&self, expected: &str, required: bool) -> bool {
        match self.iss.as_deref() {
            Some(iss) => iss == expected,
            None => !required,
        }
    }

    /// Compare `aud` with the expected audience. A missing claim passes unless `required`.
    pub fn verify_audience(&self, expected: &str, required: bool) -> bool {
        match self.aud.as_deref() {
            Some(aud) => aud == expected,
            None => !required,
        }
    }
}

fn set(claim: Option<i64>) -> Option<i64> {
    claim.filter(|&t| t != 0)
}

impl Claims for RegisteredClaims {
    fn validate(&self) -> Result<(), ClaimsError> {
        self.validate_at(chrono::Utc::now().timestamp())
    }
}
