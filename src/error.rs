/*
 * Responsibility
 * - ゲートが返す AuthError 定義
 * - IntoResponse 実装 (HTTP status / plain-text body)
 * - 検証エラー / claims エラーを 401/403 に統一的に変換
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::{ClaimsError, VerifyError};

pub const INVALID_TOKEN: &str = "token is invalid";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no JSON web token in request")]
    MissingToken,
    /// Parse/verify failure. The message is surfaced as the 403 body.
    #[error(transparent)]
    Unverifiable(#[from] VerifyError),
    /// Same as `Unverifiable` but with the parser detail withheld from the client.
    #[error("token is invalid")]
    Redacted(VerifyError),
    /// Verified, but the claim set refused itself. Cause is logged only.
    #[error("token is invalid")]
    Invalid(#[from] ClaimsError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::Unverifiable(_) | AuthError::Redacted(_) | AuthError::Invalid(_) => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // &str bodies are served as text/plain; charset=utf-8
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_unauthorized() {
        let err = AuthError::MissingToken;
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "no JSON web token in request");
    }

    #[test]
    fn verify_error_text_is_surfaced() {
        let err = AuthError::from(VerifyError::UnexpectedSigningMethod("RS256".into()));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "unexpected signing method: RS256");
    }

    #[test]
    fn redacted_and_invalid_share_generic_text() {
        let redacted = AuthError::Redacted(VerifyError::Malformed("bad".into()));
        let invalid = AuthError::from(ClaimsError::Expired);
        assert_eq!(redacted.to_string(), INVALID_TOKEN);
        assert_eq!(invalid.to_string(), INVALID_TOKEN);
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);
    }
}
