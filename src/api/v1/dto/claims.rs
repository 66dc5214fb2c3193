/*
 * Responsibility
 * - このサービスが受け付ける access token の claims
 * - 登録済み claims (exp/nbf/iat...) の検証は RegisteredClaims に委譲
 */
use hs256_gate::{Claims, ClaimsError, RegisteredClaims};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    #[serde(flatten)]
    pub registered: RegisteredClaims,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims for AppClaims {
    fn validate(&self) -> Result<(), ClaimsError> {
        self.registered.validate()?;

        // Project convention: every token names its subject
        match self.registered.sub.as_deref() {
            Some(sub) if !sub.trim().is_empty() => Ok(()),
            _ => Err(ClaimsError::Rejected("missing 'sub' claim".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_is_required() {
        let claims = AppClaims::default();
        assert!(matches!(claims.validate(), Err(ClaimsError::Rejected(_))));

        let claims = AppClaims {
            registered: RegisteredClaims {
                sub: Some("alice".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(claims.validate(), Ok(()));
    }
}
