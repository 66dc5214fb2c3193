use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Claims;

use super::claims_from_extensions;

/// Handler で、 ゲートが検証した claims を受け取るための extractor
/// middleware が claims を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ゲートがかかってない・ミドルウェア未設定）
#[derive(Debug, Clone)]
pub struct Authenticated<C>(pub C);

impl<C, S> FromRequestParts<S> for Authenticated<C>
where
    C: Claims,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        claims_from_extensions(&parts.extensions)
            .map(Authenticated)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
