/*
 * Responsibility
 * - GET /api/v1/me: ゲートが検証した claims をそのまま返す
 */
use axum::Json;
use hs256_gate::Authenticated;

use crate::api::v1::dto::claims::AppClaims;

pub async fn me(Authenticated(claims): Authenticated<AppClaims>) -> Json<AppClaims> {
    tracing::debug!(sub = ?claims.registered.sub, "me");
    Json(claims)
}
