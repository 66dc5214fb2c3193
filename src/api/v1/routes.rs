/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - ゲートを掛ける範囲をここで決める (/health は app.rs 側で公開)
 */
use axum::{
    Router,
    routing::{get, post},
};
use hs256_gate::{JwtHs256, middleware::auth};

use crate::api::v1::dto::claims::AppClaims;
use crate::api::v1::handlers::{echo::echo, me::me};

pub fn routes(gate: JwtHs256<AppClaims>) -> Router {
    let gated = Router::new()
        .route("/me", get(me))
        .route("/echo", post(echo));

    auth::apply(gated, gate)
}
