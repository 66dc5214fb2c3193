/*
 * Responsibility
 * - POST /api/v1/echo: handler に届いたフォーム項目を返す
 * - フォームで送られたトークンはゲートが取り除くので、ここには現れない
 */
use axum::{Form, Json};
use hs256_gate::Authenticated;

use crate::api::v1::dto::{claims::AppClaims, echo::EchoResponse};

pub async fn echo(
    Authenticated(claims): Authenticated<AppClaims>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Json<EchoResponse> {
    Json(EchoResponse {
        sub: claims.registered.sub,
        fields,
    })
}
