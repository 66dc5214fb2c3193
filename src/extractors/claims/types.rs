use axum::http::{Extensions, Request};

use crate::services::auth::Claims;

/// Extensions key for gate-verified claims.
///
/// Private so nothing outside this crate can insert or overwrite an entry.
#[derive(Clone)]
struct VerifiedClaims<C>(C);

pub(crate) fn attach<C: Claims>(extensions: &mut Extensions, claims: C) {
    extensions.insert(VerifiedClaims(claims));
}

/// Claims the gate attached, or `None` when the request never went through a
/// gate for `C`. Never panics.
pub fn claims_from_extensions<C: Claims>(extensions: &Extensions) -> Option<C> {
    extensions
        .get::<VerifiedClaims<C>>()
        .map(|VerifiedClaims(claims)| claims.clone())
}

pub fn claims<C: Claims, B>(req: &Request<B>) -> Option<C> {
    claims_from_extensions(req.extensions())
}
