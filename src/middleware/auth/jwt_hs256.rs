//! HS256 (HMAC) JWT 検証 → claims を extensions に入れる
//!
//! 1. トークンを探す (bearer::locate)。無ければ 401
//! 2. factory で空の claims を作り、署名検証 + payload をその上に decode。失敗は 403 (エラー文をそのまま返す)
//! 3. claims 自身の検証 (exp/nbf/iat など)。失敗は 403 "token is invalid"
//! 4. extensions に入れて next へ

use std::{fmt, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::extractors::claims::attach;
use crate::middleware::auth::bearer::{self, DEFAULT_FORM_LIMIT};
use crate::services::auth::{Claims, HmacVerifier};

type ClaimsFactory<C> = Arc<dyn Fn() -> C + Send + Sync>;

/// JSON Web Token gate using the HMAC signing family.
///
/// Parses the located token into a fresh `C` from `factory` on every request
/// and puts it into the request extensions. Cheap to clone; the secret and
/// factory are shared read-only by every request.
pub struct JwtHs256<C> {
    verifier: HmacVerifier,
    factory: ClaimsFactory<C>,
    error_detail: bool,
    form_limit: usize,
}

impl<C> Clone for JwtHs256<C> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            factory: Arc::clone(&self.factory),
            error_detail: self.error_detail,
            form_limit: self.form_limit,
        }
    }
}

impl<C> fmt::Debug for JwtHs256<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtHs256")
            .field("error_detail", &self.error_detail)
            .field("form_limit", &self.form_limit)
            .finish_non_exhaustive()
    }
}

impl<C: Claims> JwtHs256<C> {
    pub fn new(secret: impl AsRef<[u8]>, factory: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self {
            verifier: HmacVerifier::new(secret),
            factory: Arc::new(factory),
            error_detail: true,
            form_limit: DEFAULT_FORM_LIMIT,
        }
    }

    /// When off, 403 bodies for parse/verify failures carry the generic
    /// "token is invalid" instead of the parser message.
    pub fn with_error_detail(mut self, error_detail: bool) -> Self {
        self.error_detail = error_detail;
        self
    }

    /// Upper bound for buffering a form body while looking for the token.
    pub fn with_form_limit(mut self, form_limit: usize) -> Self {
        self.form_limit = form_limit;
        self
    }

    /// Locate, verify and validate. Does not touch the extensions.
    pub async fn authenticate(&self, req: &mut Request<Body>) -> Result<C, AuthError> {
        let Some((token, source)) = bearer::locate(req, self.form_limit).await else {
            tracing::warn!(uri = %req.uri(), "no JSON web token in request");
            return Err(AuthError::MissingToken);
        };
        tracing::debug!(?source, "token located");

        let claims = self.verifier.verify_into(&token, (self.factory)()).map_err(|err| {
            tracing::warn!(error = %err, ?source, "token verification failed");
            if self.error_detail {
                AuthError::Unverifiable(err)
            } else {
                AuthError::Redacted(err)
            }
        })?;

        if let Err(err) = claims.validate() {
            tracing::warn!(error = %err, ?source, "token claims rejected");
            return Err(AuthError::Invalid(err));
        }

        Ok(claims)
    }
}

impl<C: Claims + Default> JwtHs256<C> {
    /// Gate whose factory is `C::default`.
    pub fn with_default_claims(secret: impl AsRef<[u8]>) -> Self {
        Self::new(secret, C::default)
    }
}

/// Put the gate in front of every route of `router`.
///
/// 例：
/// ```ignore
/// let gate = JwtHs256::new(secret, RegisteredClaims::default);
/// let v1 = middleware::auth::jwt_hs256::apply(api::v1::routes(), gate);
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S, C>(router: Router<S>, gate: JwtHs256<C>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    C: Claims,
{
    // the gate is its own middleware state, independent of the router's `S`
    router.layer(middleware::from_fn_with_state(gate, jwt_hs256::<C>))
}

async fn jwt_hs256<C: Claims>(
    State(gate): State<JwtHs256<C>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = gate.authenticate(&mut req).await?;

    // middleware → extractor への受け渡し
    attach(req.extensions_mut(), claims);

    Ok(next.run(req).await)
}
