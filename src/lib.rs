//! hs256-gate
//!
//! Stateless JSON Web Token authentication for axum services, HMAC (HS256/HS384/HS512) only.
//!
//! - `middleware::auth::locate` finds the token: `Authorization` header (verbatim,
//!   no `Bearer ` stripping), then `Authorization` query parameter, then
//!   `Authorization` form field (removed from the body before it reaches handlers)
//! - `middleware::auth::JwtHs256` verifies it, rejecting every non-HMAC `alg`,
//!   decodes the payload into a fresh claims value from the caller's factory and
//!   lets the claims validate themselves
//! - `extractors::claims` reads the verified claims back in handlers
//!
//! ```ignore
//! use hs256_gate::{JwtHs256, RegisteredClaims, middleware::auth};
//!
//! let gate = JwtHs256::new(secret, RegisteredClaims::default);
//! let app = auth::apply(Router::new().route("/me", get(me)), gate);
//! ```
//!
//! Responses: 401 `no JSON web token in request`, 403 with the parser error,
//! 403 `token is invalid` when the claims refuse themselves.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod services;

pub use error::AuthError;
pub use extractors::claims::{Authenticated, claims, claims_from_extensions};
pub use middleware::auth::JwtHs256;
pub use services::auth::{Claims, ClaimsError, RegisteredClaims};
