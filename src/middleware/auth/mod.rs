pub mod bearer;
pub mod jwt_hs256;

pub use bearer::{JWT_AUTH_KEY, TokenSource, locate};
pub use jwt_hs256::{JwtHs256, apply};
