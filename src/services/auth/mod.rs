pub mod claims;
pub mod hs256;

pub use claims::{Claims, ClaimsError, RegisteredClaims};
pub use hs256::{HmacVerifier, VerifyError};
