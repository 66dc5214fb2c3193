pub mod claims;
pub mod echo;
