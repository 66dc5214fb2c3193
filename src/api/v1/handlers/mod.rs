pub mod echo;
pub mod health;
pub mod me;
