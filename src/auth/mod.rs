//! Caller identity: password credentials and signed session tokens.

/// Argon2 password hashing
pub mod password;
/// JWT session tokens
pub mod token;
