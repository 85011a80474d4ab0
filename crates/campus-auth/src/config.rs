//! Authentication configuration.

/// Configuration for the token service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for HMAC-SHA256 JWT signing.
    pub jwt_secret: String,
    /// Session token lifetime in minutes (default: 60).
    pub token_lifetime_mins: u64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_lifetime_days: u64,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used during hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_mins: 60,
            refresh_token_lifetime_days: 7,
            pepper: None,
        }
    }
}
