//! Authentication configuration.

/// Configuration for credential issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for HS256 JWT signing and verification.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 86_400 = 24 hours).
    ///
    /// Owner and tenant user credentials share the same window.
    pub token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing
    /// and verification.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 86_400,
            pepper: None,
        }
    }
}
