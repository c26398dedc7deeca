//! Authentication error types.

use clockin_core::error::ClockinError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    /// Signature and expiry verified, but the claims fail shape
    /// validation (e.g. a user credential without a company id).
    #[error("malformed claims: {0}")]
    MalformedClaims(&'static str),

    /// Claims are well-formed but the embedded subject no longer
    /// resolves to a live record.
    #[error("principal no longer exists")]
    UnknownPrincipal,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for ClockinError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_)
            | AuthError::MalformedClaims(_)
            | AuthError::UnknownPrincipal => ClockinError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => ClockinError::Crypto(msg),
        }
    }
}
