//! JWT access token issuance and verification.
//!
//! Tokens are signed with HS256 over a shared secret. The claim set is
//! a strict, typed structure: an unknown principal-kind tag or a
//! loosely-shaped payload fails decoding outright, before any store
//! lookup happens.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clockin_core::models::user::Role;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Principal kind tag embedded at issuance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Owner,
    User,
}

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — username.
    pub sub: String,
    /// Principal kind tag.
    pub kind: PrincipalKind,
    /// Company the subject belongs to; present only for tenant users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    /// Role within the company; present only for tenant users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed access token for a platform owner.
pub fn issue_owner_token(username: &str, config: &AuthConfig) -> Result<String, AuthError> {
    issue(username, PrincipalKind::Owner, None, None, config)
}

/// Issue a signed access token for a tenant user.
pub fn issue_user_token(
    username: &str,
    company_id: Uuid,
    role: Role,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    issue(
        username,
        PrincipalKind::User,
        Some(company_id),
        Some(role),
        config,
    )
}

fn issue(
    username: &str,
    kind: PrincipalKind,
    company_id: Option<Uuid>,
    role: Option<Role>,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = AccessTokenClaims {
        sub: username.to_string(),
        kind,
        company_id,
        role,
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an access token (signature + expiry).
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["sub", "exp"]);

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
