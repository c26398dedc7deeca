//! Platform owner domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-level principal that manages companies.
///
/// Owners are provisioned out-of-band at bootstrap and are not
/// associated with any company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an owner account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOwner {
    pub username: String,
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}
