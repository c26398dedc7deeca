//! SurrealDB implementation of [`OwnerRepository`].

use chrono::{DateTime, Utc};
use clockin_core::error::ClockinResult;
use clockin_core::models::owner::{CreateOwner, Owner};
use clockin_core::repository::OwnerRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::hash_password;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OwnerRow {
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl OwnerRow {
    fn into_owner(self, id: Uuid) -> Owner {
        Owner {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OwnerRowWithId {
    record_id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl OwnerRowWithId {
    fn try_into_owner(self) -> Result<Owner, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Owner {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Owner repository.
#[derive(Clone)]
pub struct SurrealOwnerRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealOwnerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> OwnerRepository for SurrealOwnerRepository<C> {
    async fn create(&self, input: CreateOwner) -> ClockinResult<Owner> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('owner', $id) SET \
                 username = $username, email = $email, \
                 password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OwnerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "owner".into(),
            id: id_str,
        })?;

        Ok(row.into_owner(id))
    }

    async fn get_by_username(&self, username: &str) -> ClockinResult<Owner> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM owner \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OwnerRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "owner".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_owner()?)
    }
}
