//! Employee domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee whose attendance is tracked by scanning an identity
/// token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub surname: String,
    pub position: String,
    /// Employee number, unique within the company. Must not contain the
    /// identity token separator.
    pub number: String,
    /// Scannable identity token, minted once at creation and immutable
    /// thereafter.
    pub identity_token: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Display name used in scan results and ledger listings.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Fields required to create a new employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    pub company_id: Uuid,
    pub name: String,
    pub surname: String,
    pub position: String,
    pub number: String,
    pub identity_token: String,
}

/// Fields that can be updated on an existing employee.
///
/// The identity token is deliberately absent: it is immutable, even
/// when the employee number changes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub position: Option<String>,
    pub number: Option<String>,
}
