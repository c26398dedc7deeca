//! Company domain model.
//!
//! Companies are the tenant isolation boundary: users, employees, and
//! time entries are each scoped to exactly one company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    /// Human-readable name, unique across the whole system.
    pub name: String,
    /// Owner that provisioned the company; `None` for companies created
    /// through self-registration.
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub owner_id: Option<Uuid>,
}

/// A company together with its membership counts, as listed for owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    #[serde(flatten)]
    pub company: Company,
    pub admin_count: u64,
    pub user_count: u64,
    pub employee_count: u64,
}
