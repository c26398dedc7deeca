//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings; so are enums (with ASSERT constraints)
//! and the naive wall-clock instants of time entries — only record
//! metadata timestamps use the native datetime type.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Owners (platform scope)
-- =======================================================================
DEFINE TABLE owner SCHEMAFULL;
DEFINE FIELD username ON TABLE owner TYPE string;
DEFINE FIELD email ON TABLE owner TYPE string;
DEFINE FIELD password_hash ON TABLE owner TYPE string;
DEFINE FIELD created_at ON TABLE owner TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_owner_username ON TABLE owner \
    COLUMNS username UNIQUE;

-- =======================================================================
-- Companies (platform scope; the tenant boundary)
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD owner_id ON TABLE company TYPE option<string>;
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_name ON TABLE company COLUMNS name UNIQUE;

-- =======================================================================
-- Users (company scope; usernames unique system-wide)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD company_id ON TABLE user TYPE string;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['admin', 'user'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_company ON TABLE user COLUMNS company_id;

-- =======================================================================
-- Employees (company scope; number unique per company)
-- =======================================================================
DEFINE TABLE employee SCHEMAFULL;
DEFINE FIELD company_id ON TABLE employee TYPE string;
DEFINE FIELD name ON TABLE employee TYPE string;
DEFINE FIELD surname ON TABLE employee TYPE string;
DEFINE FIELD position ON TABLE employee TYPE string;
DEFINE FIELD number ON TABLE employee TYPE string;
DEFINE FIELD identity_token ON TABLE employee TYPE string;
DEFINE FIELD created_at ON TABLE employee TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_employee_company_number ON TABLE employee \
    COLUMNS company_id, number UNIQUE;
DEFINE INDEX idx_employee_company ON TABLE employee \
    COLUMNS company_id;

-- =======================================================================
-- Time entries (employee scope; wall-clock instants stored as strings)
-- =======================================================================
DEFINE TABLE time_entry SCHEMAFULL;
DEFINE FIELD employee_id ON TABLE time_entry TYPE string;
DEFINE FIELD date ON TABLE time_entry TYPE string;
DEFINE FIELD check_in ON TABLE time_entry TYPE option<string>;
DEFINE FIELD check_out ON TABLE time_entry TYPE option<string>;
DEFINE FIELD status ON TABLE time_entry TYPE string \
    ASSERT $value IN ['working', 'completed'];
DEFINE FIELD last_scan_time ON TABLE time_entry TYPE option<string>;
DEFINE INDEX idx_time_entry_employee_date ON TABLE time_entry \
    COLUMNS employee_id, date;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
