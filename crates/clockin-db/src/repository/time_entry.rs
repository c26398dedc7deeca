//! SurrealDB implementation of [`TimeEntryRepository`].
//!
//! The scan toggle is backed by two conditional writes: `open_entry`
//! re-checks inside a transaction that no Working entry exists for the
//! day before creating one, and `close_entry` predicates the
//! completion on the entry still being in Working status. Either way a
//! lost race is reported, not silently absorbed.

use chrono::{NaiveDate, NaiveDateTime};
use clockin_core::error::ClockinResult;
use clockin_core::models::time_entry::{
    CreateTimeEntry, EntryStatus, TimeEntry, UpdateTimeEntry,
};
use clockin_core::repository::TimeEntryRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{fmt_date, fmt_wall_clock, parse_date, parse_wall_clock};

/// Sentinel thrown inside the guarded-insert transaction.
const OPEN_ENTRY_EXISTS: &str = "open_entry_exists";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TimeEntryRow {
    employee_id: String,
    date: String,
    check_in: Option<String>,
    check_out: Option<String>,
    status: String,
    last_scan_time: Option<String>,
}

impl TimeEntryRow {
    fn into_entry(self, id: Uuid) -> Result<TimeEntry, DbError> {
        let employee_id = Uuid::parse_str(&self.employee_id)
            .map_err(|e| DbError::Corrupt(format!("invalid employee UUID: {e}")))?;
        Ok(TimeEntry {
            id,
            employee_id,
            date: parse_date(&self.date)?,
            check_in: self.check_in.as_deref().map(parse_wall_clock).transpose()?,
            check_out: self.check_out.as_deref().map(parse_wall_clock).transpose()?,
            status: parse_status(&self.status)?,
            last_scan_time: self
                .last_scan_time
                .as_deref()
                .map(parse_wall_clock)
                .transpose()?,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TimeEntryRowWithId {
    record_id: String,
    employee_id: String,
    date: String,
    check_in: Option<String>,
    check_out: Option<String>,
    status: String,
    last_scan_time: Option<String>,
}

impl TimeEntryRowWithId {
    fn try_into_entry(self) -> Result<TimeEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        TimeEntryRow {
            employee_id: self.employee_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            status: self.status,
            last_scan_time: self.last_scan_time,
        }
        .into_entry(id)
    }
}

fn parse_status(raw: &str) -> Result<EntryStatus, DbError> {
    match raw {
        "working" => Ok(EntryStatus::Working),
        "completed" => Ok(EntryStatus::Completed),
        other => Err(DbError::Corrupt(format!("unknown entry status: {other}"))),
    }
}

fn status_to_string(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Working => "working",
        EntryStatus::Completed => "completed",
    }
}

/// SurrealDB implementation of the TimeEntry repository.
#[derive(Clone)]
pub struct SurrealTimeEntryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTimeEntryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TimeEntryRepository for SurrealTimeEntryRepository<C> {
    async fn create(&self, input: CreateTimeEntry) -> ClockinResult<TimeEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('time_entry', $id) SET \
                 employee_id = $employee_id, \
                 date = $date, \
                 check_in = $check_in, check_out = $check_out, \
                 status = $status, \
                 last_scan_time = $last_scan_time",
            )
            .bind(("id", id_str.clone()))
            .bind(("employee_id", input.employee_id.to_string()))
            .bind(("date", fmt_date(input.date)))
            .bind(("check_in", input.check_in.map(fmt_wall_clock)))
            .bind(("check_out", input.check_out.map(fmt_wall_clock)))
            .bind(("status", status_to_string(input.status).to_string()))
            .bind(("last_scan_time", input.last_scan_time.map(fmt_wall_clock)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TimeEntryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "time_entry".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ClockinResult<TimeEntry> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('time_entry', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TimeEntryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "time_entry".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list_for_day(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> ClockinResult<Vec<TimeEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM time_entry \
                 WHERE employee_id = $employee_id AND date = $date",
            )
            .bind(("employee_id", employee_id.to_string()))
            .bind(("date", fmt_date(date)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TimeEntryRowWithId> = result.take(0).map_err(DbError::from)?;
        let entries = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entries)
    }

    async fn open_entry(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        scan_time: NaiveDateTime,
    ) -> ClockinResult<TimeEntry> {
        let id = Uuid::new_v4();

        // The existence re-check and the insert run atomically; a
        // concurrent check-in makes the transaction throw instead of
        // creating a second Working entry for the day.
        let result = self
            .db
            .query(format!(
                "BEGIN TRANSACTION; \
                 LET $open = (SELECT VALUE id FROM time_entry \
                   WHERE employee_id = $employee_id AND date = $date \
                   AND status = 'working'); \
                 IF array::len($open) > 0 {{ THROW '{OPEN_ENTRY_EXISTS}' }}; \
                 CREATE type::record('time_entry', $id) SET \
                   employee_id = $employee_id, \
                   date = $date, \
                   check_in = $scan_time, check_out = NONE, \
                   status = 'working', \
                   last_scan_time = $scan_time; \
                 COMMIT TRANSACTION;"
            ))
            .bind(("id", id.to_string()))
            .bind(("employee_id", employee_id.to_string()))
            .bind(("date", fmt_date(date)))
            .bind(("scan_time", fmt_wall_clock(scan_time)))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| {
            if e.to_string().contains(OPEN_ENTRY_EXISTS) {
                DbError::AlreadyExists {
                    entity: "open time entry".into(),
                }
            } else {
                DbError::from(e)
            }
        })?;

        self.get_by_id(id).await
    }

    async fn close_entry(
        &self,
        entry_id: Uuid,
        scan_time: NaiveDateTime,
    ) -> ClockinResult<Option<TimeEntry>> {
        let id_str = entry_id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('time_entry', $id) SET \
                 check_out = $scan_time, \
                 status = 'completed', \
                 last_scan_time = $scan_time \
                 WHERE status = 'working'",
            )
            .bind(("id", id_str))
            .bind(("scan_time", fmt_wall_clock(scan_time)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TimeEntryRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_entry(entry_id)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, input: UpdateTimeEntry) -> ClockinResult<TimeEntry> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.date.is_some() {
            sets.push("date = $date");
        }
        if input.check_in.is_some() {
            sets.push("check_in = $check_in");
        }
        if input.check_out.is_some() {
            sets.push("check_out = $check_out");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('time_entry', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(date) = input.date {
            builder = builder.bind(("date", fmt_date(date)));
        }
        if let Some(check_in) = input.check_in {
            builder = builder.bind(("check_in", fmt_wall_clock(check_in)));
        }
        if let Some(check_out) = input.check_out {
            builder = builder.bind(("check_out", fmt_wall_clock(check_out)));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TimeEntryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "time_entry".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn delete(&self, id: Uuid) -> ClockinResult<()> {
        self.db
            .query("DELETE type::record('time_entry', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_employee(&self, employee_id: Uuid) -> ClockinResult<Vec<TimeEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM time_entry \
                 WHERE employee_id = $employee_id",
            )
            .bind(("employee_id", employee_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TimeEntryRowWithId> = result.take(0).map_err(DbError::from)?;
        let entries = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entries)
    }

    async fn list_by_employees(&self, employee_ids: &[Uuid]) -> ClockinResult<Vec<TimeEntry>> {
        let ids: Vec<String> = employee_ids.iter().map(|id| id.to_string()).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM time_entry \
                 WHERE employee_id IN $employee_ids \
                 ORDER BY date DESC",
            )
            .bind(("employee_ids", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TimeEntryRowWithId> = result.take(0).map_err(DbError::from)?;
        let entries = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entries)
    }

    async fn delete_by_employee(&self, employee_id: Uuid) -> ClockinResult<()> {
        self.db
            .query("DELETE time_entry WHERE employee_id = $employee_id")
            .bind(("employee_id", employee_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
