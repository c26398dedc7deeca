//! Manual time ledger operations.
//!
//! Admin-driven creation and correction of time entries, all scoped by
//! the caller's company. Target resolution always goes entry → owning
//! employee → company filter; a miss anywhere reports the entry as not
//! found rather than confirming that a foreign company's entry exists.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::models::time_entry::{
    CreateTimeEntry, EntryStatus, TimeEntry, UpdateTimeEntry,
};
use clockin_core::repository::{EmployeeRepository, TimeEntryRepository};

/// Wall-clock formats accepted from manual input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Input for a manually created entry.
#[derive(Debug, Clone)]
pub struct CreateManualEntry {
    pub employee_id: Uuid,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Check-in time, `HH:MM`.
    pub check_in: String,
    /// Optional check-out time, `HH:MM`.
    pub check_out: Option<String>,
}

/// Corrections to an existing entry. Times are parsed against the new
/// date when one is supplied, else against the stored date.
#[derive(Debug, Clone, Default)]
pub struct EditEntry {
    pub date: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// A ledger row joined with its employee's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    #[serde(flatten)]
    pub entry: TimeEntry,
    pub employee_name: String,
    pub employee_number: String,
    pub employee_position: String,
    pub hours_worked: Option<f64>,
}

/// Tenant-scoped, admin-only ledger operations.
pub struct TimeLedgerService<E: EmployeeRepository, T: TimeEntryRepository> {
    employee_repo: E,
    entry_repo: T,
}

fn parse_date(raw: &str) -> ClockinResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ClockinError::Validation {
        message: format!("invalid date: {raw}"),
    })
}

fn parse_wall_clock(date: NaiveDate, raw: &str) -> ClockinResult<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| {
        ClockinError::Validation {
            message: format!("invalid time: {raw}"),
        }
    })?;
    Ok(date.and_time(time))
}

impl<E: EmployeeRepository, T: TimeEntryRepository> TimeLedgerService<E, T> {
    pub fn new(employee_repo: E, entry_repo: T) -> Self {
        Self {
            employee_repo,
            entry_repo,
        }
    }

    /// Create a manual entry for an employee of the caller's company.
    ///
    /// The manual path performs no toggle or cooldown checks — it is a
    /// bookkeeping correction, not a scan.
    pub async fn create_entry(
        &self,
        company_id: Uuid,
        input: CreateManualEntry,
    ) -> ClockinResult<TimeEntry> {
        let employee = self
            .employee_repo
            .get_by_id(company_id, input.employee_id)
            .await?;

        let date = parse_date(&input.date)?;
        let check_in = parse_wall_clock(date, &input.check_in)?;
        let (check_out, status) = match &input.check_out {
            Some(raw) => (Some(parse_wall_clock(date, raw)?), EntryStatus::Completed),
            None => (None, EntryStatus::Working),
        };

        self.entry_repo
            .create(CreateTimeEntry {
                employee_id: employee.id,
                date,
                check_in: Some(check_in),
                check_out,
                status,
                last_scan_time: Some(Local::now().naive_local()),
            })
            .await
    }

    /// Correct an existing entry's date and times.
    ///
    /// The status flips to Completed once a check-out lands and a
    /// check-in exists on either side of the edit.
    pub async fn edit_entry(
        &self,
        company_id: Uuid,
        entry_id: Uuid,
        input: EditEntry,
    ) -> ClockinResult<TimeEntry> {
        let entry = self.resolve_scoped(company_id, entry_id).await?;

        let mut update = UpdateTimeEntry::default();
        let base_date = match &input.date {
            Some(raw) => {
                let date = parse_date(raw)?;
                update.date = Some(date);
                date
            }
            None => entry.date,
        };
        if let Some(raw) = &input.check_in {
            update.check_in = Some(parse_wall_clock(base_date, raw)?);
        }
        if let Some(raw) = &input.check_out {
            update.check_out = Some(parse_wall_clock(base_date, raw)?);
            if update.check_in.is_some() || entry.check_in.is_some() {
                update.status = Some(EntryStatus::Completed);
            }
        }

        self.entry_repo.update(entry.id, update).await
    }

    /// Delete a single entry of the caller's company.
    pub async fn delete_entry(&self, company_id: Uuid, entry_id: Uuid) -> ClockinResult<()> {
        let entry = self.resolve_scoped(company_id, entry_id).await?;
        self.entry_repo.delete(entry.id).await
    }

    /// All entries of the company's employees joined with display
    /// fields, most recent date first.
    ///
    /// Entries whose employee no longer resolves are skipped.
    pub async fn list_entries(&self, company_id: Uuid) -> ClockinResult<Vec<LedgerRow>> {
        let employees = self.employee_repo.list_by_company(company_id).await?;
        let ids: Vec<Uuid> = employees.iter().map(|e| e.id).collect();
        let by_id: HashMap<Uuid, _> = employees.iter().map(|e| (e.id, e)).collect();

        let entries = self.entry_repo.list_by_employees(&ids).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let employee = by_id.get(&entry.employee_id)?;
                Some(LedgerRow {
                    employee_name: employee.display_name(),
                    employee_number: employee.number.clone(),
                    employee_position: employee.position.clone(),
                    hours_worked: entry.hours_worked(),
                    entry,
                })
            })
            .collect())
    }

    /// All entries for one employee of the caller's company.
    pub async fn entries_for_employee(
        &self,
        company_id: Uuid,
        employee_id: Uuid,
    ) -> ClockinResult<Vec<TimeEntry>> {
        let employee = self.employee_repo.get_by_id(company_id, employee_id).await?;
        self.entry_repo.list_by_employee(employee.id).await
    }

    /// Resolve an entry by id and verify its employee belongs to the
    /// given company.
    async fn resolve_scoped(&self, company_id: Uuid, entry_id: Uuid) -> ClockinResult<TimeEntry> {
        let entry = self.entry_repo.get_by_id(entry_id).await.map_err(|e| {
            scoped_not_found(e, entry_id)
        })?;
        self.employee_repo
            .get_by_id(company_id, entry.employee_id)
            .await
            .map_err(|e| scoped_not_found(e, entry_id))?;
        Ok(entry)
    }
}

/// Mask any scoped-resolution miss as "time entry not found" so a
/// cross-tenant probe learns nothing about foreign entries.
fn scoped_not_found(err: ClockinError, entry_id: Uuid) -> ClockinError {
    match err {
        ClockinError::NotFound { .. } => ClockinError::NotFound {
            entity: "time_entry".into(),
            id: entry_id.to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_clock_formats() {
        let date = parse_date("2025-03-14").unwrap();
        let dt = parse_wall_clock(date, "08:30").unwrap();
        assert_eq!(dt.to_string(), "2025-03-14 08:30:00");
    }

    #[test]
    fn rejects_unparseable_date() {
        assert!(matches!(
            parse_date("14-03-2025"),
            Err(ClockinError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_time() {
        let date = parse_date("2025-03-14").unwrap();
        assert!(matches!(
            parse_wall_clock(date, "8.30am"),
            Err(ClockinError::Validation { .. })
        ));
    }
}
