//! Check-in/check-out state machine.
//!
//! A scan toggles the employee's day between Working and Completed.
//! Per `(employee, date)` at most one Working entry exists; a Completed
//! entry does not block a later check-in the same day once its cooldown
//! has elapsed, so a single day may accumulate several completed
//! cycles.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::identity;
use clockin_core::models::time_entry::{EntryStatus, TimeEntry};
use clockin_core::repository::{EmployeeRepository, TimeEntryRepository};

use crate::error::AttendanceError;

/// Minimum interval between accepted scans for one employee.
pub const COOLDOWN_SECONDS: u64 = 5;

/// What an accepted scan did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    CheckIn,
    CheckOut,
}

/// Result of an accepted scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub action: ScanAction,
    /// Employee display name.
    pub employee: String,
    /// Wall-clock instant the scan was served at.
    pub time: NaiveDateTime,
    pub cooldown_seconds: u64,
    /// The entry the scan created or completed.
    pub entry: TimeEntry,
}

/// The scan state machine.
pub struct AttendanceService<E: EmployeeRepository, T: TimeEntryRepository> {
    employee_repo: E,
    entry_repo: T,
}

impl<E: EmployeeRepository, T: TimeEntryRepository> AttendanceService<E, T> {
    pub fn new(employee_repo: E, entry_repo: T) -> Self {
        Self {
            employee_repo,
            entry_repo,
        }
    }

    /// Process a scanned payload at the current process-clock instant.
    ///
    /// `company_id` is the scanning principal's tenant boundary as
    /// derived by the guard.
    pub async fn scan(&self, company_id: Uuid, payload: &str) -> ClockinResult<ScanOutcome> {
        self.scan_at(company_id, payload, Local::now().naive_local())
            .await
    }

    /// Process a scanned payload at an explicit wall-clock instant.
    pub async fn scan_at(
        &self,
        company_id: Uuid,
        payload: &str,
        now: NaiveDateTime,
    ) -> ClockinResult<ScanOutcome> {
        let token = identity::decode(payload)?;
        if token.company_id != company_id {
            return Err(AttendanceError::ForeignToken.into());
        }

        let employee = self
            .employee_repo
            .get_by_number(company_id, &token.employee_number)
            .await?;

        let today = now.date();
        let entries = self.entry_repo.list_for_day(employee.id, today).await?;

        // Cooldown consults every entry of the day, completed cycles
        // included; the toggle below only consults Working entries.
        if let Some(last_scan) = entries.iter().filter_map(|e| e.last_scan_time).max() {
            let elapsed = (now - last_scan).num_seconds();
            if elapsed < COOLDOWN_SECONDS as i64 {
                let remaining = (COOLDOWN_SECONDS as i64 - elapsed).max(0) as u64;
                return Err(AttendanceError::CooldownActive {
                    remaining_seconds: remaining,
                }
                .into());
            }
        }

        let open = entries.iter().find(|e| e.status == EntryStatus::Working);
        let outcome = if let Some(open) = open {
            match self.entry_repo.close_entry(open.id, now).await? {
                Some(entry) => ScanOutcome {
                    action: ScanAction::CheckOut,
                    employee: employee.display_name(),
                    time: now,
                    cooldown_seconds: COOLDOWN_SECONDS,
                    entry,
                },
                // A concurrent scan closed the entry between our read
                // and the conditional write. Serialized, this scan
                // would have landed inside the cooldown.
                None => {
                    return Err(AttendanceError::CooldownActive {
                        remaining_seconds: COOLDOWN_SECONDS,
                    }
                    .into());
                }
            }
        } else {
            match self.entry_repo.open_entry(employee.id, today, now).await {
                Ok(entry) => ScanOutcome {
                    action: ScanAction::CheckIn,
                    employee: employee.display_name(),
                    time: now,
                    cooldown_seconds: COOLDOWN_SECONDS,
                    entry,
                },
                // Same race, other direction: a concurrent scan opened
                // the day first.
                Err(ClockinError::AlreadyExists { .. }) => {
                    return Err(AttendanceError::CooldownActive {
                        remaining_seconds: COOLDOWN_SECONDS,
                    }
                    .into());
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            employee_id = %employee.id,
            action = ?outcome.action,
            "scan accepted"
        );
        Ok(outcome)
    }
}
