//! Time entry domain model.
//!
//! One working-day record for one employee. A scan toggles the entry
//! from Working to Completed; admins may also create and edit entries
//! by hand.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Working,
    Completed,
}

/// Attendance record for one employee on one calendar day.
///
/// Wall-clock instants are naive: the tenant-local clock is not
/// modeled, a single process clock is used throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: EntryStatus,
    pub last_scan_time: Option<NaiveDateTime>,
}

impl TimeEntry {
    /// Hours between check-in and check-out, rounded to two decimals.
    ///
    /// `None` when either side is missing.
    pub fn hours_worked(&self) -> Option<f64> {
        let check_in = self.check_in?;
        let check_out = self.check_out?;
        let hours = (check_out - check_in).num_seconds() as f64 / 3600.0;
        Some((hours * 100.0).round() / 100.0)
    }
}

/// Fields required to create a new time entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeEntry {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: EntryStatus,
    pub last_scan_time: Option<NaiveDateTime>,
}

/// Fields that can be updated on an existing time entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTimeEntry {
    pub date: Option<NaiveDate>,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: Option<EntryStatus>,
}
