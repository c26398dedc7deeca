//! Clockin Attendance — employee roster management, the scan
//! check-in/check-out state machine, and the manual time ledger.

pub mod error;
pub mod ledger;
pub mod roster;
pub mod scan;

pub use error::AttendanceError;
pub use ledger::{CreateManualEntry, EditEntry, LedgerRow, TimeLedgerService};
pub use roster::{EmployeeInput, EmployeeService};
pub use scan::{AttendanceService, COOLDOWN_SECONDS, ScanAction, ScanOutcome};
