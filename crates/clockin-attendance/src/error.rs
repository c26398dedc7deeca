//! Attendance error types.

use clockin_core::error::ClockinError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Scanned token names a company other than the scanning user's.
    ///
    /// Unlike cross-tenant lookups by id, this surfaces as an explicit
    /// authorization failure: a foreign badge under the scanner is an
    /// expected operator error, not an enumeration attempt.
    #[error("identity token belongs to another company")]
    ForeignToken,

    /// A scan arrived before the previous one's cooldown elapsed.
    #[error("cooldown active, {remaining_seconds}s remaining")]
    CooldownActive { remaining_seconds: u64 },
}

impl From<AttendanceError> for ClockinError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::ForeignToken => ClockinError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AttendanceError::CooldownActive { remaining_seconds } => ClockinError::RateLimited {
                retry_after_seconds: remaining_seconds,
            },
        }
    }
}
