//! SurrealDB repository implementations.

mod company;
mod employee;
mod owner;
mod time_entry;
mod user;

pub use company::SurrealCompanyRepository;
pub use employee::SurrealEmployeeRepository;
pub use owner::SurrealOwnerRepository;
pub use time_entry::SurrealTimeEntryRepository;
pub use user::SurrealUserRepository;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::DbError;

/// Stored format for naive wall-clock instants.
const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Stored format for calendar days.
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn fmt_wall_clock(instant: NaiveDateTime) -> String {
    instant.format(WALL_CLOCK_FORMAT).to_string()
}

pub(crate) fn parse_wall_clock(raw: &str) -> Result<NaiveDateTime, DbError> {
    NaiveDateTime::parse_from_str(raw, WALL_CLOCK_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("invalid wall-clock instant '{raw}': {e}")))
}

pub(crate) fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("invalid date '{raw}': {e}")))
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
pub(crate) fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}
