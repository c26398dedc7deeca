//! Identity token codec.
//!
//! An identity token is the opaque string embedded in an employee's
//! scannable badge. It binds the employee's company and number:
//!
//! ```text
//! EMP_<company-uuid>_<employee-number>_<random-suffix>
//! ```
//!
//! The separator is reserved — company ids are UUIDs (no underscores)
//! and employee numbers are rejected at creation when they contain one.
//! The random suffix only makes tokens visually distinct; it is not
//! validated on decode and is not a security boundary. Decoding does
//! not verify tenant membership either — that is the caller's job.

use thiserror::Error;
use uuid::Uuid;

/// Literal prefix every identity token starts with.
pub const TOKEN_PREFIX: &str = "EMP";

/// Field separator, reserved: must not appear in employee numbers.
pub const TOKEN_SEPARATOR: char = '_';

/// Length of the random suffix appended at encode time.
const SUFFIX_LEN: usize = 8;

/// A scanned payload failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed identity token: {0}")]
pub struct MalformedToken(pub &'static str);

impl From<MalformedToken> for crate::error::ClockinError {
    fn from(err: MalformedToken) -> Self {
        crate::error::ClockinError::Validation {
            message: err.to_string(),
        }
    }
}

/// The `(company, employee number)` pair carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityToken {
    pub company_id: Uuid,
    pub employee_number: String,
}

/// Encode a company/number pair into a fresh identity token.
///
/// Each call produces a distinct token thanks to the random suffix.
pub fn encode(company_id: Uuid, employee_number: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{TOKEN_PREFIX}{sep}{company_id}{sep}{employee_number}{sep}{}",
        &suffix[..SUFFIX_LEN],
        sep = TOKEN_SEPARATOR,
    )
}

/// Decode a scanned payload back into its company/number pair.
pub fn decode(raw: &str) -> Result<IdentityToken, MalformedToken> {
    let parts: Vec<&str> = raw.split(TOKEN_SEPARATOR).collect();

    if parts[0] != TOKEN_PREFIX {
        return Err(MalformedToken("missing prefix"));
    }
    // Prefix plus at least company, number, and suffix fields.
    if parts.len() < 4 {
        return Err(MalformedToken("too few fields"));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(MalformedToken("empty field"));
    }

    let company_id =
        Uuid::parse_str(parts[1]).map_err(|_| MalformedToken("company id is not a UUID"))?;

    Ok(IdentityToken {
        company_id,
        employee_number: parts[2].to_string(),
    })
}
