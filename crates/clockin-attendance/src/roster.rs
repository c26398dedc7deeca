//! Employee roster management.

use tracing::info;
use uuid::Uuid;

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::identity;
use clockin_core::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use clockin_core::repository::{EmployeeRepository, TimeEntryRepository};

/// Input for creating an employee. The identity token is minted here,
/// not supplied by the caller.
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    pub name: String,
    pub surname: String,
    pub position: String,
    pub number: String,
}

/// Tenant-scoped, admin-only roster operations.
pub struct EmployeeService<E: EmployeeRepository, T: TimeEntryRepository> {
    employee_repo: E,
    entry_repo: T,
}

impl<E: EmployeeRepository, T: TimeEntryRepository> EmployeeService<E, T> {
    pub fn new(employee_repo: E, entry_repo: T) -> Self {
        Self {
            employee_repo,
            entry_repo,
        }
    }

    /// Create an employee and mint its identity token.
    pub async fn create(&self, company_id: Uuid, input: EmployeeInput) -> ClockinResult<Employee> {
        validate_number(&input.number)?;
        self.ensure_number_free(company_id, &input.number).await?;

        let identity_token = identity::encode(company_id, &input.number);
        let employee = self
            .employee_repo
            .create(CreateEmployee {
                company_id,
                name: input.name,
                surname: input.surname,
                position: input.position,
                number: input.number,
                identity_token,
            })
            .await?;

        info!(employee_id = %employee.id, company_id = %company_id, "employee created");
        Ok(employee)
    }

    /// All employees of the company.
    pub async fn list(&self, company_id: Uuid) -> ClockinResult<Vec<Employee>> {
        self.employee_repo.list_by_company(company_id).await
    }

    /// Fetch one employee of the company.
    pub async fn get(&self, company_id: Uuid, id: Uuid) -> ClockinResult<Employee> {
        self.employee_repo.get_by_id(company_id, id).await
    }

    /// Update display fields and the employee number.
    ///
    /// The identity token is left untouched: tokens are immutable once
    /// minted, even across number changes.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateEmployee,
    ) -> ClockinResult<Employee> {
        let current = self.employee_repo.get_by_id(company_id, id).await?;

        if let Some(number) = &input.number {
            validate_number(number)?;
            if *number != current.number {
                self.ensure_number_free(company_id, number).await?;
            }
        }

        self.employee_repo.update(company_id, id, input).await
    }

    /// Delete an employee and every time entry recorded for them.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> ClockinResult<()> {
        let employee = self.employee_repo.get_by_id(company_id, id).await?;
        self.employee_repo.delete(company_id, id).await?;
        self.entry_repo.delete_by_employee(employee.id).await
    }

    async fn ensure_number_free(&self, company_id: Uuid, number: &str) -> ClockinResult<()> {
        match self.employee_repo.get_by_number(company_id, number).await {
            Ok(_) => Err(ClockinError::AlreadyExists {
                entity: "employee number".into(),
            }),
            Err(ClockinError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn validate_number(number: &str) -> ClockinResult<()> {
    if number.is_empty() {
        return Err(ClockinError::Validation {
            message: "employee number must not be empty".into(),
        });
    }
    if number.contains(identity::TOKEN_SEPARATOR) {
        return Err(ClockinError::Validation {
            message: format!(
                "employee number must not contain '{}'",
                identity::TOKEN_SEPARATOR
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_validation() {
        assert!(validate_number("E1").is_ok());
        assert!(validate_number("").is_err());
        assert!(validate_number("E_1").is_err());
    }
}
