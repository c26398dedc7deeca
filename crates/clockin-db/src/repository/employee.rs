//! SurrealDB implementation of [`EmployeeRepository`].

use chrono::{DateTime, Utc};
use clockin_core::error::ClockinResult;
use clockin_core::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use clockin_core::repository::EmployeeRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct EmployeeRow {
    company_id: String,
    name: String,
    surname: String,
    position: String,
    number: String,
    identity_token: String,
    created_at: DateTime<Utc>,
}

impl EmployeeRow {
    fn into_employee(self, id: Uuid) -> Result<Employee, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Corrupt(format!("invalid company UUID: {e}")))?;
        Ok(Employee {
            id,
            company_id,
            name: self.name,
            surname: self.surname,
            position: self.position,
            number: self.number,
            identity_token: self.identity_token,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct EmployeeRowWithId {
    record_id: String,
    company_id: String,
    name: String,
    surname: String,
    position: String,
    number: String,
    identity_token: String,
    created_at: DateTime<Utc>,
}

impl EmployeeRowWithId {
    fn try_into_employee(self) -> Result<Employee, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::Corrupt(format!("invalid company UUID: {e}")))?;
        Ok(Employee {
            id,
            company_id,
            name: self.name,
            surname: self.surname,
            position: self.position,
            number: self.number,
            identity_token: self.identity_token,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Employee repository.
#[derive(Clone)]
pub struct SurrealEmployeeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEmployeeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EmployeeRepository for SurrealEmployeeRepository<C> {
    async fn create(&self, input: CreateEmployee) -> ClockinResult<Employee> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('employee', $id) SET \
                 company_id = $company_id, \
                 name = $name, surname = $surname, \
                 position = $position, number = $number, \
                 identity_token = $identity_token",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", input.company_id.to_string()))
            .bind(("name", input.name))
            .bind(("surname", input.surname))
            .bind(("position", input.position))
            .bind(("number", input.number))
            .bind(("identity_token", input.identity_token))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn get_by_id(&self, company_id: Uuid, id: Uuid) -> ClockinResult<Employee> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('employee', $id) \
                 WHERE company_id = $company_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn get_by_number(&self, company_id: Uuid, number: &str) -> ClockinResult<Employee> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM employee \
                 WHERE company_id = $company_id AND number = $number",
            )
            .bind(("company_id", company_id.to_string()))
            .bind(("number", number.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: format!("number={number}"),
        })?;

        Ok(row.try_into_employee()?)
    }

    async fn list_by_company(&self, company_id: Uuid) -> ClockinResult<Vec<Employee>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM employee \
                 WHERE company_id = $company_id \
                 ORDER BY created_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EmployeeRowWithId> = result.take(0).map_err(DbError::from)?;

        let employees = rows
            .into_iter()
            .map(|row| row.try_into_employee())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(employees)
    }

    async fn count_by_company(&self, company_id: Uuid) -> ClockinResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM employee \
                 WHERE company_id = $company_id GROUP ALL",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateEmployee,
    ) -> ClockinResult<Employee> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.surname.is_some() {
            sets.push("surname = $surname");
        }
        if input.position.is_some() {
            sets.push("position = $position");
        }
        if input.number.is_some() {
            sets.push("number = $number");
        }

        if sets.is_empty() {
            return self.get_by_id(company_id, id).await;
        }

        let query = format!(
            "UPDATE type::record('employee', $id) SET {} \
             WHERE company_id = $company_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(surname) = input.surname {
            builder = builder.bind(("surname", surname));
        }
        if let Some(position) = input.position {
            builder = builder.bind(("position", position));
        }
        if let Some(number) = input.number {
            builder = builder.bind(("number", number));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<EmployeeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "employee".into(),
            id: id_str,
        })?;

        Ok(row.into_employee(id)?)
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> ClockinResult<()> {
        self.db
            .query(
                "DELETE type::record('employee', $id) \
                 WHERE company_id = $company_id",
            )
            .bind(("id", id.to_string()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_by_company(&self, company_id: Uuid) -> ClockinResult<()> {
        self.db
            .query("DELETE employee WHERE company_id = $company_id")
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
