//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `company_id` parameter to enforce data isolation; lookups
//! that miss the filter report `NotFound`, never the existence of a
//! foreign company's record.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::ClockinResult;
use crate::models::{
    company::{Company, CreateCompany},
    employee::{CreateEmployee, Employee, UpdateEmployee},
    owner::{CreateOwner, Owner},
    time_entry::{CreateTimeEntry, TimeEntry, UpdateTimeEntry},
    user::{CreateUser, Role, User},
};

// ---------------------------------------------------------------------------
// Platform scope
// ---------------------------------------------------------------------------

pub trait OwnerRepository: Send + Sync {
    fn create(&self, input: CreateOwner) -> impl Future<Output = ClockinResult<Owner>> + Send;
    fn get_by_username(&self, username: &str)
    -> impl Future<Output = ClockinResult<Owner>> + Send;
}

pub trait CompanyRepository: Send + Sync {
    fn create(&self, input: CreateCompany) -> impl Future<Output = ClockinResult<Company>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClockinResult<Company>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = ClockinResult<Company>> + Send;
    fn list(&self) -> impl Future<Output = ClockinResult<Vec<Company>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClockinResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant scope
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = ClockinResult<User>> + Send;
    fn get_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = ClockinResult<User>> + Send;
    /// Global lookup — usernames are unique across all companies, so
    /// login and uniqueness checks run without a tenant filter.
    fn get_by_username(&self, username: &str) -> impl Future<Output = ClockinResult<User>> + Send;
    /// Tenant-scoped lookup used when resolving a bearer credential.
    fn get_by_username_in_company(
        &self,
        company_id: Uuid,
        username: &str,
    ) -> impl Future<Output = ClockinResult<User>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = ClockinResult<Vec<User>>> + Send;
    fn count_by_company(
        &self,
        company_id: Uuid,
        role: Option<Role>,
    ) -> impl Future<Output = ClockinResult<u64>> + Send;
    fn delete(&self, company_id: Uuid, id: Uuid) -> impl Future<Output = ClockinResult<()>> + Send;
    fn delete_by_company(&self, company_id: Uuid)
    -> impl Future<Output = ClockinResult<()>> + Send;
}

pub trait EmployeeRepository: Send + Sync {
    fn create(&self, input: CreateEmployee)
    -> impl Future<Output = ClockinResult<Employee>> + Send;
    fn get_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = ClockinResult<Employee>> + Send;
    fn get_by_number(
        &self,
        company_id: Uuid,
        number: &str,
    ) -> impl Future<Output = ClockinResult<Employee>> + Send;
    fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = ClockinResult<Vec<Employee>>> + Send;
    fn count_by_company(&self, company_id: Uuid)
    -> impl Future<Output = ClockinResult<u64>> + Send;
    fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateEmployee,
    ) -> impl Future<Output = ClockinResult<Employee>> + Send;
    fn delete(&self, company_id: Uuid, id: Uuid) -> impl Future<Output = ClockinResult<()>> + Send;
    fn delete_by_company(&self, company_id: Uuid)
    -> impl Future<Output = ClockinResult<()>> + Send;
}

/// Time entries are keyed by employee, not company; callers must verify
/// the owning employee's tenancy before acting on an entry fetched by
/// id.
pub trait TimeEntryRepository: Send + Sync {
    fn create(
        &self,
        input: CreateTimeEntry,
    ) -> impl Future<Output = ClockinResult<TimeEntry>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClockinResult<TimeEntry>> + Send;
    /// All entries for one employee on one calendar day.
    fn list_for_day(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = ClockinResult<Vec<TimeEntry>>> + Send;
    /// Insert a new Working entry for `(employee, date)` unless one
    /// already exists. The existence check and the insert run in a
    /// single transaction; a concurrent open surfaces as
    /// `AlreadyExists`.
    fn open_entry(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        scan_time: NaiveDateTime,
    ) -> impl Future<Output = ClockinResult<TimeEntry>> + Send;
    /// Conditionally complete an entry previously observed as Working.
    ///
    /// The write is keyed on the entry's identity and predicated on
    /// `status = working`; `None` means the predicate no longer held —
    /// a concurrent scan closed the entry first.
    fn close_entry(
        &self,
        entry_id: Uuid,
        scan_time: NaiveDateTime,
    ) -> impl Future<Output = ClockinResult<Option<TimeEntry>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTimeEntry,
    ) -> impl Future<Output = ClockinResult<TimeEntry>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClockinResult<()>> + Send;
    fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> impl Future<Output = ClockinResult<Vec<TimeEntry>>> + Send;
    /// Entries for a set of employees, most recent date first.
    fn list_by_employees(
        &self,
        employee_ids: &[Uuid],
    ) -> impl Future<Output = ClockinResult<Vec<TimeEntry>>> + Send;
    fn delete_by_employee(
        &self,
        employee_id: Uuid,
    ) -> impl Future<Output = ClockinResult<()>> + Send;
}
