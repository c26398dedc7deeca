//! Company provisioning.
//!
//! A company and its first admin user are created as a pair — by an
//! owner, or through self-registration — and destroyed as a pair
//! together with all dependent employees and time entries.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use clockin_auth::principal::{Principal, PrincipalProfile};
use clockin_auth::{AuthConfig, token};
use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::models::{
    company::{Company, CompanySummary, CreateCompany},
    owner::Owner,
    user::{CreateUser, Role, User},
};
use clockin_core::repository::{
    CompanyRepository, EmployeeRepository, TimeEntryRepository, UserRepository,
};

/// Input for creating a company with its first admin.
#[derive(Debug, Clone)]
pub struct CompanyInput {
    pub name: String,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// A freshly provisioned company/admin pair.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedCompany {
    pub company: Company,
    pub admin: PrincipalProfile,
}

/// Self-registration result: the new admin is logged in immediately.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutput {
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub user: PrincipalProfile,
    pub company: Company,
}

/// Owner-facing company lifecycle operations plus self-registration.
pub struct ProvisioningService<C, U, E, T>
where
    C: CompanyRepository,
    U: UserRepository,
    E: EmployeeRepository,
    T: TimeEntryRepository,
{
    company_repo: C,
    user_repo: U,
    employee_repo: E,
    entry_repo: T,
    auth_config: AuthConfig,
}

impl<C, U, E, T> ProvisioningService<C, U, E, T>
where
    C: CompanyRepository,
    U: UserRepository,
    E: EmployeeRepository,
    T: TimeEntryRepository,
{
    pub fn new(
        company_repo: C,
        user_repo: U,
        employee_repo: E,
        entry_repo: T,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
            employee_repo,
            entry_repo,
            auth_config,
        }
    }

    /// Create a company and its first admin on behalf of an owner.
    pub async fn create_company(
        &self,
        owner: &Owner,
        input: CompanyInput,
    ) -> ClockinResult<ProvisionedCompany> {
        let (company, admin) = self.create_pair(Some(owner.id), input).await?;
        Ok(ProvisionedCompany {
            company,
            admin: Principal::TenantUser(admin).profile(),
        })
    }

    /// Self-registration: create the pair and log the admin in.
    pub async fn register_company(&self, input: CompanyInput) -> ClockinResult<RegistrationOutput> {
        let (company, admin) = self.create_pair(None, input).await?;

        let access_token = token::issue_user_token(
            &admin.username,
            admin.company_id,
            admin.role,
            &self.auth_config,
        )?;
        Ok(RegistrationOutput {
            access_token,
            token_type: "bearer".into(),
            user: Principal::TenantUser(admin).profile(),
            company,
        })
    }

    /// Delete a company and everything reachable from it.
    ///
    /// The cascade runs best-effort per sub-collection with no
    /// rollback; a failure part-way leaves earlier deletions in place.
    pub async fn delete_company(&self, id: Uuid) -> ClockinResult<()> {
        let company = self.company_repo.get_by_id(id).await?;

        let employees = self.employee_repo.list_by_company(company.id).await?;
        for employee in &employees {
            self.entry_repo.delete_by_employee(employee.id).await?;
        }
        self.employee_repo.delete_by_company(company.id).await?;
        self.user_repo.delete_by_company(company.id).await?;
        self.company_repo.delete(company.id).await?;

        info!(company_id = %company.id, name = %company.name, "company deleted");
        Ok(())
    }

    /// Every company with its membership counts.
    pub async fn list_companies(&self) -> ClockinResult<Vec<CompanySummary>> {
        let companies = self.company_repo.list().await?;

        let mut summaries = Vec::with_capacity(companies.len());
        for company in companies {
            let admin_count = self
                .user_repo
                .count_by_company(company.id, Some(Role::Admin))
                .await?;
            let user_count = self.user_repo.count_by_company(company.id, None).await?;
            let employee_count = self.employee_repo.count_by_company(company.id).await?;
            summaries.push(CompanySummary {
                company,
                admin_count,
                user_count,
                employee_count,
            });
        }
        Ok(summaries)
    }

    async fn create_pair(
        &self,
        owner_id: Option<Uuid>,
        input: CompanyInput,
    ) -> ClockinResult<(Company, User)> {
        ensure_free(
            self.company_repo.get_by_name(&input.name).await,
            "company name",
        )?;
        ensure_free(
            self.user_repo.get_by_username(&input.admin_username).await,
            "username",
        )?;

        let company = self
            .company_repo
            .create(CreateCompany {
                name: input.name,
                owner_id,
            })
            .await?;

        let admin = self
            .user_repo
            .create(CreateUser {
                company_id: company.id,
                username: input.admin_username,
                email: input.admin_email,
                password: input.admin_password,
                role: Role::Admin,
            })
            .await?;

        info!(company_id = %company.id, admin_id = %admin.id, "company provisioned");
        Ok((company, admin))
    }
}

/// Turn a successful uniqueness probe into an `AlreadyExists` failure.
fn ensure_free<V>(probe: ClockinResult<V>, entity: &str) -> ClockinResult<()> {
    match probe {
        Ok(_) => Err(ClockinError::AlreadyExists {
            entity: entity.into(),
        }),
        Err(ClockinError::NotFound { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}
