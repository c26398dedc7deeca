//! Tenant user management.

use tracing::info;
use uuid::Uuid;

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::models::{
    company::Company,
    user::{CreateUser, Role, User},
};
use clockin_core::repository::{CompanyRepository, UserRepository};

/// Input for creating a tenant user.
#[derive(Debug, Clone)]
pub struct MemberInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Tenant-scoped user management.
///
/// Listing, creating, and deleting members is admin-only; the company
/// info lookup is open to any user of the company. Callers pass the
/// company id admitted by the guard.
pub struct MemberService<U: UserRepository, C: CompanyRepository> {
    user_repo: U,
    company_repo: C,
}

impl<U: UserRepository, C: CompanyRepository> MemberService<U, C> {
    pub fn new(user_repo: U, company_repo: C) -> Self {
        Self {
            user_repo,
            company_repo,
        }
    }

    /// The caller's own company record.
    pub async fn company_info(&self, company_id: Uuid) -> ClockinResult<Company> {
        self.company_repo.get_by_id(company_id).await
    }

    /// All users of the company.
    pub async fn list(&self, company_id: Uuid) -> ClockinResult<Vec<User>> {
        self.user_repo.list_by_company(company_id).await
    }

    /// Create a user in the caller's company.
    ///
    /// Usernames are unique across the whole system, so the uniqueness
    /// probe runs unfiltered.
    pub async fn create(&self, company_id: Uuid, input: MemberInput) -> ClockinResult<User> {
        match self.user_repo.get_by_username(&input.username).await {
            Ok(_) => {
                return Err(ClockinError::AlreadyExists {
                    entity: "username".into(),
                });
            }
            Err(ClockinError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let user = self
            .user_repo
            .create(CreateUser {
                company_id,
                username: input.username,
                email: input.email,
                password: input.password,
                role: input.role,
            })
            .await?;

        info!(user_id = %user.id, company_id = %company_id, "user created");
        Ok(user)
    }

    /// Delete a user of the caller's company.
    ///
    /// Self-deletion is rejected; that guard is also the only thing
    /// standing between a company and losing its last admin.
    pub async fn delete(
        &self,
        company_id: Uuid,
        caller_id: Uuid,
        user_id: Uuid,
    ) -> ClockinResult<()> {
        let user = self.user_repo.get_by_id(company_id, user_id).await?;

        if user.id == caller_id {
            return Err(ClockinError::Validation {
                message: "cannot delete your own account".into(),
            });
        }

        self.user_repo.delete(company_id, user.id).await
    }
}
