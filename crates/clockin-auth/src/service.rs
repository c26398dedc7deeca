//! Authentication service — login and principal resolution.

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::repository::{OwnerRepository, UserRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::principal::{Principal, PrincipalProfile};
use crate::token::{self, PrincipalKind};

/// Input for the shared login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Public view of the authenticated principal.
    pub user: PrincipalProfile,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<O: OwnerRepository, U: UserRepository> {
    owner_repo: O,
    user_repo: U,
    config: AuthConfig,
}

impl<O: OwnerRepository, U: UserRepository> AuthService<O, U> {
    pub fn new(owner_repo: O, user_repo: U, config: AuthConfig) -> Self {
        Self {
            owner_repo,
            user_repo,
            config,
        }
    }

    /// Authenticate by username + password and issue an access token.
    ///
    /// The owner collection is consulted first, then tenant users.
    /// Usernames are globally unique, so the ordering cannot shadow a
    /// tenant user behind an owner account.
    pub async fn login(&self, input: LoginInput) -> ClockinResult<LoginOutput> {
        match self.owner_repo.get_by_username(&input.username).await {
            Ok(owner) => {
                let valid = password::verify_password(
                    &input.password,
                    &owner.password_hash,
                    self.config.pepper.as_deref(),
                )
                .map_err(ClockinError::from)?;
                if !valid {
                    return Err(AuthError::InvalidCredentials.into());
                }

                let access_token = token::issue_owner_token(&owner.username, &self.config)?;
                return Ok(LoginOutput {
                    access_token,
                    token_type: "bearer".into(),
                    user: Principal::Owner(owner).profile(),
                });
            }
            Err(ClockinError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .map_err(|e| match e {
                ClockinError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(ClockinError::from)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token =
            token::issue_user_token(&user.username, user.company_id, user.role, &self.config)?;
        Ok(LoginOutput {
            access_token,
            token_type: "bearer".into(),
            user: Principal::TenantUser(user).profile(),
        })
    }

    /// Resolve a bearer credential into exactly one principal.
    ///
    /// Signature, expiry, and claim-shape failures all surface as
    /// authentication errors; so does a subject that no longer resolves
    /// to a live record (e.g. after its company was deleted).
    pub async fn resolve(&self, bearer: &str) -> ClockinResult<Principal> {
        let claims = token::decode_token(bearer, &self.config)?;

        match claims.kind {
            PrincipalKind::Owner => {
                let owner = self
                    .owner_repo
                    .get_by_username(&claims.sub)
                    .await
                    .map_err(|e| match e {
                        ClockinError::NotFound { .. } => AuthError::UnknownPrincipal.into(),
                        other => other,
                    })?;
                Ok(Principal::Owner(owner))
            }
            PrincipalKind::User => {
                let company_id = claims
                    .company_id
                    .ok_or(AuthError::MalformedClaims("user credential without company id"))?;
                let user = self
                    .user_repo
                    .get_by_username_in_company(company_id, &claims.sub)
                    .await
                    .map_err(|e| match e {
                        ClockinError::NotFound { .. } => AuthError::UnknownPrincipal.into(),
                        other => other,
                    })?;
                Ok(Principal::TenantUser(user))
            }
        }
    }
}
