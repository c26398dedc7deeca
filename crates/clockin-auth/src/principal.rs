//! Resolved request principals.

use serde::Serialize;
use uuid::Uuid;

use clockin_core::models::{
    owner::Owner,
    user::{Role, User},
};

use crate::token::PrincipalKind;

/// Exactly one authenticated identity per request: platform owner or
/// tenant user, never both.
///
/// Produced by [`crate::service::AuthService::resolve`]; consumed
/// through the checks in [`crate::guard`].
#[derive(Debug, Clone)]
pub enum Principal {
    Owner(Owner),
    TenantUser(User),
}

impl Principal {
    /// Public view of the principal, safe to return to clients.
    pub fn profile(&self) -> PrincipalProfile {
        match self {
            Principal::Owner(owner) => PrincipalProfile {
                id: owner.id,
                username: owner.username.clone(),
                email: owner.email.clone(),
                kind: PrincipalKind::Owner,
                company_id: None,
                role: None,
            },
            Principal::TenantUser(user) => PrincipalProfile {
                id: user.id,
                username: user.username.clone(),
                email: user.email.clone(),
                kind: PrincipalKind::User,
                company_id: Some(user.company_id),
                role: Some(user.role),
            },
        }
    }
}

/// What a principal looks like from the outside (id, names, kind, and
/// for tenant users the company and role).
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub kind: PrincipalKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
