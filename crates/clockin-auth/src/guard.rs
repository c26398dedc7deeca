//! Tenant scope guard.
//!
//! Capability checks layered over the resolved [`Principal`]. Services
//! never see a raw bearer credential; they receive the record admitted
//! by one of these checks and use its `company_id` as the only tenant
//! filter value in every query. No check ever hands a tenant user
//! wildcard access across companies.

use clockin_core::error::{ClockinError, ClockinResult};
use clockin_core::models::{
    owner::Owner,
    user::{Role, User},
};

use crate::principal::Principal;

/// Admit only the platform owner.
pub fn require_owner(principal: &Principal) -> ClockinResult<&Owner> {
    match principal {
        Principal::Owner(owner) => Ok(owner),
        Principal::TenantUser(_) => Err(ClockinError::AuthorizationDenied {
            reason: "owner access required".into(),
        }),
    }
}

/// Admit any tenant user.
///
/// The returned record's `company_id` is the tenant boundary for the
/// request.
pub fn require_tenant_user(principal: &Principal) -> ClockinResult<&User> {
    match principal {
        Principal::TenantUser(user) => Ok(user),
        Principal::Owner(_) => Err(ClockinError::AuthorizationDenied {
            reason: "tenant user access required".into(),
        }),
    }
}

/// Admit only tenant users with the admin role.
pub fn require_admin(principal: &Principal) -> ClockinResult<&User> {
    let user = require_tenant_user(principal)?;
    if user.role != Role::Admin {
        return Err(ClockinError::AuthorizationDenied {
            reason: "admin role required".into(),
        });
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn owner_principal() -> Principal {
        Principal::Owner(Owner {
            id: Uuid::new_v4(),
            username: "root".into(),
            email: "root@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        })
    }

    fn user_principal(role: Role) -> Principal {
        Principal::TenantUser(User {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn owner_passes_owner_check_only() {
        let p = owner_principal();
        assert!(require_owner(&p).is_ok());
        assert!(matches!(
            require_tenant_user(&p),
            Err(ClockinError::AuthorizationDenied { .. })
        ));
        assert!(matches!(
            require_admin(&p),
            Err(ClockinError::AuthorizationDenied { .. })
        ));
    }

    #[test]
    fn admin_passes_tenant_and_admin_checks() {
        let p = user_principal(Role::Admin);
        assert!(require_tenant_user(&p).is_ok());
        assert!(require_admin(&p).is_ok());
        assert!(matches!(
            require_owner(&p),
            Err(ClockinError::AuthorizationDenied { .. })
        ));
    }

    #[test]
    fn regular_user_fails_admin_check() {
        let p = user_principal(Role::User);
        assert!(require_tenant_user(&p).is_ok());
        assert!(matches!(
            require_admin(&p),
            Err(ClockinError::AuthorizationDenied { .. })
        ));
    }
}
