//! Integration tests for company provisioning and member management
//! using in-memory SurrealDB.

use clockin_auth::config::AuthConfig;
use clockin_auth::guard;
use clockin_auth::service::{AuthService, LoginInput};
use clockin_core::error::ClockinError;
use clockin_core::models::owner::CreateOwner;
use clockin_core::models::user::Role;
use clockin_core::repository::{
    EmployeeRepository, OwnerRepository, TimeEntryRepository, UserRepository,
};
use clockin_db::repository::{
    SurrealCompanyRepository, SurrealEmployeeRepository, SurrealOwnerRepository,
    SurrealTimeEntryRepository, SurrealUserRepository,
};
use clockin_tenancy::{CompanyInput, MemberInput, MemberService, ProvisioningService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "tenancy-test-secret".into(),
        token_lifetime_secs: 86_400,
        pepper: None,
    }
}

struct Fixture {
    db: Surreal<Db>,
    provisioning: ProvisioningService<
        SurrealCompanyRepository<Db>,
        SurrealUserRepository<Db>,
        SurrealEmployeeRepository<Db>,
        SurrealTimeEntryRepository<Db>,
    >,
    members: MemberService<SurrealUserRepository<Db>, SurrealCompanyRepository<Db>>,
    auth: AuthService<SurrealOwnerRepository<Db>, SurrealUserRepository<Db>>,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    clockin_db::run_migrations(&db).await.unwrap();

    let provisioning = ProvisioningService::new(
        SurrealCompanyRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        SurrealEmployeeRepository::new(db.clone()),
        SurrealTimeEntryRepository::new(db.clone()),
        test_config(),
    );
    let members = MemberService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
    );
    let auth = AuthService::new(
        SurrealOwnerRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        test_config(),
    );

    Fixture {
        db,
        provisioning,
        members,
        auth,
    }
}

fn acme_input() -> CompanyInput {
    CompanyInput {
        name: "Acme".into(),
        admin_username: "a1".into(),
        admin_email: "a1@acme.example".into(),
        admin_password: "pw1".into(),
    }
}

#[tokio::test]
async fn self_registration_creates_pair_and_logs_in() {
    let fx = setup().await;

    let out = fx.provisioning.register_company(acme_input()).await.unwrap();

    // Self-registered companies carry no owner reference.
    assert_eq!(out.company.owner_id, None);
    assert_eq!(out.user.role, Some(Role::Admin));
    assert_eq!(out.user.company_id, Some(out.company.id));

    // The issued token resolves straight to the new admin.
    let principal = fx.auth.resolve(&out.access_token).await.unwrap();
    let admin = guard::require_admin(&principal).unwrap();
    assert_eq!(admin.company_id, out.company.id);

    // And a fresh login works with the registered credentials.
    let login = fx
        .auth
        .login(LoginInput {
            username: "a1".into(),
            password: "pw1".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.company_id, Some(out.company.id));
}

#[tokio::test]
async fn owner_provisioning_records_the_owner() {
    let fx = setup().await;

    let owner_repo = SurrealOwnerRepository::new(fx.db.clone());
    let owner = owner_repo
        .create(CreateOwner {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "owner-secret".into(),
        })
        .await
        .unwrap();

    let provisioned = fx
        .provisioning
        .create_company(&owner, acme_input())
        .await
        .unwrap();

    assert_eq!(provisioned.company.owner_id, Some(owner.id));
    assert_eq!(provisioned.admin.role, Some(Role::Admin));
}

#[tokio::test]
async fn duplicate_company_name_is_rejected() {
    let fx = setup().await;
    fx.provisioning.register_company(acme_input()).await.unwrap();

    let result = fx
        .provisioning
        .register_company(CompanyInput {
            admin_username: "someone-else".into(),
            ..acme_input()
        })
        .await;
    assert!(matches!(result, Err(ClockinError::AlreadyExists { .. })));
}

#[tokio::test]
async fn duplicate_admin_username_is_rejected_across_companies() {
    let fx = setup().await;
    fx.provisioning.register_company(acme_input()).await.unwrap();

    // Usernames are unique system-wide, not per company.
    let result = fx
        .provisioning
        .register_company(CompanyInput {
            name: "Globex".into(),
            ..acme_input()
        })
        .await;
    assert!(matches!(result, Err(ClockinError::AlreadyExists { .. })));
}

#[tokio::test]
async fn company_listing_carries_counts() {
    let fx = setup().await;
    let out = fx.provisioning.register_company(acme_input()).await.unwrap();

    fx.members
        .create(
            out.company.id,
            MemberInput {
                username: "u1".into(),
                email: "u1@acme.example".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

    let summaries = fx.provisioning.list_companies().await.unwrap();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.company.id, out.company.id);
    assert_eq!(summary.admin_count, 1);
    assert_eq!(summary.user_count, 2);
    assert_eq!(summary.employee_count, 0);
}

#[tokio::test]
async fn deleting_a_company_cascades_and_revokes_access() {
    let fx = setup().await;
    let out = fx.provisioning.register_company(acme_input()).await.unwrap();
    let company_id = out.company.id;

    // Give the company an employee with a recorded entry.
    let employee_repo = SurrealEmployeeRepository::new(fx.db.clone());
    let entry_repo = SurrealTimeEntryRepository::new(fx.db.clone());
    let employee = employee_repo
        .create(clockin_core::models::employee::CreateEmployee {
            company_id,
            name: "Jan".into(),
            surname: "Kowalski".into(),
            position: "Technician".into(),
            number: "E1".into(),
            identity_token: clockin_core::identity::encode(company_id, "E1"),
        })
        .await
        .unwrap();
    entry_repo
        .open_entry(
            employee.id,
            chrono::NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
        .await
        .unwrap();

    fx.provisioning.delete_company(company_id).await.unwrap();

    // Login for the orphaned admin now fails.
    let login = fx
        .auth
        .login(LoginInput {
            username: "a1".into(),
            password: "pw1".into(),
        })
        .await;
    assert!(matches!(
        login,
        Err(ClockinError::AuthenticationFailed { .. })
    ));

    // All dependent records are gone.
    let user_repo = SurrealUserRepository::new(fx.db.clone());
    assert_eq!(user_repo.list_by_company(company_id).await.unwrap().len(), 0);
    assert_eq!(
        employee_repo
            .list_by_company(company_id)
            .await
            .unwrap()
            .len(),
        0
    );
    assert_eq!(
        entry_repo.list_by_employee(employee.id).await.unwrap().len(),
        0
    );

    // Deleting again reports the company as absent.
    let again = fx.provisioning.delete_company(company_id).await;
    assert!(matches!(again, Err(ClockinError::NotFound { .. })));
}

#[tokio::test]
async fn members_can_be_created_listed_and_deleted() {
    let fx = setup().await;
    let out = fx.provisioning.register_company(acme_input()).await.unwrap();
    let company_id = out.company.id;
    let admin_id = out.user.id;

    let user = fx
        .members
        .create(
            company_id,
            MemberInput {
                username: "u1".into(),
                email: "u1@acme.example".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

    let listed = fx.members.list(company_id).await.unwrap();
    assert_eq!(listed.len(), 2);

    // Taken usernames are refused, even from another company.
    let other = fx
        .provisioning
        .register_company(CompanyInput {
            name: "Globex".into(),
            admin_username: "g1".into(),
            admin_email: "g1@globex.example".into(),
            admin_password: "pw".into(),
        })
        .await
        .unwrap();
    let clash = fx
        .members
        .create(
            other.company.id,
            MemberInput {
                username: "u1".into(),
                email: "other@globex.example".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await;
    assert!(matches!(clash, Err(ClockinError::AlreadyExists { .. })));

    // Admins delete other members, never themselves.
    let self_delete = fx.members.delete(company_id, admin_id, admin_id).await;
    assert!(matches!(self_delete, Err(ClockinError::Validation { .. })));

    fx.members
        .delete(company_id, admin_id, user.id)
        .await
        .unwrap();
    assert_eq!(fx.members.list(company_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn member_deletion_is_company_scoped() {
    let fx = setup().await;
    let acme = fx.provisioning.register_company(acme_input()).await.unwrap();
    let globex = fx
        .provisioning
        .register_company(CompanyInput {
            name: "Globex".into(),
            admin_username: "g1".into(),
            admin_email: "g1@globex.example".into(),
            admin_password: "pw".into(),
        })
        .await
        .unwrap();

    // Acme's admin cannot see or delete Globex's admin; the lookup
    // misses the tenant filter and reads as absent.
    let result = fx
        .members
        .delete(acme.company.id, acme.user.id, globex.user.id)
        .await;
    assert!(matches!(result, Err(ClockinError::NotFound { .. })));

    // Company info is scoped the same way.
    let info = fx.members.company_info(acme.company.id).await.unwrap();
    assert_eq!(info.name, "Acme");
}
