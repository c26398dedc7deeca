//! Integration tests for the authentication service using in-memory
//! SurrealDB.

use clockin_auth::config::AuthConfig;
use clockin_auth::guard;
use clockin_auth::principal::Principal;
use clockin_auth::service::{AuthService, LoginInput};
use clockin_auth::token::PrincipalKind;
use clockin_core::error::ClockinError;
use clockin_core::models::owner::CreateOwner;
use clockin_core::models::user::{CreateUser, Role};
use clockin_core::repository::{OwnerRepository, UserRepository};
use clockin_db::repository::{SurrealOwnerRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".into(),
        token_lifetime_secs: 86_400,
        pepper: None,
    }
}

/// Spin up in-memory DB, run migrations, create one owner and one
/// tenant admin.
async fn setup() -> (
    SurrealOwnerRepository<Db>,
    SurrealUserRepository<Db>,
    Uuid, // company_id
    Uuid, // admin user id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    clockin_db::run_migrations(&db).await.unwrap();

    let owner_repo = SurrealOwnerRepository::new(db.clone());
    owner_repo
        .create(CreateOwner {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "owner-secret".into(),
        })
        .await
        .unwrap();

    let company_id = Uuid::new_v4();
    let user_repo = SurrealUserRepository::new(db.clone());
    let admin = user_repo
        .create(CreateUser {
            company_id,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "admin-secret".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();

    (owner_repo, user_repo, company_id, admin.id)
}

#[tokio::test]
async fn owner_login_and_resolve() {
    let (owner_repo, user_repo, _company_id, _admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo, test_config());

    let out = svc
        .login(LoginInput {
            username: "root".into(),
            password: "owner-secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(out.token_type, "bearer");
    assert_eq!(out.user.kind, PrincipalKind::Owner);
    assert_eq!(out.user.company_id, None);

    let principal = svc.resolve(&out.access_token).await.unwrap();
    assert!(matches!(principal, Principal::Owner(_)));
    assert!(guard::require_owner(&principal).is_ok());
    assert!(guard::require_tenant_user(&principal).is_err());
}

#[tokio::test]
async fn user_login_carries_company_and_role() {
    let (owner_repo, user_repo, company_id, admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo, test_config());

    let out = svc
        .login(LoginInput {
            username: "alice".into(),
            password: "admin-secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(out.user.kind, PrincipalKind::User);
    assert_eq!(out.user.company_id, Some(company_id));
    assert_eq!(out.user.role, Some(Role::Admin));
    assert_eq!(out.user.id, admin_id);

    let principal = svc.resolve(&out.access_token).await.unwrap();
    let user = guard::require_admin(&principal).unwrap();
    assert_eq!(user.company_id, company_id);
}

#[tokio::test]
async fn wrong_password_is_unauthenticated() {
    let (owner_repo, user_repo, _company_id, _admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo, test_config());

    for username in ["root", "alice"] {
        let result = svc
            .login(LoginInput {
                username: username.into(),
                password: "nope".into(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ClockinError::AuthenticationFailed { .. })
        ));
    }
}

#[tokio::test]
async fn unknown_username_is_unauthenticated() {
    let (owner_repo, user_repo, _company_id, _admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo, test_config());

    let result = svc
        .login(LoginInput {
            username: "mallory".into(),
            password: "whatever".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn garbage_bearer_is_unauthenticated() {
    let (owner_repo, user_repo, _company_id, _admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo, test_config());

    let result = svc.resolve("not-a-jwt").await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn credential_of_a_deleted_user_stops_resolving() {
    let (owner_repo, user_repo, company_id, admin_id) = setup().await;
    let svc = AuthService::new(owner_repo, user_repo.clone(), test_config());

    let out = svc
        .login(LoginInput {
            username: "alice".into(),
            password: "admin-secret".into(),
        })
        .await
        .unwrap();

    user_repo.delete(company_id, admin_id).await.unwrap();

    // The token is still validly signed, but its subject is gone.
    let result = svc.resolve(&out.access_token).await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let (owner_repo, user_repo, _company_id, _admin_id) = setup().await;

    let other_config = AuthConfig {
        jwt_secret: "some-other-secret".into(),
        ..test_config()
    };
    let forged =
        clockin_auth::token::issue_owner_token("root", &other_config).unwrap();

    let svc = AuthService::new(owner_repo, user_repo, test_config());
    let result = svc.resolve(&forged).await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthenticationFailed { .. })
    ));
}
