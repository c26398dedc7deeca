//! Clockin Server — application entry point.

mod config;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clockin_attendance::{AttendanceService, EmployeeService, TimeLedgerService};
use clockin_auth::AuthService;
use clockin_core::error::ClockinError;
use clockin_core::models::owner::CreateOwner;
use clockin_core::repository::OwnerRepository;
use clockin_db::DbManager;
use clockin_db::repository::{
    SurrealCompanyRepository, SurrealEmployeeRepository, SurrealOwnerRepository,
    SurrealTimeEntryRepository, SurrealUserRepository,
};
use clockin_tenancy::{MemberService, ProvisioningService};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("clockin=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::load()?;

    info!("Starting clockin server...");

    let db = DbManager::connect(&config.db_config()).await?;
    clockin_db::run_migrations(db.client()).await?;

    bootstrap_owner(&config, db.client()).await?;

    // Repositories are constructed once here and handed to every
    // service explicitly; nothing reaches for a process-wide store.
    let owner_repo = owner_repository(&config, db.client());
    let user_repo = user_repository(&config, db.client());
    let company_repo = SurrealCompanyRepository::new(db.client().clone());
    let employee_repo = SurrealEmployeeRepository::new(db.client().clone());
    let entry_repo = SurrealTimeEntryRepository::new(db.client().clone());

    let _auth = AuthService::new(owner_repo, user_repo.clone(), config.auth_config());
    let _provisioning = ProvisioningService::new(
        company_repo.clone(),
        user_repo.clone(),
        employee_repo.clone(),
        entry_repo.clone(),
        config.auth_config(),
    );
    let _members = MemberService::new(user_repo, company_repo);
    let _roster = EmployeeService::new(employee_repo.clone(), entry_repo.clone());
    let _attendance = AttendanceService::new(employee_repo.clone(), entry_repo.clone());
    let _ledger = TimeLedgerService::new(employee_repo, entry_repo);

    info!("Services initialized.");

    // TODO: mount the REST transport over these services

    info!("clockin server stopped.");
    Ok(())
}

fn owner_repository(config: &ServerConfig, db: &Surreal<Client>) -> SurrealOwnerRepository<Client> {
    match &config.password_pepper {
        Some(pepper) => SurrealOwnerRepository::with_pepper(db.clone(), pepper.clone()),
        None => SurrealOwnerRepository::new(db.clone()),
    }
}

fn user_repository(config: &ServerConfig, db: &Surreal<Client>) -> SurrealUserRepository<Client> {
    match &config.password_pepper {
        Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
        None => SurrealUserRepository::new(db.clone()),
    }
}

/// Create the platform owner account at startup.
///
/// Owners are provisioned out-of-band: when bootstrap credentials are
/// configured and no account with that username exists yet, one is
/// created. There is no API surface for owner creation.
async fn bootstrap_owner(config: &ServerConfig, db: &Surreal<Client>) -> anyhow::Result<()> {
    let (Some(username), Some(email), Some(password)) = (
        &config.owner_username,
        &config.owner_email,
        &config.owner_password,
    ) else {
        return Ok(());
    };

    let repo = owner_repository(config, db);

    match repo.get_by_username(username).await {
        Ok(owner) => {
            info!(owner_id = %owner.id, "Owner account already exists");
            Ok(())
        }
        Err(ClockinError::NotFound { .. }) => {
            let owner = repo
                .create(CreateOwner {
                    username: username.clone(),
                    email: email.clone(),
                    password: password.clone(),
                })
                .await?;
            info!(owner_id = %owner.id, username = %owner.username, "Owner account created");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
