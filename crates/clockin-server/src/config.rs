//! Server configuration module.

use clap::Parser;
use clockin_auth::AuthConfig;
use clockin_db::DbConfig;

/// Clockin server configuration.
#[derive(Debug, Parser)]
#[command(name = "clockin-server", about = "Multi-tenant attendance tracking service", long_about = None)]
pub struct ServerConfig {
    /// SurrealDB WebSocket address
    #[arg(long, env = "SURREAL_URL", default_value = "127.0.0.1:8000")]
    pub db_url: String,

    /// SurrealDB namespace
    #[arg(long, env = "SURREAL_NAMESPACE", default_value = "clockin")]
    pub db_namespace: String,

    /// SurrealDB database name
    #[arg(long, env = "SURREAL_DATABASE", default_value = "main")]
    pub db_database: String,

    /// SurrealDB root username
    #[arg(long, env = "SURREAL_USER", default_value = "root")]
    pub db_username: String,

    /// SurrealDB root password
    #[arg(long, env = "SURREAL_PASS", default_value = "root", hide_env_values = true)]
    pub db_password: String,

    /// Shared secret for JWT signing and verification
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "TOKEN_LIFETIME_SECS", default_value = "86400")]
    pub token_lifetime_secs: u64,

    /// Optional server-side pepper for password hashing
    #[arg(long, env = "PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    /// Bootstrap owner username (account created at startup if absent)
    #[arg(long, env = "OWNER_USERNAME")]
    pub owner_username: Option<String>,

    /// Bootstrap owner email
    #[arg(long, env = "OWNER_EMAIL")]
    pub owner_email: Option<String>,

    /// Bootstrap owner password
    #[arg(long, env = "OWNER_PASSWORD", hide_env_values = true)]
    pub owner_password: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_lifetime_secs: self.token_lifetime_secs,
            pepper: self.password_pepper.clone(),
        }
    }
}
