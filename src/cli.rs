use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::auth::Role;
use crate::config::{AppConfig, BootstrapAdmin};
use crate::database::models::NewUser;
use crate::database::{DatabaseError, DatabaseManager};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "vet-clinic-api")]
#[command(about = "REST API for a veterinary clinic: cats, visits, treatments and users")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create a user directly in the database")]
    CreateUser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "user", help = "admin or user")]
        role: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    info!("Starting vet clinic API in {:?} mode", config.environment);

    let db = DatabaseManager::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    let state = AppState::new(db.clone(), &config);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state, &config).await,
        Commands::CreateUser {
            email,
            password,
            role,
        } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let user = state
                .users
                .create(NewUser {
                    email,
                    password,
                    role,
                })
                .await
                .context("failed to create user")?;
            println!("Created {} user {} (id {})", user.role, user.email, user.id);
            Ok(())
        }
    };

    db.close().await;
    result
}

async fn serve(state: AppState, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(admin) = &config.bootstrap {
        bootstrap_admin(&state, admin)
            .await
            .context("failed to create bootstrap admin")?;
    }

    let app = crate::app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Vet clinic API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured admin unless a user with that email already exists.
/// A soft-deleted row holding the email is revived as admin with the configured password.
pub async fn bootstrap_admin(state: &AppState, admin: &BootstrapAdmin) -> Result<(), DatabaseError> {
    match state.users.get_user_by_email(&admin.email).await {
        Ok(existing) => {
            info!("Bootstrap admin {} already exists (role {})", existing.email, existing.role);
            Ok(())
        }
        Err(DatabaseError::NotFound(_)) => {
            let admin = NewUser {
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: Role::Admin,
            };

            if let Some(user) = state.users.restore(admin.clone()).await? {
                warn!("Bootstrap admin {} was deleted; restored it", user.email);
                return Ok(());
            }

            let user = state.users.create(admin).await?;
            info!("Created bootstrap admin {}", user.email);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, TestStore};

    fn admin() -> BootstrapAdmin {
        BootstrapAdmin {
            email: "root@clinic.test".to_string(),
            password: "changeme".to_string(),
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_admin_once() {
        let state = test_state().await;
        bootstrap_admin(&state, &admin()).await.unwrap();
        bootstrap_admin(&state, &admin()).await.unwrap();

        let users = state.users.find_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role(), Role::Admin);
    }

    #[tokio::test]
    async fn bootstrap_restores_a_deleted_admin() {
        let state = test_state().await;
        bootstrap_admin(&state, &admin()).await.unwrap();
        let first = state.users.get_user_by_email("root@clinic.test").await.unwrap();
        state.users.delete(first.id).await.unwrap();

        bootstrap_admin(&state, &admin()).await.unwrap();

        let user = state.users.get_user_by_email("root@clinic.test").await.unwrap();
        assert_eq!(user.id, first.id);
        assert_eq!(user.role(), Role::Admin);
        assert!(crate::auth::password::verify_password("changeme", &user.password));
        assert_eq!(state.users.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_leaves_existing_user_untouched() {
        let state = test_state().await;
        let store = TestStore::from_state(&state);
        store.user("root@clinic.test", "original", Role::User).await;

        bootstrap_admin(&state, &admin()).await.unwrap();

        let user = state.users.get_user_by_email("root@clinic.test").await.unwrap();
        assert_eq!(user.role(), Role::User);
        assert!(crate::auth::password::verify_password("original", &user.password));
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::parse_from(["vet-clinic-api", "--port", "9000"]);
        assert_eq!(cli.port, Some(9000));
        assert!(cli.command.is_none());

        let cli = Cli::parse_from([
            "vet-clinic-api",
            "create-user",
            "--email",
            "a@b.com",
            "--password",
            "secret",
            "--role",
            "admin",
        ]);
        assert!(matches!(cli.command, Some(Commands::CreateUser { ref role, .. }) if role == "admin"));
    }
}
