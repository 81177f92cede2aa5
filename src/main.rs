use std::net::SocketAddr;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use reqgate::auth::password;
use reqgate::config::Config;
use reqgate::db;
use reqgate::models::Role;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting reqgate");

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations applied");

    bootstrap_admin(&pool, &config).await?;

    let addr = SocketAddr::new(config.host, config.port);
    let app = reqgate::build_app(pool, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the configured admin account when it doesn't exist yet, so a fresh
/// deployment has someone who can register the real users.
async fn bootstrap_admin(pool: &SqlitePool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(());
    };

    if db::users::find_by_external_id(pool, &admin.external_id)
        .await?
        .is_none()
    {
        let hash = password::hash(&admin.password)?;
        db::users::create(
            pool,
            &admin.external_id,
            Some(&admin.name),
            &hash,
            Role::Admin,
            Some("system"),
        )
        .await?;
        tracing::info!("Bootstrap admin '{}' created", admin.external_id);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
