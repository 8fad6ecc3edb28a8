//! moim-api server binary.
//!
//! Wires the durable store, channel registry, and publisher into the HTTP
//! router and serves it. Configuration comes from the environment (a
//! `.env` file is honored in development).

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moim_api::{router, AppState};
use moim_db::{Database, PgNotificationRepository};
use moim_notify::ChannelRegistry;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;
    info!(
        subsystem = "api",
        component = "startup",
        "Database connected and migrations applied"
    );

    let store: Arc<dyn moim_core::NotificationRepository> =
        Arc::new(PgNotificationRepository::new(db.pool().clone()));

    let registry = match std::env::var("SSE_TIMEOUT_SECS") {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("SSE_TIMEOUT_SECS must be an integer"))?;
            ChannelRegistry::new(Duration::from_secs(secs))
        }
        Err(_) => ChannelRegistry::with_default_timeout(),
    };

    let state = AppState::new(store, registry);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        subsystem = "api",
        component = "startup",
        addr = %bind_addr,
        "Listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
