//! Products API 服务入口

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::{info, warn};

use products_api::app::{AppState, build_router};
use products_api::config::AppConfig;
use products_api::repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRepository,
};
use products_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(config.effective_log_level(), !config.debug);

    let repo: Arc<dyn ProductRepository> = match config.connection_url() {
        Some(url) => {
            info!("Connecting to PostgreSQL");
            let repo =
                PostgresProductRepository::connect(url.expose_secret(), config.db_max_connections)
                    .await?;
            repo.ensure_schema().await?;
            Arc::new(repo)
        }
        None => {
            warn!("No database configured, using in-memory store (not for production)");
            Arc::new(InMemoryProductRepository::new())
        }
    };

    let state = AppState::new(repo, &config);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "Starting products API");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
