use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use common::storage::filesystem::FilesystemFileStore;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{Level, info};

use server::config::{AppConfig, CorsConfig};
use server::identity::GoogleIdentityProvider;
use server::state::AppState;
use server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::ensure_constraints(&db).await?;
    seed::ensure_indexes(&db).await?;

    let identity = Arc::new(GoogleIdentityProvider::new(
        config.auth.google_tokeninfo_url.clone(),
        Duration::from_secs(config.auth.google_timeout_secs),
    )?);

    let files = Arc::new(
        FilesystemFileStore::new(
            PathBuf::from(&config.storage.root),
            config.storage.max_file_size,
        )
        .await?,
    );

    let cors = cors_layer(&config.server.cors)?;

    let state = AppState {
        db,
        config: config.clone(),
        identity,
        files,
    };

    let app = build_router(state).layer(cors);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allow_origins
        .iter()
        .map(|origin| Ok(origin.parse::<HeaderValue>()?))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
