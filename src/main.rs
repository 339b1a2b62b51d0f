use std::sync::Arc;

use castor_api::{
    create_router,
    db::{create_pool, PgStore, Repositories},
    services::providers::YouTubeProvider,
    AppState, Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("castor_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let repositories = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections).await?;
            Repositories::postgres(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage; data is lost on exit");
            Repositories::in_memory()
        }
    };

    let provider = Arc::new(YouTubeProvider::new(
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
    ));

    let state = Arc::new(AppState::new(
        repositories,
        provider,
        config.default_region.clone(),
    ));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
