mod board;
mod config;
mod errors;
mod models;
mod persistence;
mod routes;
mod source;
mod state;
mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::{bootstrap, JobBoard};
use crate::config::Config;
use crate::persistence::{KvStore, MemoryStore, Persistence, RedisStore};
use crate::routes::build_router;
use crate::source::{HttpJobSource, JobSource};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobHub v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn KvStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            warn!("REDIS_URL not set; board data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let source: Arc<dyn JobSource> = Arc::new(HttpJobSource::new(config.jobs_api_url.clone()));
    info!("Job source: {}", config.jobs_api_url);

    let board = JobBoard::new(Persistence::new(store)).into_shared();
    let state = AppState::new(board.clone()).await;

    // Stored state is in place before the first request; a remote fetch, if
    // any, lands in the background while the page shows an empty list.
    if bootstrap(board, source).await.is_some() {
        info!("No stored jobs; fetching from remote source in background");
    }

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
