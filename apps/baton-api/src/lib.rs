pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod stream;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use config::Config;
use events::ingest::IngestionGateway;
use stream::fanout::Broadcaster;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub broadcaster: Arc<Broadcaster>,
    pub ingest: Arc<IngestionGateway>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let broadcaster = Arc::new(Broadcaster::new(
            config.heartbeat_interval,
            config.broadcast_status,
        ));
        let ingest = Arc::new(IngestionGateway::new(Arc::clone(&broadcaster)));
        Self {
            config: Arc::new(config),
            broadcaster,
            ingest,
        }
    }
}

/// All routes wired to `state`, with the configured request body limit.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    routes::router()
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
