//! Shared state and router setup for the HTTP API.
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::session::SessionStore;
use crate::config::Config;
use crate::generation::ImageClient;

pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub client: ImageClient,
}

impl AppState {
    pub fn new(client: ImageClient, config: &Config) -> Self {
        let sessions = SessionStore::new(config.preload_placeholders, config.session_idle_ttl());
        AppState { sessions: Arc::new(sessions), client }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", get(handlers::session_summary).delete(handlers::end_session))
        .route("/sessions/:id/generate", post(handlers::generate))
        .route("/sessions/:id/images", delete(handlers::clear_images))
        .route("/sessions/:id/images/:position", get(handlers::get_image))
        .route("/sessions/:id/images/:position/print", get(handlers::print_image))
        .route("/sessions/:id/print", get(handlers::print_images))
        .route("/sessions/:id/archive", get(handlers::download_archive))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
