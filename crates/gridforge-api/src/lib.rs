//! gridforge-api
//!
//! HTTP surface for GRIDFORGE. One router per document kind plus the
//! generation endpoints; handlers are thin: validate the name, delegate to
//! the store and core operations, shape `{message}` / `{error}` responses.
//!
//! Saves are last-write-wins. The service performs no conflict detection
//! and no retries; a failed request reports its message and leaves the
//! stored document untouched.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use gridforge_store::Store;

pub mod error;
pub mod routes;

pub use crate::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::enums::router())
        .merge(routes::class_data::router())
        .merge(routes::tables::router())
        .merge(routes::matrices::router())
        .merge(routes::states::router())
        .merge(routes::generate::router())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
