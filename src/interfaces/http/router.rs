use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

use super::handlers::{analytics, health, metrics};

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route("/analytics", get(analytics::get_analytics))
        .route("/metrics", get(metrics::export_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
