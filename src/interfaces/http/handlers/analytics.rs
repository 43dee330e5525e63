use axum::{Json, extract::State};

use crate::{domain::analytics::AnalyticsSnapshot, state::SharedState};

pub async fn get_analytics(State(state): State<SharedState>) -> Json<AnalyticsSnapshot> {
    Json(state.store.snapshot())
}
