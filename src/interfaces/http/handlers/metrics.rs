use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{shared::errors::ApiError, state::SharedState};

pub async fn export_metrics(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let body = state.metrics.render().map_err(ApiError::from)?;
    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body).into_response())
}
