use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::events::Topic;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot decode {topic} payload: {reason}")]
pub struct DecodeError {
    pub topic: Topic,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("kafka error: {0}")]
    Kafka(String),
    #[error("topic `{0}` has no readable partition 0")]
    TopicUnavailable(String),
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl From<rdkafka::error::KafkaError> for InfrastructureError {
    fn from(value: rdkafka::error::KafkaError) -> Self {
        InfrastructureError::Kafka(value.to_string())
    }
}

impl From<prometheus::Error> for InfrastructureError {
    fn from(value: prometheus::Error) -> Self {
        InfrastructureError::Metrics(value.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = ErrorBody { message };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl From<InfrastructureError> for ApiError {
    fn from(err: InfrastructureError) -> Self {
        tracing::error!("Internal error: {err}");
        ApiError::Internal
    }
}
