use std::sync::Arc;

use crate::{
    application::{aggregate_store::AggregateStore, ingest_service::IngestService},
    infrastructure::metrics::EventMetrics,
};

/// Composition-root handle: the single aggregate instance plus everything the
/// consumers and HTTP handlers need to reach it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AggregateStore>,
    pub metrics: EventMetrics,
    pub ingest: Arc<IngestService>,
}

impl AppState {
    pub fn new(store: Arc<AggregateStore>, metrics: EventMetrics) -> Self {
        let ingest = Arc::new(IngestService::new(store.clone(), metrics.clone()));
        Self {
            store,
            metrics,
            ingest,
        }
    }
}

pub type SharedState = Arc<AppState>;
