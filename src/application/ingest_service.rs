use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    application::{
        aggregate_store::{AggregateStore, Applied},
        decoder::decode,
    },
    domain::{
        analytics::AnalyticsSnapshot,
        events::{AnalyticsEvent, Topic},
    },
    infrastructure::metrics::EventMetrics,
    shared::errors::DecodeError,
};

/// Entry point for every message pulled off a topic: decode, fold into the
/// store, then mirror the change into the exported metrics.
pub struct IngestService {
    store: Arc<AggregateStore>,
    metrics: EventMetrics,
}

impl IngestService {
    pub fn new(store: Arc<AggregateStore>, metrics: EventMetrics) -> Self {
        Self { store, metrics }
    }

    pub fn process(&self, topic: Topic, payload: &[u8]) -> Result<Applied, DecodeError> {
        match decode(topic, payload) {
            Ok(event) => {
                let applied = self.store.apply(Some(&event));
                self.metrics.record_decoded(topic);
                match (&event, applied) {
                    (AnalyticsEvent::User(user), Applied::UserRegistered) => {
                        info!("New user registered: {}", user.user_id);
                    }
                    (AnalyticsEvent::Order(order), Applied::OrderPlaced) => {
                        self.metrics.add_revenue(order.total);
                        info!("New order: {}, Total: ${:.2}", order.order_id, order.total);
                    }
                    _ => debug!(%topic, kind = event.kind(), "ignoring unrecognized event kind"),
                }
                Ok(applied)
            }
            Err(err) => {
                self.store.apply(None);
                self.metrics.record_decode_failure(topic);
                debug!("Dropping undecodable message: {err}");
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        self.store.snapshot()
    }
}
