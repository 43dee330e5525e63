use prometheus::{Encoder, Gauge, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{domain::events::Topic, shared::errors::InfrastructureError};

/// Prometheus view of the event stream, kept on its own registry so several
/// instances (tests, embedded use) never collide on global names.
#[derive(Clone)]
pub struct EventMetrics {
    registry: Registry,
    events_processed: IntCounterVec,
    decode_failures: IntCounterVec,
    total_revenue: Gauge,
}

impl EventMetrics {
    pub fn new() -> Result<Self, InfrastructureError> {
        let registry = Registry::new();

        let events_processed = IntCounterVec::new(
            Opts::new(
                "analytics_events_processed_total",
                "Total number of events processed",
            ),
            &["event_type"],
        )?;
        let decode_failures = IntCounterVec::new(
            Opts::new(
                "analytics_decode_failures_total",
                "Total number of payloads that could not be decoded",
            ),
            &["event_type"],
        )?;
        let total_revenue = Gauge::new("analytics_total_revenue", "Total revenue tracked")?;

        registry.register(Box::new(events_processed.clone()))?;
        registry.register(Box::new(decode_failures.clone()))?;
        registry.register(Box::new(total_revenue.clone()))?;

        Ok(Self {
            registry,
            events_processed,
            decode_failures,
            total_revenue,
        })
    }

    pub fn record_decoded(&self, topic: Topic) {
        self.events_processed
            .with_label_values(&[topic.label()])
            .inc();
    }

    pub fn record_decode_failure(&self, topic: Topic) {
        self.decode_failures
            .with_label_values(&[topic.label()])
            .inc();
    }

    /// Atomic add; the gauge tracks the same sum as the store's revenue.
    pub fn add_revenue(&self, amount: f64) {
        self.total_revenue.add(amount);
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Renders every registered metric in the text exposition format.
    pub fn render(&self) -> Result<String, InfrastructureError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| InfrastructureError::Metrics(e.to_string()))
    }
}
