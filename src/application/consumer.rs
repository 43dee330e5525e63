use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    application::ingest_service::IngestService, domain::events::Topic,
    shared::errors::InfrastructureError,
};

/// Lifecycle of one topic consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Starting,
    Running,
    Stopped,
    Errored,
}

/// Ordered feed of raw payloads from a single partition.
///
/// `None` means the source was closed and no more messages will arrive.
/// `Some(Err(_))` is a transport error; the source stays usable afterwards.
#[async_trait]
pub trait EventSource: Send {
    async fn next_message(&mut self) -> Option<Result<Vec<u8>, InfrastructureError>>;
}

#[async_trait]
impl EventSource for mpsc::Receiver<Result<Vec<u8>, InfrastructureError>> {
    async fn next_message(&mut self) -> Option<Result<Vec<u8>, InfrastructureError>> {
        self.recv().await
    }
}

pub struct TopicConsumer<S> {
    topic: Topic,
    source: S,
    ingest: Arc<IngestService>,
    state: ConsumerState,
}

impl<S: EventSource> TopicConsumer<S> {
    pub fn new(topic: Topic, source: S, ingest: Arc<IngestService>) -> Self {
        Self {
            topic,
            source,
            ingest,
            state: ConsumerState::Starting,
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    /// Applies messages in arrival order until the source closes. Transport
    /// errors are logged and the loop keeps going.
    pub async fn run(mut self) -> ConsumerState {
        self.state = ConsumerState::Running;
        info!("Started consuming topic: {}", self.topic);

        let mut undecodable = 0u64;
        while let Some(next) = self.source.next_message().await {
            match next {
                Ok(payload) => match self.ingest.process(self.topic, &payload) {
                    Ok(_) => {}
                    // Already counted in the aggregate and logged by the ingest path.
                    Err(_) => undecodable += 1,
                },
                Err(err) => error!("Error consuming from topic {}: {err}", self.topic),
            }
        }

        self.state = ConsumerState::Stopped;
        info!(undecodable, "Stopped consuming topic: {}", self.topic);
        self.state
    }
}

/// Opens a source for `topic` and consumes it until it closes. A source that
/// cannot be opened leaves the topic `Errored`; nothing is retried.
pub async fn consume<S, F>(topic: Topic, open: F, ingest: Arc<IngestService>) -> ConsumerState
where
    S: EventSource,
    F: Future<Output = Result<S, InfrastructureError>>,
{
    match open.await {
        Ok(source) => TopicConsumer::new(topic, source, ingest).run().await,
        Err(err) => {
            error!("Failed to consume topic {topic}: {err}");
            ConsumerState::Errored
        }
    }
}
