use std::sync::Arc;

use async_trait::async_trait;
use rdkafka::{
    ClientConfig, Offset, TopicPartitionList,
    consumer::{BaseConsumer, Consumer, StreamConsumer},
    message::Message,
};
use tokio::task::JoinHandle;
use tracing::info;

use crate::{
    application::consumer::{ConsumerState, EventSource, consume},
    config::KafkaConfig,
    domain::events::Topic,
    shared::errors::InfrastructureError,
    state::SharedState,
};

const PARTITION: i32 = 0;

fn client_config(cfg: &KafkaConfig) -> ClientConfig {
    let mut client = ClientConfig::new();
    client
        .set("group.id", &cfg.group_id)
        .set("bootstrap.servers", &cfg.brokers)
        .set("enable.partition.eof", "false")
        .set("enable.auto.commit", "false")
        .set("session.timeout.ms", "6000");
    client
}

// Metadata requests block for up to the configured timeout, so they run on
// the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, InfrastructureError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InfrastructureError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| InfrastructureError::Kafka(e.to_string()))?
}

/// Fails when no broker answers a metadata request within the configured
/// timeout.
pub async fn probe_brokers(cfg: &KafkaConfig) -> Result<(), InfrastructureError> {
    let client = client_config(cfg);
    let timeout = cfg.metadata_timeout();

    blocking(move || {
        let consumer: BaseConsumer = client.create()?;
        let metadata = consumer.fetch_metadata(None, timeout)?;
        info!(
            "Connected to Kafka cluster ({} broker(s), {} topic(s))",
            metadata.brokers().len(),
            metadata.topics().len()
        );
        Ok(())
    })
    .await
}

/// Partition 0 of one topic, read from the newest offset onwards.
pub struct PartitionSource {
    consumer: StreamConsumer,
}

impl PartitionSource {
    pub async fn open(cfg: Arc<KafkaConfig>, topic: String) -> Result<Self, InfrastructureError> {
        blocking(move || {
            let consumer: StreamConsumer = client_config(&cfg).create()?;

            let metadata =
                consumer.fetch_metadata(Some(topic.as_str()), cfg.metadata_timeout())?;
            let readable = metadata.topics().iter().any(|t| {
                t.name() == topic
                    && t.error().is_none()
                    && t.partitions().iter().any(|p| p.id() == PARTITION)
            });
            if !readable {
                return Err(InfrastructureError::TopicUnavailable(topic));
            }

            let mut assignment = TopicPartitionList::new();
            assignment.add_partition_offset(&topic, PARTITION, Offset::End)?;
            consumer.assign(&assignment)?;

            Ok(Self { consumer })
        })
        .await
    }
}

#[async_trait]
impl EventSource for PartitionSource {
    async fn next_message(&mut self) -> Option<Result<Vec<u8>, InfrastructureError>> {
        let next = match self.consumer.recv().await {
            Ok(message) => Ok(message.payload().unwrap_or_default().to_vec()),
            Err(err) => Err(err.into()),
        };
        Some(next)
    }
}

/// Spawns one consumer task per topic. Each task opens its own partition; a
/// topic that cannot be opened ends as `Errored` while the others keep running.
pub fn spawn_consumers(
    cfg: Arc<KafkaConfig>,
    state: SharedState,
) -> Vec<JoinHandle<ConsumerState>> {
    Topic::ALL
        .into_iter()
        .map(|topic| {
            let open = PartitionSource::open(cfg.clone(), cfg.topic_name(topic).to_string());
            tokio::spawn(consume(topic, open, state.ingest.clone()))
        })
        .collect()
}
