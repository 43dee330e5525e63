use std::time::Duration;

use config::{ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::domain::events::Topic;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub kafka: KafkaConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let builder = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{env}"))
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("kafka.brokers", std::env::var("KAFKA_BROKERS").ok())?;

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Compiled-in values used when no file or environment overrides them.
    pub fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("kafka.brokers", "localhost:9092")?
            .set_default("kafka.group_id", "analytics-service")?
            .set_default("kafka.user_topic", Topic::User.to_string())?
            .set_default("kafka.order_topic", Topic::Order.to_string())?
            .set_default(
                "kafka.metadata_timeout_ms",
                KafkaConfig::default_metadata_timeout_ms(),
            )?)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KafkaConfig {
    /// Comma-separated `host:port` list.
    pub brokers: String,
    pub group_id: String,
    pub user_topic: String,
    pub order_topic: String,
    #[serde(default = "KafkaConfig::default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,
}

impl KafkaConfig {
    fn default_metadata_timeout_ms() -> u64 {
        5000
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }

    pub fn topic_name(&self, topic: Topic) -> &str {
        match topic {
            Topic::User => &self.user_topic,
            Topic::Order => &self.order_topic,
        }
    }
}
