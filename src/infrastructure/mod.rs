pub mod kafka;
pub mod metrics;
