pub mod analytics;
pub mod events;
