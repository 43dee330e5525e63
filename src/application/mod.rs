pub mod aggregate_store;
pub mod consumer;
pub mod decoder;
pub mod ingest_service;
