//! Running counters shared by the topic consumers and the read endpoints.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::{
    analytics::AnalyticsSnapshot,
    events::{AnalyticsEvent, ORDER_PLACED, USER_REGISTERED},
};

/// What a single `apply` changed beyond the processed counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Message counted, no field update (decode failure).
    Counted,
    /// Decoded but not a recognized kind.
    Unrecognized,
    UserRegistered,
    OrderPlaced,
}

/// Every field is its own atomic; there is no lock across the aggregate.
/// Revenue is stored as `f64` bits, `last_updated` as microseconds since the
/// epoch and only ever moves forward.
pub struct AggregateStore {
    total_users: AtomicI64,
    total_orders: AtomicI64,
    total_revenue: AtomicU64,
    last_updated: AtomicI64,
    events_processed: AtomicI64,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(at: DateTime<Utc>) -> Self {
        Self {
            total_users: AtomicI64::new(0),
            total_orders: AtomicI64::new(0),
            total_revenue: AtomicU64::new(0f64.to_bits()),
            last_updated: AtomicI64::new(at.timestamp_micros()),
            events_processed: AtomicI64::new(0),
        }
    }

    /// Folds one received message into the aggregate. `None` stands for a
    /// payload that failed to decode: it is counted and nothing else changes.
    pub fn apply(&self, event: Option<&AnalyticsEvent>) -> Applied {
        self.events_processed.fetch_add(1, Ordering::AcqRel);

        let Some(event) = event else {
            return Applied::Counted;
        };

        self.touch(Utc::now());

        match event {
            AnalyticsEvent::User(user) if user.kind == USER_REGISTERED => {
                self.total_users.fetch_add(1, Ordering::AcqRel);
                Applied::UserRegistered
            }
            AnalyticsEvent::Order(order) if order.kind == ORDER_PLACED => {
                self.total_orders.fetch_add(1, Ordering::AcqRel);
                self.add_revenue(order.total);
                Applied::OrderPlaced
            }
            _ => Applied::Unrecognized,
        }
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let micros = self.last_updated.load(Ordering::Acquire);
        AnalyticsSnapshot {
            total_users: self.total_users.load(Ordering::Acquire),
            total_orders: self.total_orders.load(Ordering::Acquire),
            total_revenue: self.total_revenue(),
            last_updated: DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or_default(),
            events_processed: self.events_processed.load(Ordering::Acquire),
        }
    }

    fn touch(&self, at: DateTime<Utc>) {
        self.last_updated
            .fetch_max(at.timestamp_micros(), Ordering::AcqRel);
    }

    /// Latest revenue total, including every addition that has completed.
    pub fn total_revenue(&self) -> f64 {
        f64::from_bits(self.total_revenue.load(Ordering::Acquire))
    }

    fn add_revenue(&self, amount: f64) {
        let mut current = self.total_revenue.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(current) + amount).to_bits();
            match self.total_revenue.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AggregateStore {
    fn default() -> Self {
        Self::new()
    }
}
