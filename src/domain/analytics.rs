use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the running aggregate. Fields are read one by one,
/// so a snapshot taken while events are applied may mix adjacent states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_users: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub last_updated: DateTime<Utc>,
    pub events_processed: i64,
}
