use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

pub const USER_REGISTERED: &str = "user-registered";
pub const ORDER_PLACED: &str = "order-placed";

/// The two event streams the service consumes. The broker-side topic name is
/// configurable; the kind decides how payloads are decoded and labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    User,
    Order,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::User, Topic::Order];

    /// Metric label value.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::User => "user",
            Topic::Order => "order",
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-events", self.label())
    }
}

/// Treats an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Payload fields are optional on the wire; missing or null ones decode to
// their zero value. Capitalized keys are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEvent {
    #[serde(rename = "type", alias = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(rename = "userId", alias = "UserId", deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(alias = "Email", deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(alias = "Timestamp", deserialize_with = "null_as_default")]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderEvent {
    #[serde(rename = "type", alias = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(rename = "orderId", alias = "OrderId", deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(rename = "userId", alias = "UserId", deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(alias = "Total", deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(alias = "Timestamp", deserialize_with = "null_as_default")]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    User(UserEvent),
    Order(OrderEvent),
}

impl AnalyticsEvent {
    pub fn topic(&self) -> Topic {
        match self {
            AnalyticsEvent::User(_) => Topic::User,
            AnalyticsEvent::Order(_) => Topic::Order,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            AnalyticsEvent::User(event) => &event.kind,
            AnalyticsEvent::Order(event) => &event.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_display_matches_default_topic_names() {
        assert_eq!(Topic::User.to_string(), "user-events");
        assert_eq!(Topic::Order.to_string(), "order-events");
    }

    #[test]
    fn order_event_uses_wire_field_names() {
        let event: OrderEvent = serde_json::from_str(
            r#"{"type":"order-placed","orderId":"o1","userId":"u1","total":12.5}"#,
        )
        .unwrap();

        assert_eq!(event.kind, ORDER_PLACED);
        assert_eq!(event.order_id, "o1");
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.total, 12.5);
        assert!(event.timestamp.is_empty());
    }

    #[test]
    fn null_fields_decode_to_zero_values() {
        let event: OrderEvent = serde_json::from_str(
            r#"{"type":"order-placed","orderId":"o1","userId":null,"total":null,"timestamp":null}"#,
        )
        .unwrap();

        assert_eq!(event.kind, ORDER_PLACED);
        assert!(event.user_id.is_empty());
        assert_eq!(event.total, 0.0);
    }

    #[test]
    fn capitalized_keys_are_accepted() {
        let event: OrderEvent =
            serde_json::from_str(r#"{"Type":"order-placed","OrderId":"o1","Total":5.0}"#).unwrap();

        assert_eq!(event.kind, ORDER_PLACED);
        assert_eq!(event.order_id, "o1");
        assert_eq!(event.total, 5.0);
    }
}
