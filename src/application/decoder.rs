use crate::{
    domain::events::{AnalyticsEvent, OrderEvent, Topic, UserEvent},
    shared::errors::DecodeError,
};

/// Decodes a raw payload into the event variant expected for `topic`.
///
/// Decoding is structural: unknown fields are ignored and missing or `null`
/// ones take their zero value. Anything that is not a JSON object of the right
/// field types is reported as a [`DecodeError`].
pub fn decode(topic: Topic, payload: &[u8]) -> Result<AnalyticsEvent, DecodeError> {
    let decoded = match topic {
        Topic::User => serde_json::from_slice::<UserEvent>(payload).map(AnalyticsEvent::User),
        Topic::Order => serde_json::from_slice::<OrderEvent>(payload).map(AnalyticsEvent::Order),
    };

    decoded.map_err(|err| DecodeError {
        topic,
        reason: err.to_string(),
    })
}
