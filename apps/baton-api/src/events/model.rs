use baton_protocol::DecodedPayload;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::source::Source;

/// An accepted ingestion, decoded or not.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// The trimmed message as received.
    pub raw_text: String,
    pub timestamp: DateTime<Utc>,
    /// Present only when the message matched the ten-digit protocol.
    #[schema(value_type = Option<Object>)]
    pub decoded: Option<DecodedPayload>,
    pub is_valid: bool,
    pub source: Source,
}

impl Event {
    pub fn new(
        raw_text: impl Into<String>,
        decoded: Option<DecodedPayload>,
        source: Source,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            timestamp,
            is_valid: decoded.is_some(),
            decoded,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_wire_fields() {
        let decoded = baton_protocol::decode("0024049886");
        let event = Event::new("0024049886", decoded, Source::Direct, Utc::now());
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["rawText"], "0024049886");
        assert_eq!(value["isValid"], true);
        assert_eq!(value["source"], "direct");
        assert_eq!(value["decoded"]["messageType"], "Fire");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn unparsed_event_has_null_decoded() {
        let event = Event::new("hello", None, Source::Legacy, Utc::now());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["isValid"], false);
        assert!(value["decoded"].is_null());
    }
}
