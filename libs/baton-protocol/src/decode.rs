//! Fixed-width baton message decoding.
//!
//! A well-formed message is exactly ten ASCII digits:
//!
//! ```text
//! SSSS CC BB MM
//! │    │  │  └─ main battery percentage
//! │    │  └──── baton battery percentage
//! │    └─────── message code
//! └──────────── site id
//! ```

use serde::{Deserialize, Serialize};

use crate::codes::{classify, Severity};

/// Length of a well-formed message.
pub const MESSAGE_LEN: usize = 10;

/// Structured form of a well-formed baton message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    pub site_id: String,
    pub message_code: String,
    pub message_type: String,
    pub severity: Severity,
    pub baton_battery: u8,
    pub main_battery: u8,
    pub description: String,
}

/// Decode a raw message. Returns `None` for anything that is not exactly ten
/// ASCII digits; a non-matching payload is an ordinary outcome, not an error.
///
/// # Examples
/// ```
/// let decoded = baton_protocol::decode("0024049886").unwrap();
/// assert_eq!(decoded.message_type, "Fire");
/// assert!(baton_protocol::decode("abc").is_none());
/// ```
pub fn decode(raw: &str) -> Option<DecodedPayload> {
    let bytes = raw.as_bytes();
    if bytes.len() != MESSAGE_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    // All-ASCII, so byte offsets are char boundaries.
    let site_id = &raw[0..4];
    let message_code = &raw[4..6];
    let baton_battery = two_digits(&bytes[6..8]);
    let main_battery = two_digits(&bytes[8..10]);

    let (message_type, severity) = classify(message_code);
    let description = format!(
        "{message_type} from site {site_id} — Batteries: {baton_battery}% / {main_battery}%"
    );

    Some(DecodedPayload {
        site_id: site_id.to_string(),
        message_code: message_code.to_string(),
        message_type,
        severity,
        baton_battery,
        main_battery,
        description,
    })
}

fn two_digits(pair: &[u8]) -> u8 {
    (pair[0] - b'0') * 10 + (pair[1] - b'0')
}
