//! Message code classification table.

use serde::{Deserialize, Serialize};

/// Severity attached to a decoded baton message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
    Success,
    /// Not produced by the code table; reserved for consumers that need a
    /// distinct value for unclassified codes.
    Unspecified,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Success => "success",
            Severity::Unspecified => "unspecified",
        }
    }
}

/// Human label and severity for a known message code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageKind {
    pub label: &'static str,
    pub severity: Severity,
}

/// Severity assigned to codes missing from [`CODE_TABLE`].
pub const UNKNOWN_SEVERITY: Severity = Severity::Info;

/// Known two-character message codes.
pub const CODE_TABLE: &[(&str, MessageKind)] = &[
    ("01", MessageKind { label: "Panic", severity: Severity::Critical }),
    ("02", MessageKind { label: "Patrol Fail", severity: Severity::Warning }),
    ("03", MessageKind { label: "Patrol Start", severity: Severity::Info }),
    ("04", MessageKind { label: "Fire", severity: Severity::Critical }),
    ("05", MessageKind { label: "Medical", severity: Severity::Warning }),
    ("06", MessageKind { label: "Patrol Complete", severity: Severity::Success }),
];

/// Look up a code in the table.
pub fn lookup(code: &str) -> Option<MessageKind> {
    CODE_TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, kind)| *kind)
}

/// Resolve a code to its `(messageType, severity)` pair, falling back to
/// `Unknown (<code>)` for codes outside the table.
pub fn classify(code: &str) -> (String, Severity) {
    match lookup(code) {
        Some(kind) => (kind.label.to_string(), kind.severity),
        None => (format!("Unknown ({code})"), UNKNOWN_SEVERITY),
    }
}
