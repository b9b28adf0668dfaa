use std::str::FromStr;
use std::time::Duration;

use crate::stream::fanout::HEARTBEAT_INTERVAL;

/// Default port, matching the hosting platform's convention.
const DEFAULT_PORT: u16 = 10000;

/// Default request body limit (1 MiB).
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Baton API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Period between keep-alive frames on each live stream.
    pub heartbeat_interval: Duration,
    /// When set, every subscribe/unsubscribe pushes the current subscriber
    /// count to all live streams.
    pub broadcast_status: bool,
    /// Maximum accepted ingestion body size.
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            heartbeat_interval: HEARTBEAT_INTERVAL,
            broadcast_status: false,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parsed_var("PORT").unwrap_or(defaults.port),
            heartbeat_interval: parsed_var("HEARTBEAT_INTERVAL_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.heartbeat_interval),
            broadcast_status: std::env::var("BROADCAST_STATUS")
                .map(|v| flag(&v))
                .unwrap_or(defaults.broadcast_status),
            body_limit_bytes: parsed_var("BODY_LIMIT_BYTES").unwrap_or(defaults.body_limit_bytes),
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
