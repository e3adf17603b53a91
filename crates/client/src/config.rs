//! Environment-backed client configuration.
//!
//! Reads `MEDIAQ_*` variables (a local `.env` file is honored via
//! [`dotenvy`]). Only the service endpoint is required; polling knobs
//! fall back to [`PollConfig::default`].

use std::time::Duration;

use mediaq_core::error::CoreError;

use crate::poller::PollConfig;

/// Base HTTP URL of the media service (required).
pub const ENV_API_URL: &str = "MEDIAQ_API_URL";

/// Overall poll deadline in seconds (optional).
pub const ENV_POLL_TIMEOUT_SECS: &str = "MEDIAQ_POLL_TIMEOUT_SECS";

/// Initial poll interval in milliseconds (optional).
pub const ENV_POLL_INTERVAL_MS: &str = "MEDIAQ_POLL_INTERVAL_MS";

/// Configuration for a [`crate::client::MediaClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP URL of the media service.
    pub api_url: String,
    /// Polling schedule for job waits.
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Configuration with default polling for an explicit endpoint.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            poll: PollConfig::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Fails with [`CoreError::Configuration`] when the endpoint is
    /// missing or an override does not parse.
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var(ENV_API_URL).map_err(|_| {
            CoreError::Configuration(format!("{ENV_API_URL} must be set"))
        })?;

        let mut poll = PollConfig::default();
        if let Some(secs) = parse_var(ENV_POLL_TIMEOUT_SECS)? {
            poll.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var(ENV_POLL_INTERVAL_MS)? {
            poll.initial_interval = Duration::from_millis(ms);
        }

        Ok(Self { api_url, poll })
    }
}

/// Read an optional numeric variable, failing on unparseable values
/// rather than silently ignoring them.
fn parse_var(name: &str) -> Result<Option<u64>, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| CoreError::Configuration(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
