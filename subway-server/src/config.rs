//! Server configuration.
//!
//! Read from environment variables at startup:
//!
//! | Variable | Default |
//! |---|---|
//! | `SUBWAY_BIND_ADDR` | `127.0.0.1:8080` |
//! | `STATION_FEED_URL` | unset (stations are registered locally) |
//! | `STATION_FEED_API_KEY` | unset |
//! | `STATION_REFRESH_SECS` | `86400` |

use std::net::SocketAddr;
use std::time::Duration;

use crate::stations::StationClientConfig;

/// Default address to listen on.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

/// How often to refresh stations from the feed (24 hours).
const DEFAULT_STATION_REFRESH: Duration = Duration::from_secs(24 * 60 * 60);

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the subway server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,

    /// Upstream station feed, if any.
    pub station_feed: Option<StationClientConfig>,

    /// Interval between station feed refreshes.
    pub station_refresh: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SUBWAY_BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "SUBWAY_BIND_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(url) = lookup("STATION_FEED_URL").filter(|u| !u.trim().is_empty()) {
            let mut feed = StationClientConfig::new(url);
            if let Some(key) = lookup("STATION_FEED_API_KEY").filter(|k| !k.is_empty()) {
                feed = feed.with_api_key(key);
            }
            config.station_feed = Some(feed);
        }

        if let Some(value) = lookup("STATION_REFRESH_SECS") {
            let secs: u64 = value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: "STATION_REFRESH_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "STATION_REFRESH_SECS",
                    value,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.station_refresh = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            station_feed: None,
            station_refresh: DEFAULT_STATION_REFRESH,
        }
    }
}
