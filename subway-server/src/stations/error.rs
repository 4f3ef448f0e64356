//! Station feed error types.

/// Errors that can occur when fetching stations from the upstream feed.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check STATION_FEED_API_KEY")]
    Unauthorized,

    /// Feed returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// No feed is configured for this registry
    #[error("no station feed configured")]
    NoFeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StationError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: unavailable");
        assert_eq!(StationError::NoFeed.to_string(), "no station feed configured");
    }
}
