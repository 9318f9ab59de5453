//! Error types for the dnslink publisher
//!
//! Every failure in a run funnels into [`Error`]. The binary reports its
//! `Display` text as the single failure message of the step.

use thiserror::Error;

/// Result type alias for dnslink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dnslink publisher
#[derive(Error, Debug)]
pub enum Error {
    /// The uploader tool could not be run, exited non-zero, or returned an
    /// unexpected JSON shape
    #[error("{0}")]
    Upload(String),

    /// The uploader's stdout was not valid JSON
    #[error("{message}")]
    OutputParse {
        /// Human readable context
        message: String,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File or process I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create an upload error
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create an output parse error, keeping the decoder error as the cause
    pub fn output_parse(msg: impl Into<String>, source: serde_json::Error) -> Self {
        Self::OutputParse {
            message: msg.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the DNS provider API
    pub fn is_dns_api(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Authentication(_)
                | Self::RateLimited(_)
                | Self::NotFound(_)
                | Self::Provider { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn upload_error_is_surfaced_verbatim() {
        let err = Error::upload("Failed to upload: {}");
        assert_eq!(err.to_string(), "Failed to upload: {}");
    }

    #[test]
    fn output_parse_keeps_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = Error::output_parse("Failed to parse JSON output", cause);

        assert_eq!(err.to_string(), "Failed to parse JSON output");
        assert!(err.source().is_some());
    }

    #[test]
    fn dns_api_classification() {
        assert!(Error::provider("cloudflare", "boom").is_dns_api());
        assert!(Error::rate_limited("slow down").is_dns_api());
        assert!(!Error::upload("nope").is_dns_api());
        assert!(!Error::config("missing").is_dns_api());
    }
}
