//! Error types for the audit engine
//!
//! Only input validation and setup problems surface as errors. Per-page
//! network failures, HTTP error statuses and malformed markup are folded into
//! the crawl result instead.

use thiserror::Error;

/// Errors that can escape the audit engine
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("url is required")]
    MissingUrl,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported url scheme: {0} (only http and https can be audited)")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl AuditError {
    /// HTTP status code reported to callers of the audit endpoint.
    pub fn http_status(&self) -> u16 {
        400
    }
}

impl From<url::ParseError> for AuditError {
    fn from(err: url::ParseError) -> Self {
        AuditError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_errors_map_to_bad_request() {
        assert_eq!(AuditError::MissingUrl.http_status(), 400);
        assert_eq!(AuditError::Config("x".into()).http_status(), 400);
    }

    #[test]
    fn parse_errors_become_invalid_url() {
        let err: AuditError = url::Url::parse("http://").unwrap_err().into();
        assert!(matches!(err, AuditError::InvalidUrl(_)));
        assert!(err.to_string().starts_with("invalid url"));
    }
}
