//! Error types for the bankview library.

/// All errors that can occur when using bankview.
#[derive(Debug, thiserror::Error)]
pub enum BankViewError {
    /// HTTP transport failed.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the spreadsheet export failed.
    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    /// Filesystem or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No access token was provided to the client builder.
    #[error("an access token is required")]
    MissingToken,

    /// No API base URL was provided to the client builder.
    #[error("an API base URL is required")]
    MissingBaseUrl,

    /// A time zone name could not be resolved.
    #[error("unknown time zone: {0}")]
    InvalidTimeZone(String),

    /// A date or timestamp could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A history filter value is not one of the supported selectors.
    #[error("invalid transaction filter: {0:?}")]
    InvalidFilter(String),

    /// An export was requested for an empty transaction list.
    #[error("no transactions available to export")]
    NothingToExport,

    /// A transaction source failed for a reason outside HTTP.
    #[error("transaction source error: {0}")]
    Source(Box<dyn core::error::Error + Send + Sync>),
}

impl BankViewError {
    /// Returns `true` if this error means the transaction list could not be
    /// fetched (network, authentication or server failure).
    #[inline]
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        match *self {
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) => true,
            Self::Api { .. } | Self::Source(_) | Self::Serialization(_) => true,
            Self::Export(_)
            | Self::Io(_)
            | Self::MissingToken
            | Self::MissingBaseUrl
            | Self::InvalidTimeZone(_)
            | Self::InvalidDate(_)
            | Self::InvalidFilter(_)
            | Self::NothingToExport => false,
        }
    }
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, BankViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = BankViewError::from(serde_err);
        assert!(matches!(err, BankViewError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn error_api_display() {
        let err = BankViewError::Api {
            status: 401,
            message: "Full authentication is required to access this resource".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Full authentication"));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn error_source_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
        let err = BankViewError::Source(Box::new(inner));
        assert!(err.to_string().contains("upstream timed out"));
    }

    #[test]
    fn error_nothing_to_export_display() {
        let err = BankViewError::NothingToExport;
        assert!(err.to_string().contains("no transactions"));
        assert!(!err.is_fetch_failure());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BankViewError>();
    }
}
