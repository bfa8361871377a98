use thiserror::Error;

use crate::issues::FieldError;

/// Error type shared across chartguard crates.
///
/// Every variant is recoverable: callers display the message and let the
/// user retry with corrected input.
#[derive(Debug, Error)]
pub enum Error {
    /// The argument has the wrong shape (non-text value, malformed color).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A payload failed schema validation.
    #[error("schema violation: {} field error(s)", .0.len())]
    SchemaViolation(Vec<FieldError>),
    /// The value could not be parsed as an absolute URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The URL scheme is not permitted by the active policy.
    #[error("scheme not allowed: {0}")]
    SchemeNotAllowed(String),
    /// The URL host is not on the allow-list.
    #[error("domain not allowed: {0}")]
    DomainNotAllowed(String),
    /// Nothing usable remained after sanitizing a file name.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}

impl Error {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::SchemaViolation(_) => "schema_violation",
            Error::InvalidUrl(_) => "invalid_url",
            Error::SchemeNotAllowed(_) => "scheme_not_allowed",
            Error::DomainNotAllowed(_) => "domain_not_allowed",
            Error::InvalidFileName(_) => "invalid_file_name",
        }
    }

    /// Field errors carried by a schema violation, empty for other kinds.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::SchemaViolation(errors) => errors,
            _ => &[],
        }
    }
}

/// Convenience alias for results returned by chartguard crates.
pub type Result<T> = std::result::Result<T, Error>;
