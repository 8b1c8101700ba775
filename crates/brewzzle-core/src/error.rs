//! Unified error types for the brewzzle core library.
//!
//! [`BrewzzleError`] covers every failure the search pipeline can surface.
//! Module-specific errors ([`HoursError`](crate::hours::HoursError),
//! [`ProviderError`](crate::provider::ProviderError),
//! [`ConfigError`](crate::config::ConfigError)) convert into it.
//!
//! The variants fall into four categories that map to distinct HTTP status
//! codes:
//!
//! - **Invalid request**: a required parameter is missing or malformed (400)
//! - **Not found**: a place lookup returned nothing (404)
//! - **Provider error**: the upstream places service failed (502/503)
//! - **Malformed upstream data**: the provider sent data we cannot interpret (502)
//!
//! # Example
//!
//! ```rust
//! use brewzzle_core::error::{BrewzzleError, Result};
//!
//! fn require_query(query: &str) -> Result<&str> {
//!     if query.trim().is_empty() {
//!         return Err(BrewzzleError::MissingParameter("query".into()));
//!     }
//!     Ok(query.trim())
//! }
//!
//! assert_eq!(require_query("").unwrap_err().http_status_code(), 400);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all brewzzle operations.
#[derive(Debug, Error)]
pub enum BrewzzleError {
    // =========================================================================
    // INVALID REQUEST
    // =========================================================================
    /// A required query parameter was absent or blank.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// The `location` parameter was not `lat,lng`.
    #[error("Invalid location format '{0}'. Use 'lat,lng'")]
    InvalidLocation(String),

    // =========================================================================
    // NOT FOUND
    // =========================================================================
    /// Place details returned no result for this id.
    #[error("No place found for place_id '{0}'")]
    PlaceNotFound(String),

    // =========================================================================
    // PROVIDER ERRORS
    // =========================================================================
    /// The places provider could not be reached or answered with a failure.
    #[error("Places provider error: {0}")]
    ProviderUnavailable(String),

    /// The provider quota has been exhausted.
    #[error("Places provider quota exceeded: {0}")]
    ProviderQuotaExceeded(String),

    /// The provider refused the request (bad key, invalid request).
    #[error("Places provider rejected the request: {0}")]
    ProviderRejected(String),

    // =========================================================================
    // MALFORMED UPSTREAM DATA
    // =========================================================================
    /// Opening hours from the provider could not be parsed.
    #[error("Malformed opening hours from provider: {0}")]
    MalformedOpeningHours(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration could not be read or deserialized.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),
}

/// A specialized [`Result`] type for brewzzle operations.
pub type Result<T> = std::result::Result<T, BrewzzleError>;

/// Short alias.
pub type Error = BrewzzleError;

impl BrewzzleError {
    /// Returns `true` for client mistakes (missing or malformed parameters).
    #[inline]
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::InvalidLocation(_))
    }

    /// Returns `true` if the upstream places provider failed.
    #[inline]
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::ProviderQuotaExceeded(_) | Self::ProviderRejected(_)
        )
    }

    /// Returns `true` if the provider sent data we could not interpret.
    #[inline]
    #[must_use]
    pub const fn is_upstream_data_error(&self) -> bool {
        matches!(self, Self::MalformedOpeningHours(_))
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_) | Self::ConfigParseError(_) | Self::ConfigValidationError(_)
        )
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidLocation(_) => 400,

            Self::PlaceNotFound(_) => 404,

            // 502 Bad Gateway - the upstream failed or sent garbage
            Self::ProviderUnavailable(_)
            | Self::ProviderRejected(_)
            | Self::MalformedOpeningHours(_) => 502,

            Self::ProviderQuotaExceeded(_) => 503,

            Self::ConfigNotFound(_) | Self::ConfigParseError(_) | Self::ConfigValidationError(_) => {
                500
            }
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidLocation(_) => "INVALID_LOCATION",
            Self::PlaceNotFound(_) => "PLACE_NOT_FOUND",
            Self::ProviderUnavailable(_) => "PROVIDER_ERROR",
            Self::ProviderQuotaExceeded(_) => "PROVIDER_QUOTA_EXCEEDED",
            Self::ProviderRejected(_) => "PROVIDER_REJECTED",
            Self::MalformedOpeningHours(_) => "MALFORMED_UPSTREAM_DATA",
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM MODULE-SPECIFIC ERRORS
// =============================================================================

impl From<crate::hours::HoursError> for BrewzzleError {
    fn from(err: crate::hours::HoursError) -> Self {
        Self::MalformedOpeningHours(err.to_string())
    }
}

impl From<crate::provider::ProviderError> for BrewzzleError {
    fn from(err: crate::provider::ProviderError) -> Self {
        use crate::provider::ProviderError;
        match err {
            ProviderError::QuotaExceeded { .. } => Self::ProviderQuotaExceeded(err.to_string()),
            ProviderError::Denied { .. } | ProviderError::InvalidRequest { .. } => {
                Self::ProviderRejected(err.to_string())
            }
            ProviderError::Transport(_)
            | ProviderError::HttpStatus { .. }
            | ProviderError::Decode(_)
            | ProviderError::Api { .. } => Self::ProviderUnavailable(err.to_string()),
        }
    }
}

impl From<crate::config::ConfigError> for BrewzzleError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::NotFound(path) => Self::ConfigNotFound(path),
            ConfigError::Load(e) => Self::ConfigParseError(e.to_string()),
            ConfigError::ValidationError { field, message } => {
                Self::ConfigValidationError(format!("{field}: {message}"))
            }
            ConfigError::MultipleValidationErrors(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                Self::ConfigValidationError(messages.join("; "))
            }
        }
    }
}
