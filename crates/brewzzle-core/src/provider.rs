//! Places provider port.
//!
//! [`PlacesProvider`] is the single point of contact with the external places
//! service. The search orchestrator only talks to this trait, so the HTTP
//! client ([`GooglePlacesClient`](crate::google::GooglePlacesClient)) can be
//! swapped for a fake in tests.
//!
//! Pagination: whenever a page token is supplied the implementation must
//! issue a token-only continuation request. The token already encodes the
//! original query, and the provider ignores other filters when one is
//! present.

use async_trait::async_trait;
use thiserror::Error;

use crate::place::ProviderResponse;
use crate::types::NearbyQuery;

/// Fields requested from place details when the caller does not choose.
pub const DEFAULT_DETAILS_FIELDS: &[&str] =
    &["name", "formatted_address", "opening_hours", "rating", "website"];

/// Field mask used when only the schedule is needed.
pub const OPENING_HOURS_FIELDS: &[&str] = &["opening_hours"];

/// Errors raised by a places provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure, timeout or TLS problem.
    #[error("request to places provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status.
    #[error("places provider returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not the JSON we expected.
    #[error("could not decode places provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// `OVER_QUERY_LIMIT`.
    #[error("quota exceeded{}", fmt_message(.message))]
    QuotaExceeded {
        /// Provider `error_message`, if any.
        message: Option<String>,
    },

    /// `REQUEST_DENIED`, usually a bad or restricted API key.
    #[error("request denied{}", fmt_message(.message))]
    Denied {
        /// Provider `error_message`, if any.
        message: Option<String>,
    },

    /// `INVALID_REQUEST`, e.g. an expired page token.
    #[error("invalid request{}", fmt_message(.message))]
    InvalidRequest {
        /// Provider `error_message`, if any.
        message: Option<String>,
    },

    /// Any other non-success status.
    #[error("provider status {status}{}", fmt_message(.message))]
    Api {
        /// Provider status string.
        status: String,
        /// Provider `error_message`, if any.
        message: Option<String>,
    },
}

fn fmt_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Read-only access to an external places service.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Free-text search, or a continuation when `page_token` is set.
    async fn text_search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse>;

    /// Search around a point for cafes.
    async fn nearby_search(&self, query: &NearbyQuery) -> ProviderResult<ProviderResponse>;

    /// Search by place type, or a continuation when `page_token` is set.
    async fn type_search(
        &self,
        place_type: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse>;

    /// Fetch details for one place. `None` requests [`DEFAULT_DETAILS_FIELDS`].
    async fn place_details(
        &self,
        place_id: &str,
        fields: Option<&[String]>,
    ) -> ProviderResult<ProviderResponse>;

    /// Fetch only the opening hours of one place.
    async fn opening_hours(&self, place_id: &str) -> ProviderResult<ProviderResponse> {
        let fields: Vec<String> = OPENING_HOURS_FIELDS.iter().map(ToString::to_string).collect();
        self.place_details(place_id, Some(&fields)).await
    }
}
