//! Google Places web service client.
//!
//! Talks to the legacy JSON endpoints (`textsearch`, `nearbysearch`,
//! `details`). One [`GooglePlacesClient`] is built at startup and shared by
//! every request; it holds no per-request state.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{BrewzzleError, Result};
use crate::place::ProviderResponse;
use crate::provider::{PlacesProvider, ProviderError, ProviderResult, DEFAULT_DETAILS_FIELDS};
use crate::types::{NearbyQuery, DEFAULT_PLACE_TYPE};

/// Provider endpoints used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    TextSearch,
    NearbySearch,
    Details,
}

impl Endpoint {
    const fn path(self) -> &'static str {
        match self {
            Self::TextSearch => "textsearch/json",
            Self::NearbySearch => "nearbysearch/json",
            Self::Details => "details/json",
        }
    }
}

type Params = Vec<(&'static str, String)>;

/// Token-only continuation parameters.
fn continuation(token: &str) -> Params {
    vec![("pagetoken", token.to_string())]
}

/// HTTP client for the Google Places API.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GooglePlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePlacesClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GooglePlacesClient {
    /// Build a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("brewzzle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BrewzzleError::ConfigValidationError(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get(&self, endpoint: Endpoint, params: Params) -> ProviderResult<ProviderResponse> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let is_continuation = params.iter().any(|(k, _)| *k == "pagetoken");

        debug!(
            endpoint = endpoint.path(),
            continuation = is_continuation,
            "Calling places provider"
        );

        // reqwest errors embed the URL, which carries the API key.
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(&params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = endpoint.path(), status = status.as_u16(), "Places provider HTTP failure");
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(reqwest::Error::without_url)?;
        let body: ProviderResponse = serde_json::from_slice(&bytes)?;

        check_status(endpoint, body)
    }
}

/// Map the provider `status` field onto success or a [`ProviderError`].
fn check_status(endpoint: Endpoint, body: ProviderResponse) -> ProviderResult<ProviderResponse> {
    let status = body.status.clone();
    match status.as_deref() {
        None | Some("OK" | "ZERO_RESULTS") => Ok(body),
        Some("NOT_FOUND") if endpoint == Endpoint::Details => Ok(ProviderResponse {
            result: None,
            ..body
        }),
        Some("OVER_QUERY_LIMIT") => Err(ProviderError::QuotaExceeded {
            message: body.error_message,
        }),
        Some("REQUEST_DENIED") => Err(ProviderError::Denied {
            message: body.error_message,
        }),
        Some("INVALID_REQUEST") => Err(ProviderError::InvalidRequest {
            message: body.error_message,
        }),
        Some(other) => Err(ProviderError::Api {
            status: other.to_string(),
            message: body.error_message,
        }),
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn text_search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        let params = match page_token {
            Some(token) => continuation(token),
            None => vec![("query", query.to_string())],
        };
        self.get(Endpoint::TextSearch, params).await
    }

    async fn nearby_search(&self, query: &NearbyQuery) -> ProviderResult<ProviderResponse> {
        if let Some(token) = &query.page_token {
            return self.get(Endpoint::NearbySearch, continuation(token)).await;
        }

        let mut params = vec![
            ("location", query.location.to_string()),
            ("radius", query.radius.to_string()),
            ("type", DEFAULT_PLACE_TYPE.to_string()),
        ];
        if query.open_now_only {
            params.push(("opennow", "true".to_string()));
        }
        self.get(Endpoint::NearbySearch, params).await
    }

    async fn type_search(
        &self,
        place_type: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        // Type tokens were issued by the text search endpoint, so they are
        // redeemed there too.
        let params = match page_token {
            Some(token) => continuation(token),
            None => vec![
                ("query", place_type.to_string()),
                ("type", place_type.to_string()),
            ],
        };
        self.get(Endpoint::TextSearch, params).await
    }

    async fn place_details(
        &self,
        place_id: &str,
        fields: Option<&[String]>,
    ) -> ProviderResult<ProviderResponse> {
        let fields = match fields {
            Some(fields) if !fields.is_empty() => fields.join(","),
            _ => DEFAULT_DETAILS_FIELDS.join(","),
        };
        let params = vec![("place_id", place_id.to_string()), ("fields", fields)];
        self.get(Endpoint::Details, params).await
    }
}
