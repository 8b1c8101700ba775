//! Search orchestration.
//!
//! [`SearchService`] turns raw query-string values into provider calls and
//! shapes the results. It is read-only and holds no per-request state; one
//! instance is built at startup and shared across requests.
//!
//! The open-status search is the only multi-step operation: the `before7` and
//! `after8` filters need the full weekly schedule, which list endpoints do not
//! return, so every candidate on the page gets its own details lookup. Those
//! lookups run concurrently (bounded) and the page order is kept.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::error::{BrewzzleError, Result};
use crate::hours::{closes_after, opens_before};
use crate::place::{Place, ProviderResponse};
use crate::provider::PlacesProvider;
use crate::types::{
    LatLng, NearbyPlace, NearbyQuery, NearbySearchResponse, OpenFilter, OpenSearchResponse,
    PlaceSummary, TypeSearchResponse, DEFAULT_PLACE_TYPE, DEFAULT_RADIUS_METERS,
};

/// Place search orchestrator.
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn PlacesProvider>,
    details_concurrency: usize,
}

impl SearchService {
    /// Create a new service over `provider`.
    ///
    /// `details_concurrency` bounds the in-flight details calls made by the
    /// hours filters; values below one are treated as one.
    #[must_use]
    pub fn new(provider: Arc<dyn PlacesProvider>, details_concurrency: usize) -> Self {
        Self {
            provider,
            details_concurrency: details_concurrency.max(1),
        }
    }

    /// Free-text search, returned exactly as the provider sent it.
    ///
    /// A non-empty `page_token` wins over `query`: the token already encodes
    /// the original search, so `query` is ignored and may be absent.
    ///
    /// # Errors
    ///
    /// [`BrewzzleError::MissingParameter`] when neither a token nor a
    /// non-blank query is given; provider failures otherwise.
    pub async fn search(
        &self,
        query: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<ProviderResponse> {
        if let Some(token) = page_token_of(page_token) {
            debug!("Continuing text search from page token");
            return Ok(self.provider.text_search("", Some(token)).await?);
        }

        let query = required(query, "query")?;
        let response = self.provider.text_search(query, None).await?;
        info!(query, results = response.results.len(), "Text search");
        Ok(response)
    }

    /// Search by place type and project the results.
    ///
    /// # Errors
    ///
    /// [`BrewzzleError::MissingParameter`] when `place_type` is blank;
    /// provider failures otherwise.
    pub async fn search_by_type(
        &self,
        place_type: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<TypeSearchResponse> {
        let place_type = required(place_type, "type")?.to_lowercase();

        let response = self
            .provider
            .type_search(&place_type, page_token_of(page_token))
            .await?;

        info!(place_type, results = response.results.len(), "Type search");

        Ok(TypeSearchResponse {
            results: response.results.iter().map(PlaceSummary::from_place).collect(),
            place_type,
            next_page_token: response.next_page_token,
        })
    }

    /// Search by place type and keep only places passing `filter`.
    ///
    /// `place_type` defaults to `cafe`. Unknown filter values pass every
    /// place through.
    ///
    /// # Errors
    ///
    /// Provider failures, including any details lookup, and malformed
    /// opening hours fail the whole request.
    pub async fn search_open(
        &self,
        place_type: Option<&str>,
        page_token: Option<&str>,
        filter: Option<&str>,
    ) -> Result<OpenSearchResponse> {
        let place_type = place_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| DEFAULT_PLACE_TYPE.to_string(), str::to_lowercase);

        let filter_value = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());
        let open_filter = OpenFilter::parse(filter_value.as_deref().unwrap_or_default());

        let response = self
            .provider
            .type_search(&place_type, page_token_of(page_token))
            .await?;

        let keep = self.apply_filter(&response.results, open_filter).await?;

        let results: Vec<PlaceSummary> = response
            .results
            .iter()
            .zip(keep)
            .filter_map(|(place, keep)| keep.then(|| PlaceSummary::from_place_with_vicinity(place)))
            .collect();

        info!(
            place_type,
            filter = ?open_filter,
            details = open_filter.needs_details(),
            candidates = response.results.len(),
            results = results.len(),
            "Open-status search"
        );

        Ok(OpenSearchResponse {
            place_type,
            filter: filter_value,
            next_page_token: response.next_page_token,
            results,
        })
    }

    /// Look up one place by id.
    ///
    /// `fields` is a comma-separated list; blank entries are dropped and an
    /// empty list falls back to the provider defaults.
    ///
    /// # Errors
    ///
    /// [`BrewzzleError::MissingParameter`] for a blank id and
    /// [`BrewzzleError::PlaceNotFound`] when the provider has no result.
    pub async fn place_details(
        &self,
        place_id: Option<&str>,
        fields: Option<&str>,
    ) -> Result<Place> {
        let place_id = required(place_id, "place_id")?;
        let fields = parse_fields(fields);

        let response = self
            .provider
            .place_details(place_id, fields.as_deref())
            .await?;

        match response.result {
            Some(place) if !place.is_empty() => Ok(place),
            _ => {
                debug!(place_id, "Place details returned no result");
                Err(BrewzzleError::PlaceNotFound(place_id.to_string()))
            }
        }
    }

    /// Search for cafes around a point.
    ///
    /// `radius` defaults to 5000 meters, also when it is not a valid integer.
    /// `open_now` is only switched on by the literal `true`; anything else
    /// leaves it unset rather than `false`.
    ///
    /// # Errors
    ///
    /// [`BrewzzleError::MissingParameter`] or
    /// [`BrewzzleError::InvalidLocation`] for a bad `location`; provider
    /// failures otherwise.
    pub async fn search_nearby(
        &self,
        location: Option<&str>,
        radius: Option<&str>,
        open_now: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<NearbySearchResponse> {
        let location: LatLng = required(location, "location")?.parse()?;
        let radius = parse_radius(radius);
        let open_now = parse_open_now(open_now);

        let query = NearbyQuery {
            location,
            radius,
            open_now_only: open_now == Some(true),
            page_token: page_token_of(page_token).map(ToString::to_string),
        };

        let response = self.provider.nearby_search(&query).await?;

        info!(
            %location,
            radius,
            open_now = query.open_now_only,
            results = response.results.len(),
            "Nearby search"
        );

        Ok(NearbySearchResponse {
            location: location.to_string(),
            radius,
            open_now,
            next_page_token: response.next_page_token,
            results: response.results.iter().map(NearbyPlace::from).collect(),
        })
    }

    /// One keep/drop decision per place, in page order.
    async fn apply_filter(&self, places: &[Place], filter: OpenFilter) -> Result<Vec<bool>> {
        match filter {
            OpenFilter::None => Ok(vec![true; places.len()]),
            OpenFilter::OpenNow => Ok(places.iter().map(|p| p.open_now() == Some(true)).collect()),
            OpenFilter::OpensBefore7 | OpenFilter::ClosesAfter8 => {
                debug!(
                    candidates = places.len(),
                    concurrency = self.details_concurrency,
                    "Fetching opening hours for candidates"
                );
                // Owned ids keep the stream free of borrows into `places`,
                // otherwise the handler future is not `Send`.
                let ids: Vec<Option<String>> =
                    places.iter().map(|p| p.place_id.clone()).collect();
                stream::iter(ids)
                    .map(|place_id| self.matches_hours(place_id, filter))
                    .buffered(self.details_concurrency)
                    .try_collect()
                    .await
            }
        }
    }

    /// Fetch a place's schedule and evaluate a details-based filter on it.
    async fn matches_hours(&self, place_id: Option<String>, filter: OpenFilter) -> Result<bool> {
        let Some(place_id) = place_id else {
            return Ok(false);
        };

        let details = self.provider.opening_hours(&place_id).await?;
        let hours = details
            .result
            .as_ref()
            .and_then(|result| result.opening_hours.as_ref());

        let matched = match (filter, filter.threshold_minutes()) {
            (OpenFilter::OpensBefore7, Some(threshold)) => opens_before(hours, threshold)?,
            (OpenFilter::ClosesAfter8, Some(threshold)) => closes_after(hours, threshold)?,
            _ => true,
        };

        Ok(matched)
    }
}

/// Trimmed, non-blank value of a required parameter.
fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BrewzzleError::MissingParameter(name.to_string()))
}

/// A page token is used verbatim unless it is blank.
fn page_token_of(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}

/// Split a comma-separated field list. `None` when nothing usable remains.
#[must_use]
pub fn parse_fields(fields: Option<&str>) -> Option<Vec<String>> {
    let fields: Vec<String> = fields?
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(ToString::to_string)
        .collect();

    (!fields.is_empty()).then_some(fields)
}

/// Radius in meters, defaulting when absent or not a non-negative integer.
#[must_use]
pub fn parse_radius(radius: Option<&str>) -> u32 {
    radius
        .and_then(|r| r.trim().parse().ok())
        .unwrap_or(DEFAULT_RADIUS_METERS)
}

/// `Some(true)` for a case-insensitive `true`, otherwise `None`.
#[must_use]
pub fn parse_open_now(open_now: Option<&str>) -> Option<bool> {
    open_now
        .filter(|v| v.trim().eq_ignore_ascii_case("true"))
        .map(|_| true)
}
