//! Place search API endpoints.
//!
//! Every query parameter is optional at the extractor level; validation and
//! defaulting happen in [`SearchService`](brewzzle_core::SearchService) so
//! that missing values surface as `MISSING_PARAMETER` rather than an axum
//! rejection.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use brewzzle_core::{NearbySearchResponse, OpenSearchResponse, Place, ProviderResponse, TypeSearchResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::{ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Creates the search router.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(text_search))
        .route("/type", get(type_search))
        .route("/open", get(open_search))
        .route("/place", get(place_details))
        .route("/nearby", get(nearby_search))
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// Query parameters for free-text search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TextSearchQuery {
    /// Free-text query. Required unless `next_page_token` is given.
    #[param(example = "third wave coffee in Portland")]
    pub query: Option<String>,

    /// Continuation token from a previous page. Takes precedence over `query`.
    pub next_page_token: Option<String>,
}

/// Query parameters for type search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TypeSearchQuery {
    /// Place type, e.g. `cafe` or `bakery`.
    #[serde(rename = "type")]
    #[param(example = "cafe")]
    pub place_type: Option<String>,

    /// Continuation token from a previous page.
    pub next_page_token: Option<String>,
}

/// Query parameters for open-status search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OpenSearchQuery {
    /// Place type. Defaults to `cafe`.
    #[serde(rename = "type")]
    #[param(example = "cafe")]
    pub place_type: Option<String>,

    /// Continuation token from a previous page.
    pub next_page_token: Option<String>,

    /// `opennow`, `before7` or `after8` (case-insensitive). Anything else
    /// returns the page unfiltered.
    #[param(example = "before7")]
    pub filter: Option<String>,
}

/// Query parameters for place details.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlaceDetailsQuery {
    /// Provider place id.
    #[param(example = "ChIJN1t_tDeuEmsRUsoyG83frY4")]
    pub place_id: Option<String>,

    /// Comma-separated field list. Defaults to
    /// `name,formatted_address,opening_hours,rating,website`.
    #[param(example = "name,opening_hours")]
    pub fields: Option<String>,
}

/// Query parameters for nearby search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbySearchQuery {
    /// Center point as `lat,lng`.
    #[param(example = "37.7749,-122.4194")]
    pub location: Option<String>,

    /// Radius in meters. Defaults to 5000, also when not an integer.
    #[param(example = "1500")]
    pub radius: Option<String>,

    /// `true` to only return places open now.
    #[param(example = "true")]
    pub open_now: Option<String>,

    /// Continuation token from a previous page.
    pub next_page_token: Option<String>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Free-text place search.
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    operation_id = "textSearch",
    summary = "Search places by free text",
    description = "Returns the provider response unchanged, including \
        `next_page_token` when more results exist. Pass that token back to get \
        the next page; `query` is then ignored.",
    params(TextSearchQuery),
    responses(
        (status = 200, description = "Raw provider response", content_type = "application/json"),
        (status = 400, description = "Neither query nor token given", body = ErrorResponse),
        (status = 502, description = "Places provider failed", body = ErrorResponse),
        (status = 503, description = "Places provider quota exceeded", body = ErrorResponse)
    )
)]
pub async fn text_search(
    State(state): State<SharedState>,
    Query(params): Query<TextSearchQuery>,
) -> ApiResult<Json<ProviderResponse>> {
    let response = state
        .search()
        .search(params.query.as_deref(), params.next_page_token.as_deref())
        .await?;
    Ok(Json(response))
}

/// Search places by type.
#[utoipa::path(
    get,
    path = "/search/type",
    tag = "search",
    operation_id = "typeSearch",
    summary = "Search places by type",
    params(TypeSearchQuery),
    responses(
        (status = 200, description = "Projected results", body = TypeSearchResponse),
        (status = 400, description = "Missing type", body = ErrorResponse),
        (status = 502, description = "Places provider failed", body = ErrorResponse),
        (status = 503, description = "Places provider quota exceeded", body = ErrorResponse)
    )
)]
pub async fn type_search(
    State(state): State<SharedState>,
    Query(params): Query<TypeSearchQuery>,
) -> ApiResult<Json<TypeSearchResponse>> {
    let response = state
        .search()
        .search_by_type(params.place_type.as_deref(), params.next_page_token.as_deref())
        .await?;
    Ok(Json(response))
}

/// Search places by type, filtered by opening status.
#[utoipa::path(
    get,
    path = "/search/open",
    tag = "search",
    operation_id = "openSearch",
    summary = "Search places by opening status",
    description = "`opennow` uses the summary flag on each result. `before7` \
        and `after8` look up each candidate's weekly schedule, so they are \
        slower; a place qualifies if any day matches.",
    params(OpenSearchQuery),
    responses(
        (status = 200, description = "Filtered results in provider order", body = OpenSearchResponse),
        (status = 502, description = "Provider failed or sent malformed hours", body = ErrorResponse),
        (status = 503, description = "Places provider quota exceeded", body = ErrorResponse)
    )
)]
pub async fn open_search(
    State(state): State<SharedState>,
    Query(params): Query<OpenSearchQuery>,
) -> ApiResult<Json<OpenSearchResponse>> {
    let response = state
        .search()
        .search_open(
            params.place_type.as_deref(),
            params.next_page_token.as_deref(),
            params.filter.as_deref(),
        )
        .await?;
    Ok(Json(response))
}

/// Look up one place.
#[utoipa::path(
    get,
    path = "/search/place",
    tag = "search",
    operation_id = "placeDetails",
    summary = "Get place details",
    description = "Returns the provider `result` object unchanged.",
    params(PlaceDetailsQuery),
    responses(
        (status = 200, description = "Raw place details", content_type = "application/json"),
        (status = 400, description = "Missing place_id", body = ErrorResponse),
        (status = 404, description = "No such place", body = ErrorResponse),
        (status = 502, description = "Places provider failed", body = ErrorResponse),
        (status = 503, description = "Places provider quota exceeded", body = ErrorResponse)
    )
)]
pub async fn place_details(
    State(state): State<SharedState>,
    Query(params): Query<PlaceDetailsQuery>,
) -> ApiResult<Json<Place>> {
    let place = state
        .search()
        .place_details(params.place_id.as_deref(), params.fields.as_deref())
        .await?;
    Ok(Json(place))
}

/// Search cafes around a point.
#[utoipa::path(
    get,
    path = "/search/nearby",
    tag = "search",
    operation_id = "nearbySearch",
    summary = "Search cafes near a location",
    params(NearbySearchQuery),
    responses(
        (status = 200, description = "Nearby cafes", body = NearbySearchResponse),
        (status = 400, description = "Missing or malformed location", body = ErrorResponse),
        (status = 502, description = "Places provider failed", body = ErrorResponse),
        (status = 503, description = "Places provider quota exceeded", body = ErrorResponse)
    )
)]
pub async fn nearby_search(
    State(state): State<SharedState>,
    Query(params): Query<NearbySearchQuery>,
) -> ApiResult<Json<NearbySearchResponse>> {
    let response = state
        .search()
        .search_nearby(
            params.location.as_deref(),
            params.radius.as_deref(),
            params.open_now.as_deref(),
            params.next_page_token.as_deref(),
        )
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_param_is_renamed() {
        let query: TypeSearchQuery =
            serde_json::from_value(serde_json::json!({"type": "bakery"})).unwrap();
        assert_eq!(query.place_type.as_deref(), Some("bakery"));
        assert_eq!(query.next_page_token, None);
    }

    #[test]
    fn test_nearby_params_are_all_optional() {
        let query: NearbySearchQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.location.is_none());
        assert!(query.radius.is_none());
    }
}
