//! OpenAPI specification generation for the brewzzle API.
//!
//! The document is served at `/openapi.json` and written to disk by the
//! `gen-openapi` binary for client generation.

use axum::Json;
use brewzzle_core::{
    HealthResponse, NearbyPlace, NearbySearchResponse, OpenSearchResponse, PlaceSummary,
    TypeSearchResponse,
};
use utoipa::OpenApi;

use super::error::ErrorResponse;

/// Serve the OpenAPI specification as JSON.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a pretty-printed string.
/// Used by the gen-openapi binary.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn get_openapi_json() -> serde_json::Result<String> {
    ApiDoc::openapi().to_pretty_json()
}

/// Main OpenAPI document structure for brewzzle.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "brewzzle API",
        description = r#"
# brewzzle API

A thin gateway over Google Places for finding coffee shops.

## Pagination

Search endpoints return `next_page_token` when the provider has more results.
Send it back as `next_page_token` on the same endpoint to fetch the next page.
Tokens are opaque and take a moment to become valid after they are issued.

## Opening-hours filters

`/search/open?filter=before7` keeps places that open before 07:00 on at least
one day of the week; `filter=after8` keeps places that close after 20:00 on at
least one day (or never close).
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local brewzzle server")
    ),
    tags(
        (name = "system", description = "Health checks"),
        (name = "search", description = "Place search backed by Google Places")
    ),
    paths(
        super::health::health_check,
        super::search::text_search,
        super::search::type_search,
        super::search::open_search,
        super::search::place_details,
        super::search::nearby_search,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            PlaceSummary,
            NearbyPlace,
            TypeSearchResponse,
            OpenSearchResponse,
            NearbySearchResponse,
        )
    )
)]
pub struct ApiDoc;
