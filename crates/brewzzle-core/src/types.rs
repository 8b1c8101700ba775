//! Shared request and response types.
//!
//! Query-side types ([`LatLng`], [`OpenFilter`], [`NearbyQuery`]) are parsed
//! from raw query-string values. Response projections are the simplified
//! place shapes emitted by the search endpoints and carry OpenAPI schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::BrewzzleError;
use crate::hours::{CLOSES_AFTER_8_MINUTES, OPENS_BEFORE_7_MINUTES};
use crate::place::Place;

/// Place type used when none is given to the open-status search, and the
/// fixed type for nearby search.
pub const DEFAULT_PLACE_TYPE: &str = "cafe";

/// Nearby search radius, in meters, when none is given.
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

// ============================================================================
// Query types
// ============================================================================

/// A geographic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Formats as `lat,lng`, always with a fractional part (`37.0,-122.0`).
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = BrewzzleError;

    /// Parse `"lat,lng"`. Only the first comma splits; both halves must be
    /// finite floats.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BrewzzleError::InvalidLocation(s.to_string());

        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

        if !lat.is_finite() || !lng.is_finite() {
            return Err(invalid());
        }

        Ok(Self { lat, lng })
    }
}

/// Opening-hours filter for the open-status search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenFilter {
    /// Pass everything through.
    #[default]
    None,
    /// Keep places whose summary says they are open now.
    OpenNow,
    /// Keep places that open before 07:00 on any day.
    OpensBefore7,
    /// Keep places that close after 20:00 on any day (or never close).
    ClosesAfter8,
}

impl OpenFilter {
    /// Parse a normalised filter value. Unknown values mean no filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "opennow" => Self::OpenNow,
            "before7" => Self::OpensBefore7,
            "after8" => Self::ClosesAfter8,
            _ => Self::None,
        }
    }

    /// Whether this filter needs full place details per candidate.
    #[must_use]
    pub const fn needs_details(self) -> bool {
        matches!(self, Self::OpensBefore7 | Self::ClosesAfter8)
    }

    /// Threshold in minutes since midnight for the details-based filters.
    #[must_use]
    pub const fn threshold_minutes(self) -> Option<u16> {
        match self {
            Self::OpensBefore7 => Some(OPENS_BEFORE_7_MINUTES),
            Self::ClosesAfter8 => Some(CLOSES_AFTER_8_MINUTES),
            Self::None | Self::OpenNow => None,
        }
    }
}

/// Parameters for a nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Search center.
    pub location: LatLng,
    /// Radius in meters.
    pub radius: u32,
    /// Only return places open right now.
    pub open_now_only: bool,
    /// Continuation token; when set every other field is ignored.
    pub page_token: Option<String>,
}

// ============================================================================
// Response projections
// ============================================================================

/// Simplified place returned by type and open-status searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "place_id": "ChIJN1t_tDeuEmsRUsoyG83frY4",
    "name": "Morning Brew",
    "address": "12 Market St, San Francisco, CA",
    "open_now": true
}))]
pub struct PlaceSummary {
    /// Provider place identifier.
    pub place_id: Option<String>,

    /// Display name.
    pub name: Option<String>,

    /// Formatted address.
    pub address: Option<String>,

    /// Whether the provider reports the place open right now.
    pub open_now: Option<bool>,
}

impl PlaceSummary {
    /// Project using `formatted_address` only.
    #[must_use]
    pub fn from_place(place: &Place) -> Self {
        Self {
            place_id: place.place_id.clone(),
            name: place.name.clone(),
            address: place.formatted_address.clone(),
            open_now: place.open_now(),
        }
    }

    /// Project using `formatted_address`, falling back to `vicinity`.
    #[must_use]
    pub fn from_place_with_vicinity(place: &Place) -> Self {
        Self {
            address: place
                .formatted_address
                .clone()
                .or_else(|| place.vicinity.clone()),
            ..Self::from_place(place)
        }
    }
}

/// Simplified place returned by the nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "place_id": "ChIJN1t_tDeuEmsRUsoyG83frY4",
    "name": "Morning Brew",
    "vicinity": "12 Market St",
    "open_now": null
}))]
pub struct NearbyPlace {
    /// Provider place identifier.
    pub place_id: Option<String>,

    /// Display name.
    pub name: Option<String>,

    /// Short address snippet.
    pub vicinity: Option<String>,

    /// Whether the provider reports the place open right now.
    pub open_now: Option<bool>,
}

impl From<&Place> for NearbyPlace {
    fn from(place: &Place) -> Self {
        Self {
            place_id: place.place_id.clone(),
            name: place.name.clone(),
            vicinity: place.vicinity.clone(),
            open_now: place.open_now(),
        }
    }
}

/// Response of `GET /search/type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TypeSearchResponse {
    /// The normalised place type that was searched.
    #[serde(rename = "type")]
    #[schema(example = "cafe")]
    pub place_type: String,

    /// Token for the next page, forwarded verbatim.
    pub next_page_token: Option<String>,

    /// Simplified places in provider order.
    pub results: Vec<PlaceSummary>,
}

/// Response of `GET /search/open`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OpenSearchResponse {
    /// The normalised place type that was searched.
    #[serde(rename = "type")]
    #[schema(example = "cafe")]
    pub place_type: String,

    /// The normalised filter value as received, or null when none was given.
    #[schema(example = "before7")]
    pub filter: Option<String>,

    /// Token for the next page, forwarded verbatim.
    pub next_page_token: Option<String>,

    /// Places that passed the filter, in provider order.
    pub results: Vec<PlaceSummary>,
}

/// Response of `GET /search/nearby`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NearbySearchResponse {
    /// Search center as `lat,lng`.
    #[schema(example = "37.7749,-122.4194")]
    pub location: String,

    /// Radius in meters.
    #[schema(example = 5000)]
    pub radius: u32,

    /// `true` when restricted to open places, otherwise null.
    pub open_now: Option<bool>,

    /// Token for the next page, forwarded verbatim.
    pub next_page_token: Option<String>,

    /// Simplified places in provider order.
    pub results: Vec<NearbyPlace>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    #[schema(example = "ok")]
    pub status: String,

    /// Service version.
    #[schema(example = "0.1.0")]
    pub version: String,
}
