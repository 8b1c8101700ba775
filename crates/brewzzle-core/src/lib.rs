//! # brewzzle-core
//!
//! Core logic for the brewzzle place-search gateway.
//!
//! This crate provides:
//! - A typed client for the Google Places web service
//! - Opening-hours evaluation ("opens before 7", "closes after 8")
//! - Search orchestration with pagination-token threading
//! - Configuration loading and validation
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`config`] - Layered configuration (defaults, file, environment)
//! - [`error`] - Unified error types for the crate
//! - [`google`] - HTTP adapter for the Google Places legacy endpoints
//! - [`hours`] - Pure opening-hours predicates
//! - [`place`] - Provider data model with raw-field passthrough
//! - [`provider`] - The [`PlacesProvider`] port the orchestrator depends on
//! - [`search`] - [`SearchService`], one method per gateway endpoint
//! - [`types`] - Request types and OpenAPI response schemas

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod google;
pub mod hours;
pub mod place;
pub mod provider;
pub mod search;
pub mod types;

// Re-export primary types for convenience
pub use crate::config::{
    default_config_path, Config, ConfigError, ConfigResult, LoggingConfig, ProviderConfig,
    ServerConfig,
};
pub use crate::error::{BrewzzleError, Error, Result};
pub use crate::google::GooglePlacesClient;
pub use crate::hours::{closes_after, opens_before, parse_hhmm, HoursError};
pub use crate::place::{DayTime, OpeningHours, Period, Place, ProviderResponse};
pub use crate::provider::{PlacesProvider, ProviderError, ProviderResult};
pub use crate::search::SearchService;
pub use crate::types::{
    HealthResponse, LatLng, NearbyPlace, NearbyQuery, NearbySearchResponse, OpenFilter,
    OpenSearchResponse, PlaceSummary, TypeSearchResponse,
};
