//! # brewzzle-server
//!
//! HTTP server library for the brewzzle place-search gateway.
//!
//! This library provides the API handlers, logging setup and shared state.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
