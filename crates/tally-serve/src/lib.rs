//! Tally Serve - HTTP API for pandemic statistics
//!
//! This crate serves read-only per-country and worldwide statistics from a
//! SQLite database of periodic snapshots written by a separate ingestion
//! pipeline.
//!
//! # Architecture
//!
//! - **AppState**: Shared application state (snapshot store, response cache, configuration)
//! - **Store**: Latest-snapshot queries executed on the blocking pool
//! - **Cache**: Request-keyed moka cache in front of every stats handler
//! - **Routes**: Endpoint handlers under `/api/v1/stats`

pub mod cache;
pub mod config;
mod error;
pub mod model;
pub mod query;
mod routes;
pub mod schema;
mod state;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use self::cache::{ResponseCache, cache_responses, new_cache};
pub use self::config::Config;
pub use self::error::ApiError;
pub use self::model::{CountryFilter, CountryStat, GlobalStat};
pub use self::routes::router;
pub use self::state::AppState;
pub use self::store::SnapshotStore;
