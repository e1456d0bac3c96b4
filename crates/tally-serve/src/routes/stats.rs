//! Country and global stats endpoints.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{CountryFilter, CountryStat, GlobalStat};
use crate::state::AppState;

// ═══════════════════════════════════════════════════════════════════════════
// Query Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Query parameters for country stats.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryQuery {
    /// ISO country code (2 or 3 letters, case-insensitive).
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
}

/// Query parameters for top countries.
///
/// `limit` is taken as a string so a malformed value is reported as our own
/// JSON 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct TopQuery {
    /// Maximum number of countries to return (default: 999).
    pub limit: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Endpoints
// ═══════════════════════════════════════════════════════════════════════════

/// `GET /api/v1/stats/country`
///
/// Returns the latest stats for every country, or only the country matching
/// `countryCode` when given.
pub async fn country(
    State(state): State<AppState>,
    params: Result<Query<CountryQuery>, QueryRejection>,
) -> Result<Json<Vec<CountryStat>>, ApiError> {
    let Query(params) = params?;
    let filter = CountryFilter::parse(params.country_code.as_deref(), None)?;

    let rows = state.store.country_stats(filter).await?;
    Ok(Json(rows))
}

/// `GET /api/v1/stats/global`
///
/// Returns the most recent worldwide totals.
pub async fn global(State(state): State<AppState>) -> Result<Json<GlobalStat>, ApiError> {
    state
        .store
        .global_stats()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no global statistics available".to_string()))
}

/// `GET /api/v1/stats/top`
///
/// Returns the countries with the most confirmed cases, highest first.
pub async fn top(
    State(state): State<AppState>,
    params: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<Vec<CountryStat>>, ApiError> {
    let Query(params) = params?;
    let filter = CountryFilter::parse(None, params.limit.as_deref())?;

    let rows = state.store.country_stats(filter).await?;
    Ok(Json(rows))
}
