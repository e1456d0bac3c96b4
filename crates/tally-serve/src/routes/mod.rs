//! API route definitions.

mod health;
mod stats;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;

use crate::cache::cache_responses;
use crate::state::AppState;

/// Build the complete API router.
///
/// # Route Structure
///
/// ## Uncached
/// - `GET /health` - Health check
///
/// ## Cached
/// - `GET /api/v1/stats/country` - Latest stats per country, optional `countryCode`
/// - `GET /api/v1/stats/global` - Latest worldwide totals
/// - `GET /api/v1/stats/top` - Countries by confirmed cases, optional `limit`
pub fn router(state: AppState) -> Router {
    // Public routes (no caching)
    let public = Router::new().route("/health", get(health::health_check));

    let stats_v1 = Router::new()
        .route("/country", get(stats::country))
        .route("/global", get(stats::global))
        .route("/top", get(stats::top))
        // Response cache
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cache_responses,
        ))
        // Cache headers middleware
        .layer(middleware::map_response_with_state(
            state.clone(),
            add_cache_headers,
        ));

    Router::new()
        .merge(public)
        .nest("/api/v1/stats", stats_v1)
        .with_state(state)
}

/// Add cache headers to API responses.
///
/// Successful responses may be cached by clients and CDNs for as long as the
/// server-side cache holds them, and served stale for five times that while
/// revalidating.
async fn add_cache_headers(State(state): State<AppState>, response: Response) -> Response {
    if !response.status().is_success() {
        return response;
    }

    let ttl = state.config.cache_ttl.as_secs();
    let value = format!("public, max-age={}, stale-while-revalidate={}", ttl, ttl * 5);

    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&value) {
        parts.headers.insert(header::CACHE_CONTROL, value);
    }
    Response::from_parts(parts, body)
}
