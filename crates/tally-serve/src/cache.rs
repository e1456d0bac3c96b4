//! In-memory response caching with moka.
//!
//! Successful `GET` responses are stored as raw body bytes keyed by the
//! request signature, so a repeated request within the TTL is answered with a
//! byte-identical body without touching the database.
//!
//! ## Cache Key Strategy
//!
//! Keys are `METHOD path?query`, exactly as the client sent them. Two
//! requests that differ only in parameter order are cached separately.
//!
//! ## What Gets Cached
//!
//! | Response | Cached |
//! |----------|--------|
//! | 200 OK | yes |
//! | 4xx / 5xx | no |
//! | non-GET | no |

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use moka::future::Cache;

use crate::error::ApiError;
use crate::state::AppState;

/// Header reporting whether a response came from the cache.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default TTL for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Largest response body the middleware will buffer for caching.
const MAX_CACHED_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Cached response with metadata.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    /// Response body exactly as first produced.
    pub body: Bytes,
    /// Content type of the original response.
    pub content_type: Option<HeaderValue>,
    /// When this entry was cached.
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Type alias for the response cache.
pub type ResponseCache = Cache<String, CachedEntry>;

/// Create a response cache holding up to `capacity` entries for `ttl`.
pub fn new_cache(capacity: u64, ttl: Duration) -> ResponseCache {
    Cache::builder()
        .max_capacity(capacity)
        .time_to_live(ttl)
        .build()
}

/// Cache key for a request: method plus path and query.
pub fn cache_key(request: &Request) -> String {
    let uri = request.uri();
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{} {}", request.method(), path_and_query)
}

/// Middleware that serves cached responses and stores fresh ones.
///
/// On a hit the handler is skipped entirely. On a miss the handler runs, and
/// a 200 response has its body buffered and inserted before being returned.
pub async fn cache_responses(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() != Method::GET {
        return Ok(next.run(request).await);
    }

    let key = cache_key(&request);

    if let Some(entry) = state.cache.get(&key).await {
        tracing::debug!(key = %key, cached_at = %entry.cached_at, "cache hit");
        return Ok(replay(&entry));
    }

    tracing::debug!(key = %key, "cache miss, computing");
    let response = next.run(request).await;

    if response.status() != StatusCode::OK {
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to buffer response: {e}")))?;

    let entry = CachedEntry {
        body: body.clone(),
        content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
        cached_at: chrono::Utc::now(),
    };
    state.cache.insert(key, entry).await;

    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Ok(Response::from_parts(parts, Body::from(body)))
}

/// Rebuild a 200 response from a cached entry.
fn replay(entry: &CachedEntry) -> Response {
    let mut response = (StatusCode::OK, entry.body.clone()).into_response();
    let headers = response.headers_mut();
    match &entry.content_type {
        Some(content_type) => {
            headers.insert(header::CONTENT_TYPE, content_type.clone());
        }
        None => {
            headers.remove(header::CONTENT_TYPE);
        }
    }
    headers.insert(X_CACHE, HeaderValue::from_static("HIT"));
    response
}
