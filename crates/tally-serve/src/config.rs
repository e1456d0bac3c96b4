//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_TTL};

/// Country names excluded from per-country results unless overridden.
///
/// The feed mixes these aggregate rows into the per-country table.
pub const DEFAULT_EXCLUDED_COUNTRIES: &[&str] = &["World", "Total:"];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Path to the SQLite database holding the snapshot tables.
    pub db_path: PathBuf,

    /// Open the database read-write and create any missing tables.
    pub init_schema: bool,

    /// Country names that never appear in per-country results.
    pub excluded_countries: Vec<String>,

    /// Time-to-live for cached responses.
    pub cache_ttl: Duration,

    /// Maximum number of cached responses.
    pub cache_capacity: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `TALLY_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `TALLY_DB_PATH`: SQLite database path (default: "tally.db")
    /// - `TALLY_INIT_SCHEMA`: Create missing tables on startup (default: false)
    /// - `TALLY_EXCLUDED_COUNTRIES`: Comma-separated country names to hide
    ///   (default: "World,Total:", empty string disables). Names are split on
    ///   every comma, so a name that itself contains one (e.g. "Korea, South")
    ///   cannot be listed.
    /// - `TALLY_CACHE_TTL_SECS`: Response cache TTL in seconds (default: 300)
    /// - `TALLY_CACHE_CAPACITY`: Response cache capacity (default: 1000)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("TALLY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let db_path = std::env::var("TALLY_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tally.db"));

        let init_schema = match std::env::var("TALLY_INIT_SCHEMA") {
            Ok(value) => parse_bool("TALLY_INIT_SCHEMA", &value)?,
            Err(_) => false,
        };

        let excluded_countries = match std::env::var("TALLY_EXCLUDED_COUNTRIES") {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_EXCLUDED_COUNTRIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let cache_ttl_secs = parse_positive("TALLY_CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?;
        let cache_capacity = parse_positive("TALLY_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        tracing::info!(
            bind_addr = %bind_addr,
            db_path = %db_path.display(),
            init_schema,
            excluded = ?excluded_countries,
            cache_ttl_secs,
            cache_capacity,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            db_path,
            init_schema,
            excluded_countries,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_capacity,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

/// Read a positive integer from `key`, falling back to `default` when unset.
fn parse_positive(key: &str, default: u64) -> anyhow::Result<u64> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };

    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{key} must be a positive integer, got '{raw}'"))?;

    if value == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }

    Ok(value)
}
