//! SQLite schema for the snapshot tables.
//!
//! The ingestion pipeline owns these tables in production. The definitions
//! here exist so a local database (or a test fixture) can be created with
//! the same shape the queries expect.

use rusqlite::{Connection, Result};

/// Create the snapshot tables and their indexes if they don't exist.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Per-country snapshots, appended on every scrape
        CREATE TABLE IF NOT EXISTS worldometers (
            country TEXT NOT NULL,
            total_cases INTEGER,
            total_deaths INTEGER,
            total_recovered INTEGER,
            new_cases INTEGER,
            new_deaths INTEGER,
            active_cases INTEGER,
            serious_critical INTEGER,
            total_cases_per_million REAL,
            last_updated TEXT NOT NULL
        );

        -- Worldwide totals, one row per scrape
        CREATE TABLE IF NOT EXISTS worldometers_total_sum (
            total_cases INTEGER,
            total_deaths INTEGER,
            total_recovered INTEGER,
            new_cases INTEGER,
            new_deaths INTEGER,
            active_cases INTEGER,
            total_cases_per_million REAL,
            last_updated TEXT NOT NULL
        );

        -- Feed country names mapped to ISO codes (many aliases per code)
        CREATE TABLE IF NOT EXISTS apps_countries (
            country_code TEXT NOT NULL,
            country_alias TEXT NOT NULL UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_worldometers_country_updated
            ON worldometers(country, last_updated);
        CREATE INDEX IF NOT EXISTS idx_total_sum_updated
            ON worldometers_total_sum(last_updated);
        CREATE INDEX IF NOT EXISTS idx_apps_countries_code
            ON apps_countries(country_code);
        "#,
    )
}
