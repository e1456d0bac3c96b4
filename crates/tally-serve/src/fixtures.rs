//! Seeded in-memory databases shared by the unit and router tests.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, params};

use crate::schema::init_schema;
use crate::store::SnapshotStore;

/// Names hidden from per-country results in tests.
pub const EXCLUDED: &[&str] = &["World", "Total:"];

pub const EARLIER: &str = "2020-03-19 10:00:00";
pub const LATEST: &str = "2020-03-20 10:00:00";

/// Timestamp of the newest seeded snapshot.
pub fn latest() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 20, 10, 0, 0).unwrap()
}

pub fn empty_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

/// Insert a snapshot with only the headline totals filled in.
pub fn insert_snapshot(
    conn: &Connection,
    country: &str,
    cases: i64,
    deaths: i64,
    recovered: i64,
    last_updated: &str,
) {
    conn.execute(
        "INSERT INTO worldometers
            (country, total_cases, total_deaths, total_recovered, new_cases, new_deaths,
             active_cases, serious_critical, total_cases_per_million, last_updated)
         VALUES (?1, ?2, ?3, ?4, 0, 0, ?2 - ?3 - ?4, 0, 0.0, ?5)",
        params![country, cases, deaths, recovered, last_updated],
    )
    .unwrap();
}

/// Two scrapes' worth of snapshots, aliases, and worldwide totals.
pub fn seeded_connection() -> Connection {
    let conn = empty_connection();

    conn.execute_batch(&format!(
        "INSERT INTO worldometers
            (country, total_cases, total_deaths, total_recovered, new_cases, new_deaths,
             active_cases, serious_critical, total_cases_per_million, last_updated)
         VALUES
            ('China', 80967, 3248, 69601, 39, 11, 8118, 2274, 56.25, '{EARLIER}'),
            ('China', 81008, 3255, 71740, 41, 7, 6013, 2136, 56.3, '{LATEST}'),
            ('Italy', 35713, 2978, 4025, 4207, 475, 28710, 2257, 590.7, '{EARLIER}'),
            ('Italy', 41035, 3405, 4440, 5322, 427, 33190, 2498, 678.7, '{LATEST}'),
            ('USA', 14250, 205, 121, 4530, 55, 13924, 12, 43.05, '{LATEST}'),
            ('Diamond Princess', 800, 6, 300, 0, 0, 494, 15, 0.0, '{EARLIER}'),
            ('Diamond Princess', 712, 7, 325, 0, 1, 380, 15, 0.0, '{LATEST}'),
            ('Vatican City', 0, 0, 0, 0, 0, 0, 0, 0.0, '{LATEST}'),
            ('World', 245000, 10000, 88000, 30000, 1000, 147000, 7000, 31.4, '{LATEST}'),
            ('Total:', 245000, 10000, 88000, 30000, 1000, 147000, 7000, 31.4, '{LATEST}');

         INSERT INTO apps_countries (country_code, country_alias) VALUES
            ('CN', 'China'),
            ('IT', 'Italy'),
            ('US', 'USA'),
            ('US', 'United States'),
            ('VA', 'Vatican City');

         INSERT INTO worldometers_total_sum
            (total_cases, total_deaths, total_recovered, new_cases, new_deaths,
             active_cases, total_cases_per_million, last_updated)
         VALUES
            (220000, 9000, 85000, 25000, 900, 126000, 28.2, '{EARLIER}'),
            (245000, 10000, 88000, 30000, 1000, 147000, 31.4, '{LATEST}');"
    ))
    .unwrap();

    conn
}

pub fn seeded_store() -> SnapshotStore {
    SnapshotStore::from_connection(seeded_connection(), excluded())
}

pub fn empty_store() -> SnapshotStore {
    SnapshotStore::from_connection(empty_connection(), excluded())
}

fn excluded() -> Vec<String> {
    EXCLUDED.iter().map(|s| s.to_string()).collect()
}
