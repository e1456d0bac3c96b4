//! SQL queries against the snapshot tables.
//!
//! These functions are synchronous and take a borrowed connection; callers on
//! the async side go through [`SnapshotStore`](crate::store::SnapshotStore),
//! which runs them on the blocking pool.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};

use crate::model::{CountryFilter, CountryStat, GlobalStat, rate, truncate_per_million};

/// Latest snapshot per country, filtered, sorted by total cases and limited.
///
/// Snapshots are grouped by country code, so a country reported under several
/// aliases yields only its newest row. A name with no `apps_countries` alias
/// forms its own group and appears with a `NULL` country code, unless a code
/// filter is set. `excluded` names never take part in the grouping.
pub fn country_stats(
    conn: &Connection,
    filter: &CountryFilter,
    excluded: &[String],
) -> rusqlite::Result<Vec<CountryStat>> {
    let mut bind_values: Vec<Value> = Vec::new();

    let exclusion = if excluded.is_empty() {
        String::new()
    } else {
        let placeholders = vec!["?"; excluded.len()].join(", ");
        bind_values.extend(excluded.iter().cloned().map(Value::Text));
        format!("WHERE w.country NOT IN ({})", placeholders)
    };

    let code_filter = match &filter.country_code {
        Some(code) => {
            bind_values.push(Value::Text(code.clone()));
            "WHERE UPPER(k.country_code) = ?"
        }
        None => "",
    };

    bind_values.push(Value::Integer(i64::from(filter.limit)));

    // Prefixes keep a code-less feed name from colliding with a code.
    let sql = format!(
        "WITH keyed AS (
            SELECT
                w.*,
                c.country_code,
                COALESCE('code:' || UPPER(c.country_code), 'name:' || w.country) AS group_key
            FROM worldometers AS w
            LEFT JOIN apps_countries AS c
                ON c.country_alias = w.country
            {}
        )
        SELECT
            k.country_code,
            k.country,
            COALESCE(k.total_cases, 0),
            COALESCE(k.total_deaths, 0),
            COALESCE(k.total_recovered, 0),
            COALESCE(k.new_cases, 0),
            COALESCE(k.new_deaths, 0),
            COALESCE(k.active_cases, 0),
            COALESCE(k.serious_critical, 0),
            COALESCE(k.total_cases_per_million, 0.0),
            k.last_updated
        FROM keyed AS k
        INNER JOIN (
            SELECT group_key, MAX(last_updated) AS max_updated
            FROM keyed
            GROUP BY group_key
        ) AS latest
            ON latest.group_key = k.group_key
           AND latest.max_updated = k.last_updated
        {}
        GROUP BY k.group_key
        ORDER BY COALESCE(k.total_cases, 0) DESC, k.country ASC
        LIMIT ?",
        exclusion, code_filter
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(bind_values), country_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    tracing::debug!(
        country_code = ?filter.country_code,
        limit = filter.limit,
        rows = rows.len(),
        "country stats query"
    );

    Ok(rows)
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<CountryStat> {
    let total_confirmed: i64 = row.get(2)?;
    let total_deaths: i64 = row.get(3)?;
    let total_recovered: i64 = row.get(4)?;
    let per_million: f64 = row.get(9)?;

    Ok(CountryStat {
        country_code: row.get(0)?,
        country: row.get(1)?,
        total_confirmed,
        total_deaths,
        total_recovered,
        daily_confirmed: row.get(5)?,
        daily_deaths: row.get(6)?,
        active_cases: row.get(7)?,
        total_critical: row.get(8)?,
        total_confirmed_per_million_population: truncate_per_million(per_million),
        fatality_rate: rate(total_deaths, total_confirmed),
        recovery_rate: rate(total_recovered, total_confirmed),
        last_updated: row.get(10)?,
    })
}

/// The aggregate row carrying the most recent timestamp, if any.
pub fn global_stats(conn: &Connection) -> rusqlite::Result<Option<GlobalStat>> {
    conn.query_row(
        "SELECT
            COALESCE(total_cases, 0),
            COALESCE(total_deaths, 0),
            COALESCE(total_recovered, 0),
            COALESCE(new_cases, 0),
            COALESCE(new_deaths, 0),
            COALESCE(active_cases, 0),
            COALESCE(total_cases_per_million, 0.0),
            last_updated
        FROM worldometers_total_sum
        WHERE last_updated = (SELECT MAX(last_updated) FROM worldometers_total_sum)
        LIMIT 1",
        [],
        |row| {
            let per_million: f64 = row.get(6)?;
            Ok(GlobalStat {
                total_confirmed: row.get(0)?,
                total_deaths: row.get(1)?,
                total_recovered: row.get(2)?,
                total_new_cases: row.get(3)?,
                total_new_deaths: row.get(4)?,
                total_active_cases: row.get(5)?,
                total_cases_per_million_pop: truncate_per_million(per_million),
                created: row.get(7)?,
            })
        },
    )
    .optional()
}
