//! Response types and request filters for the stats endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;

/// Row limit applied when the caller doesn't supply one.
pub const DEFAULT_LIMIT: u32 = 999;

/// Latest statistics for a single country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryStat {
    /// ISO code from country metadata, `None` when the feed name has no alias row.
    pub country_code: Option<String>,
    pub country: String,
    pub total_confirmed: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
    pub daily_confirmed: i64,
    pub daily_deaths: i64,
    pub active_cases: i64,
    pub total_critical: i64,
    pub total_confirmed_per_million_population: i64,
    /// Fatality rate in percent, `None` when there are no cases.
    #[serde(rename = "FR")]
    pub fatality_rate: Option<f64>,
    /// Recovery rate in percent, `None` when there are no cases.
    #[serde(rename = "PR")]
    pub recovery_rate: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

/// Latest worldwide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStat {
    pub total_confirmed: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
    pub total_new_cases: i64,
    pub total_new_deaths: i64,
    pub total_active_cases: i64,
    pub total_cases_per_million_pop: i64,
    pub created: DateTime<Utc>,
}

/// Validated filter for country stats queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFilter {
    /// Upper-cased country code to restrict results to.
    pub country_code: Option<String>,
    /// Maximum number of rows to return.
    pub limit: u32,
}

impl Default for CountryFilter {
    fn default() -> Self {
        Self {
            country_code: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl CountryFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty values are treated as absent. Codes must be two or
    /// three ASCII letters; `limit` must be a non-negative integer.
    pub fn parse(country_code: Option<&str>, limit: Option<&str>) -> Result<Self, ApiError> {
        let country_code = match country_code.map(str::trim) {
            None | Some("") => None,
            Some(code) => {
                let valid = (2..=3).contains(&code.len())
                    && code.chars().all(|c| c.is_ascii_alphabetic());
                if !valid {
                    return Err(ApiError::BadRequest(format!(
                        "invalid countryCode: '{}'. Expected a 2 or 3 letter code",
                        code
                    )));
                }
                Some(code.to_ascii_uppercase())
            }
        };

        let limit = match limit.map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ApiError::BadRequest(format!(
                    "invalid limit: '{}'. Expected a non-negative integer",
                    raw
                ))
            })?,
        };

        Ok(Self {
            country_code,
            limit,
        })
    }
}

/// `part` as a percentage of `total`, undefined when `total` is not positive.
pub fn rate(part: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }
    let value = part as f64 / total as f64 * 100.0;
    value.is_finite().then_some(value)
}

/// Truncate a per-million figure toward zero.
pub fn truncate_per_million(value: f64) -> i64 {
    value.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_china_fatality() {
        let fr = rate(3255, 81008).unwrap();
        assert!((fr - 4.0181).abs() < 1e-4, "got {fr}");
    }

    #[test]
    fn rate_zero_cases_is_none() {
        assert_eq!(rate(0, 0), None);
        assert_eq!(rate(5, 0), None);
    }

    #[test]
    fn rate_negative_total_is_none() {
        assert_eq!(rate(1, -10), None);
    }

    #[test]
    fn truncate_per_million_drops_fraction() {
        assert_eq!(truncate_per_million(678.9), 678);
        assert_eq!(truncate_per_million(0.4), 0);
        assert_eq!(truncate_per_million(f64::NAN), 0);
    }

    #[test]
    fn filter_defaults() {
        let filter = CountryFilter::parse(None, None).unwrap();
        assert_eq!(filter, CountryFilter::default());
        assert_eq!(filter.limit, 999);
    }

    #[test]
    fn filter_normalizes_code() {
        let filter = CountryFilter::parse(Some(" cn "), None).unwrap();
        assert_eq!(filter.country_code.as_deref(), Some("CN"));
    }

    #[test]
    fn filter_empty_code_is_absent() {
        let filter = CountryFilter::parse(Some(""), None).unwrap();
        assert_eq!(filter.country_code, None);
    }

    #[test]
    fn filter_rejects_bad_code() {
        for code in ["C", "C1", "CHINA", "C N", "ü1"] {
            let err = CountryFilter::parse(Some(code), None).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "accepted {code:?}");
        }
    }

    #[test]
    fn filter_parses_limit() {
        assert_eq!(CountryFilter::parse(None, Some("10")).unwrap().limit, 10);
        assert_eq!(CountryFilter::parse(None, Some("0")).unwrap().limit, 0);
        assert_eq!(CountryFilter::parse(None, Some("")).unwrap().limit, 999);
    }

    #[test]
    fn filter_rejects_bad_limit() {
        for limit in ["abc", "-1", "1.5", "99999999999"] {
            let err = CountryFilter::parse(None, Some(limit)).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "accepted {limit:?}");
        }
    }

    #[test]
    fn country_stat_json_field_names() {
        let stat = CountryStat {
            country_code: None,
            country: "Vatican City".to_string(),
            total_confirmed: 0,
            total_deaths: 0,
            total_recovered: 0,
            daily_confirmed: 0,
            daily_deaths: 0,
            active_cases: 0,
            total_critical: 0,
            total_confirmed_per_million_population: 0,
            fatality_rate: None,
            recovery_rate: None,
            last_updated: DateTime::from_timestamp(1_584_698_400, 0).unwrap(),
        };

        let json = serde_json::to_value(&stat).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "countryCode",
            "country",
            "totalConfirmed",
            "totalDeaths",
            "totalRecovered",
            "dailyConfirmed",
            "dailyDeaths",
            "activeCases",
            "totalCritical",
            "totalConfirmedPerMillionPopulation",
            "FR",
            "PR",
            "lastUpdated",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(json["FR"].is_null());
        assert!(json["PR"].is_null());
        assert!(json["countryCode"].is_null());
        assert_eq!(json["lastUpdated"], "2020-03-20T10:00:00Z");
    }
}
