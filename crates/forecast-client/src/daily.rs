// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Daily forecast model and Open-Meteo response decoding.
//!
//! Open-Meteo returns daily values as parallel arrays aligned by index:
//!
//! ```json
//! {
//!   "timezone": "Asia/Taipei",
//!   "daily": {
//!     "time": ["2025-01-01", "2025-01-02"],
//!     "temperature_2m_max": [21.3, 22.0],
//!     "temperature_2m_min": [15.1, 16.4],
//!     "precipitation_sum": [0.0, 3.2]
//!   }
//! }
//! ```
//!
//! [`DailyForecast::from_slice`] zips them into one [`DailyRecord`] per date.

use chrono::NaiveDate;

use crate::FetchError;

/// Daily metrics requested from the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyMetric {
    TemperatureMax,
    TemperatureMin,
    PrecipitationSum,
}

impl DailyMetric {
    /// Every metric the forecast panel needs, in request order.
    pub const ALL: [DailyMetric; 3] = [
        DailyMetric::TemperatureMax,
        DailyMetric::TemperatureMin,
        DailyMetric::PrecipitationSum,
    ];

    /// Open-Meteo field name
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyMetric::TemperatureMax => "temperature_2m_max",
            DailyMetric::TemperatureMin => "temperature_2m_min",
            DailyMetric::PrecipitationSum => "precipitation_sum",
        }
    }

    /// Value for the `daily` query parameter
    #[must_use]
    pub fn query_value() -> String {
        Self::ALL
            .iter()
            .map(DailyMetric::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One day of forecast data.
///
/// Individual values are optional because Open-Meteo reports `null` for days
/// at the end of the horizon that a model does not cover.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

/// Ordered daily records for one location.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyForecast {
    /// Timezone the service resolved for the location (`timezone=auto`)
    pub timezone: Option<String>,
    pub records: Vec<DailyRecord>,
}

impl DailyForecast {
    /// Decode a raw Open-Meteo response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        let response: wire::ForecastResponse = serde_json::from_slice(body)?;
        Self::from_response(response)
    }

    fn from_response(response: wire::ForecastResponse) -> Result<Self, FetchError> {
        let daily = response
            .daily
            .ok_or_else(|| FetchError::Malformed("daily data not found in the response".to_string()))?;

        let days = daily.time.len();
        let max = take_series(daily.temperature_max, DailyMetric::TemperatureMax, days)?;
        let min = take_series(daily.temperature_min, DailyMetric::TemperatureMin, days)?;
        let precipitation = take_series(daily.precipitation, DailyMetric::PrecipitationSum, days)?;

        let records = daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| FetchError::Malformed(format!("invalid date '{date}': {e}")))?;
                Ok(DailyRecord {
                    date,
                    min_temperature_c: min[i],
                    max_temperature_c: max[i],
                    precipitation_mm: precipitation[i],
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(Self {
            timezone: response.timezone,
            records,
        })
    }

    /// Number of days in the forecast
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyRecord> {
        self.records.iter()
    }

    /// Lowest and highest temperature across all days, ignoring missing values.
    #[must_use]
    pub fn temperature_span(&self) -> Option<(f64, f64)> {
        self.records
            .iter()
            .flat_map(|r| [r.min_temperature_c, r.max_temperature_c])
            .flatten()
            .fold(None, |span, t| match span {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }
}

impl<'a> IntoIterator for &'a DailyForecast {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Check that a metric array is present and aligned with the date array.
fn take_series(
    series: Option<Vec<Option<f64>>>,
    metric: DailyMetric,
    days: usize,
) -> Result<Vec<Option<f64>>, FetchError> {
    let series = series.ok_or_else(|| FetchError::Malformed(format!("missing field '{}'", metric.as_str())))?;
    if series.len() != days {
        return Err(FetchError::Malformed(format!(
            "field '{}' has {} values for {} dates",
            metric.as_str(),
            series.len(),
            days
        )));
    }
    Ok(series)
}

/// Open-Meteo wire format
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub timezone: Option<String>,
        pub daily: Option<DailySeries>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailySeries {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        #[serde(rename = "precipitation_sum")]
        pub precipitation: Option<Vec<Option<f64>>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: &str = r#"{
        "latitude": 25.0,
        "longitude": 121.5,
        "timezone": "Asia/Taipei",
        "timezone_abbreviation": "CST",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_sum": "mm"
        },
        "daily": {
            "time": ["2025-03-01", "2025-03-02", "2025-03-03", "2025-03-04",
                     "2025-03-05", "2025-03-06", "2025-03-07"],
            "temperature_2m_max": [21.3, 22.0, 19.8, 18.5, 20.1, 23.4, 24.0],
            "temperature_2m_min": [15.1, 16.4, 14.9, 13.2, 14.0, 17.7, 18.3],
            "precipitation_sum": [0.0, 3.2, 12.5, 0.4, 0.0, 0.0, 1.1]
        }
    }"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_query_value() {
        assert_eq!(
            DailyMetric::query_value(),
            "temperature_2m_max,temperature_2m_min,precipitation_sum"
        );
    }

    #[test]
    fn test_parse_week_preserves_order_and_pairing() {
        let forecast = DailyForecast::from_slice(WEEK.as_bytes()).unwrap();

        assert_eq!(forecast.len(), 7);
        assert_eq!(forecast.timezone.as_deref(), Some("Asia/Taipei"));

        let first = &forecast.records[0];
        assert_eq!(first.date, date("2025-03-01"));
        assert_eq!(first.min_temperature_c, Some(15.1));
        assert_eq!(first.max_temperature_c, Some(21.3));
        assert_eq!(first.precipitation_mm, Some(0.0));

        let third = &forecast.records[2];
        assert_eq!(third.date, date("2025-03-03"));
        assert_eq!(third.min_temperature_c, Some(14.9));
        assert_eq!(third.max_temperature_c, Some(19.8));
        assert_eq!(third.precipitation_mm, Some(12.5));

        let dates: Vec<_> = forecast.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_missing_daily_is_malformed() {
        let body = br#"{"latitude": 25.0, "longitude": 121.5, "timezone": "GMT"}"#;
        let err = DailyForecast::from_slice(body).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(msg) if msg.contains("daily")));
    }

    #[test]
    fn test_missing_metric_is_malformed() {
        let body = br#"{"daily": {"time": ["2025-03-01"], "temperature_2m_max": [20.0], "temperature_2m_min": [10.0]}}"#;
        let err = DailyForecast::from_slice(body).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(msg) if msg.contains("precipitation_sum")));
    }

    #[test]
    fn test_misaligned_arrays_are_malformed() {
        let body = br#"{"daily": {
            "time": ["2025-03-01", "2025-03-02"],
            "temperature_2m_max": [20.0, 21.0],
            "temperature_2m_min": [10.0],
            "precipitation_sum": [0.0, 0.0]
        }}"#;
        let err = DailyForecast::from_slice(body).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(msg) if msg.contains("temperature_2m_min")));
    }

    #[test]
    fn test_invalid_date_is_malformed() {
        let body = br#"{"daily": {
            "time": ["tomorrow"],
            "temperature_2m_max": [20.0],
            "temperature_2m_min": [10.0],
            "precipitation_sum": [0.0]
        }}"#;
        assert!(matches!(
            DailyForecast::from_slice(body),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_not_json_is_decode_error() {
        assert!(matches!(
            DailyForecast::from_slice(b"<html>502 Bad Gateway</html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_null_values_are_kept_as_missing() {
        let body = br#"{"daily": {
            "time": ["2025-03-01", "2025-03-02"],
            "temperature_2m_max": [20.0, null],
            "temperature_2m_min": [10.0, null],
            "precipitation_sum": [0.0, null]
        }}"#;
        let forecast = DailyForecast::from_slice(body).unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast.records[1].max_temperature_c, None);
        assert_eq!(forecast.records[1].precipitation_mm, None);
        assert_eq!(forecast.timezone, None);
    }

    #[test]
    fn test_empty_daily_is_empty_forecast() {
        let body = br#"{"daily": {
            "time": [],
            "temperature_2m_max": [],
            "temperature_2m_min": [],
            "precipitation_sum": []
        }}"#;
        let forecast = DailyForecast::from_slice(body).unwrap();
        assert!(forecast.is_empty());
        assert_eq!(forecast.temperature_span(), None);
    }

    #[test]
    fn test_temperature_span() {
        let forecast = DailyForecast::from_slice(WEEK.as_bytes()).unwrap();
        assert_eq!(forecast.temperature_span(), Some((13.2, 24.0)));
    }
}
