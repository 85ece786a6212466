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

//! Async HTTP client for the Open-Meteo forecast endpoint.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::{Coordinates, DailyForecast, DailyMetric, FetchError};

/// Public Open-Meteo forecast endpoint (no API key required)
pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// Configuration for [`ForecastClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Forecast endpoint URL.
    pub endpoint: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Anything that can produce a daily forecast for a location.
///
/// [`ForecastClient`] is the production implementation; tests substitute
/// canned sources so fetch orchestration can run without a network.
pub trait DailyForecastSource: Send + Sync + 'static {
    fn fetch(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<DailyForecast, FetchError>> + Send;
}

/// Client for the Open-Meteo daily forecast API.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ForecastClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    /// Query parameters for one location.
    ///
    /// Always exactly latitude, longitude, the fixed daily metric set, and
    /// automatic timezone resolution.
    #[must_use]
    pub fn query(coordinates: Coordinates) -> [(&'static str, String); 4] {
        [
            ("latitude", coordinates.latitude().to_string()),
            ("longitude", coordinates.longitude().to_string()),
            ("daily", DailyMetric::query_value()),
            ("timezone", "auto".to_string()),
        ]
    }

    /// Build the GET request without sending it.
    pub fn build_request(&self, coordinates: Coordinates) -> Result<reqwest::Request, FetchError> {
        Ok(self
            .http
            .get(&self.endpoint)
            .query(&Self::query(coordinates))
            .build()?)
    }

    /// Fetch the daily forecast for a location.
    ///
    /// Non-2xx responses and bodies without the expected `daily` arrays are
    /// errors. Nothing is retried.
    pub async fn fetch_daily(&self, coordinates: Coordinates) -> Result<DailyForecast, FetchError> {
        let request = self.build_request(coordinates)?;
        debug!("GET {}", request.url());

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let forecast = DailyForecast::from_slice(&body)?;
        debug!("Received {} forecast days for {}", forecast.len(), coordinates);
        Ok(forecast)
    }

    /// Endpoint this client sends requests to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DailyForecastSource for ForecastClient {
    fn fetch(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<DailyForecast, FetchError>> + Send {
        self.fetch_daily(coordinates)
    }
}
