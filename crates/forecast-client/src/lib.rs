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

//! Daily weather forecast client for map-driven lookups.
//!
//! This library covers everything between "the user picked a point" and
//! "here are the rows to show", with no UI dependencies:
//!
//! - **Coordinates**: validated latitude/longitude pairs. The HTTP client only
//!   accepts [`Coordinates`], so out-of-range values never reach the network.
//! - **Daily model**: [`DailyForecast`] decoded from Open-Meteo's parallel
//!   arrays, one [`DailyRecord`] per date.
//! - **Client**: [`ForecastClient`], a single GET per lookup with no retry.
//!
//! # Quick Start
//!
//! ```no_run
//! use forecast_client::{ClientConfig, Coordinates, ForecastClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ForecastClient::new(ClientConfig::default())?;
//!     let taipei = Coordinates::new(25.0, 121.5)?;
//!
//!     let forecast = client.fetch_daily(taipei).await?;
//!     for day in &forecast {
//!         println!("{} {:?} ~ {:?}", day.date, day.min_temperature_c, day.max_temperature_c);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod coords;
pub mod daily;

use thiserror::Error;

pub use client::{ClientConfig, DailyForecastSource, ForecastClient, DEFAULT_ENDPOINT};
pub use coords::{clamp_latitude, wrap_longitude, CoordinateError, Coordinates};
pub use daily::{DailyForecast, DailyMetric, DailyRecord};

/// Errors that can occur while fetching a forecast.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("could not decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed forecast response: {0}")]
    Malformed(String),
}
