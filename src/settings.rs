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

//! Immutable runtime settings.
//!
//! The persisted [`AppConfig`], the environment and the command line are folded
//! into one [`Settings`] value at startup. Both the map view and the forecast
//! panel receive it at construction and never mutate it.

use std::time::Duration;

use forecast_client::ClientConfig;
use log::warn;
use walkers::Position;

use crate::cli::Args;
use crate::config::{self, AppConfig, MapStyle, SavedPlace};
use crate::focus::FocusPoint;

/// Values read from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub tile_api_key: Option<String>,
    pub map_id: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            tile_api_key: std::env::var(config::TILE_API_KEY_ENV).ok(),
            map_id: std::env::var(config::MAP_ID_ENV).ok(),
        }
    }
}

/// Map view settings
#[derive(Debug, Clone)]
pub struct MapSettings {
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_zoom: f64,
    pub style: MapStyle,
    pub custom_tile_url: Option<String>,
    pub tile_api_key: Option<String>,
    pub show_zoom_controls: bool,
    pub show_saved_places: bool,
    pub saved_places: Vec<SavedPlace>,
}

impl MapSettings {
    /// Center the map returns to when nothing is selected
    pub fn default_center(&self) -> Position {
        walkers::lat_lon(self.default_latitude, self.default_longitude)
    }
}

/// Forecast fetch settings
#[derive(Debug, Clone)]
pub struct ForecastSettings {
    pub endpoint: String,
    pub timeout: Duration,
}

impl ForecastSettings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub map: MapSettings,
    pub forecast: ForecastSettings,
    /// Point to select as soon as the window opens (`--lat`/`--lon`)
    pub initial_focus: Option<FocusPoint>,
}

impl Settings {
    /// Fold config, environment and CLI together.
    ///
    /// Precedence for the map style is CLI, then `WEATHERMAP_MAP_ID`, then
    /// config. The tile API key comes from the environment before config.
    pub fn resolve(config: &AppConfig, args: &Args, env: &EnvOverrides) -> Self {
        let env_style = env.map_id.as_deref().filter(|id| !id.trim().is_empty()).and_then(|id| {
            let style = MapStyle::from_id(id);
            if style.is_none() {
                warn!("Ignoring unknown map style '{}' from {}", id, config::MAP_ID_ENV);
            }
            style
        });

        let style = args.style.or(env_style).unwrap_or(config.map_style);

        let map = MapSettings {
            default_latitude: config.default_latitude,
            default_longitude: config.default_longitude,
            default_zoom: f64::from(args.zoom.unwrap_or(config.default_zoom)),
            style,
            custom_tile_url: config.custom_tile_url.clone(),
            tile_api_key: config::resolve_credential(
                env.tile_api_key.as_deref(),
                config.tile_api_key.as_deref(),
            ),
            show_zoom_controls: config.show_zoom_controls,
            show_saved_places: config.show_saved_places,
            saved_places: config.saved_places.clone(),
        };

        let forecast = ForecastSettings {
            endpoint: config.forecast_endpoint.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
        };

        let initial_focus = match (args.lat, args.lon) {
            (Some(lat), Some(lon)) => Some(FocusPoint::new(lat, lon)),
            _ => None,
        };

        Self {
            map,
            forecast,
            initial_focus,
        }
    }
}
