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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers the default map view, the tile provider and its credentials,
//! saved places, and the forecast endpoint.

use forecast_client::{CoordinateError, Coordinates};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used for the config directory and the tile cache directory
pub const APP_NAME: &str = "weathermap-desktop";

/// Environment variable holding the tile provider API key (takes precedence over config)
pub const TILE_API_KEY_ENV: &str = "WEATHERMAP_TILE_API_KEY";

/// Environment variable holding the map style identifier (takes precedence over config)
pub const MAP_ID_ENV: &str = "WEATHERMAP_MAP_ID";

/// Default map center (National Taiwan University, Taipei)
pub const DEFAULT_LATITUDE: f64 = 25.024_344_936_136_32;
pub const DEFAULT_LONGITUDE: f64 = 121.535_920_519_501_27;

/// Default street-level zoom
pub const DEFAULT_ZOOM: f32 = 16.0;

/// Map style / tile provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    /// Carto dark basemap
    #[default]
    CartoDark,
    /// Carto light basemap
    CartoLight,
    /// OpenStreetMap standard tiles
    OpenStreetMap,
    /// User-supplied tile URL template (`custom_tile_url`)
    Custom,
}

impl MapStyle {
    /// Identifier used in config files and `WEATHERMAP_MAP_ID`
    pub fn as_str(&self) -> &'static str {
        match self {
            MapStyle::CartoDark => "carto_dark",
            MapStyle::CartoLight => "carto_light",
            MapStyle::OpenStreetMap => "open_street_map",
            MapStyle::Custom => "custom",
        }
    }

    /// Parse a style identifier (case-insensitive, `-` and `_` interchangeable)
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "carto_dark" => Some(MapStyle::CartoDark),
            "carto_light" => Some(MapStyle::CartoLight),
            "open_street_map" | "osm" => Some(MapStyle::OpenStreetMap),
            "custom" => Some(MapStyle::Custom),
            _ => None,
        }
    }
}

/// A named location shown as a marker on the map
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SavedPlace {
    /// Unique identifier (stable across renames), used as the place identifier
    pub id: String,

    /// User-friendly display name
    pub name: String,

    pub latitude: f64,
    pub longitude: f64,
}

impl SavedPlace {
    /// Create a new saved place with a generated UUID
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            latitude,
            longitude,
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Map center used at startup and whenever the selection is cleared
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f32,

    /// Tile provider ("carto_dark", "carto_light", "open_street_map", "custom")
    #[serde(default)]
    pub map_style: MapStyle,

    /// Tile URL template for the custom style, e.g.
    /// `https://tiles.example.com/{z}/{x}/{y}.png?key={api_key}`
    #[serde(default)]
    pub custom_tile_url: Option<String>,

    /// Tile provider API key (optional, env var takes precedence)
    #[serde(default)]
    pub tile_api_key: Option<String>,

    /// Show +/- zoom buttons on the map
    #[serde(default)]
    pub show_zoom_controls: bool,

    /// Draw saved places on the map
    #[serde(default = "default_true")]
    pub show_saved_places: bool,

    #[serde(default)]
    pub saved_places: Vec<SavedPlace>,

    /// Open-Meteo compatible forecast endpoint
    #[serde(default = "default_forecast_endpoint")]
    pub forecast_endpoint: String,

    /// Forecast request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_zoom() -> f32 {
    DEFAULT_ZOOM
}

fn default_true() -> bool {
    true
}

fn default_forecast_endpoint() -> String {
    forecast_client::DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
            default_zoom: DEFAULT_ZOOM,
            map_style: MapStyle::default(),
            custom_tile_url: None,
            tile_api_key: None,
            show_zoom_controls: false,
            show_saved_places: true,
            saved_places: Vec::new(),
            forecast_endpoint: default_forecast_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk (creates a default file on first run)
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, "config", self)
    }

    /// Add a named place, rejecting coordinates that could never be fetched
    pub fn add_place(&mut self, name: String, latitude: f64, longitude: f64) -> Result<&SavedPlace, CoordinateError> {
        let coordinates = Coordinates::new(latitude, longitude)?;
        self.saved_places
            .push(SavedPlace::new(name, coordinates.latitude(), coordinates.longitude()));
        Ok(&self.saved_places[self.saved_places.len() - 1])
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }
}

/// Pick the effective credential: a non-empty environment value wins over config.
pub fn resolve_credential(env_value: Option<&str>, config_value: Option<&str>) -> Option<String> {
    let non_empty = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };
    non_empty(env_value).or_else(|| non_empty(config_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.map_style, MapStyle::CartoDark);
        assert!((config.default_latitude - 25.024_344).abs() < 1e-5);
        assert!((config.default_longitude - 121.535_92).abs() < 1e-5);
        assert!((config.default_zoom - 16.0).abs() < f32::EPSILON);
        assert!(!config.show_zoom_controls);
        assert!(config.show_saved_places);
        assert_eq!(config.forecast_endpoint, "https://api.open-meteo.com/v1/forecast");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "map_style": "open_street_map",
                "default_zoom": 12.0,
                "saved_places": [
                    {"id": "home", "name": "Home", "latitude": 25.03, "longitude": 121.56}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.map_style, MapStyle::OpenStreetMap);
        assert!((config.default_zoom - 12.0).abs() < f32::EPSILON);
        assert!((config.default_latitude - DEFAULT_LATITUDE).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout_secs, 15);
        assert!(config.show_saved_places);
        assert_eq!(config.saved_places.len(), 1);
        assert_eq!(config.saved_places[0].id, "home");
    }

    #[test]
    fn test_map_style_ids() {
        for style in [
            MapStyle::CartoDark,
            MapStyle::CartoLight,
            MapStyle::OpenStreetMap,
            MapStyle::Custom,
        ] {
            assert_eq!(MapStyle::from_id(style.as_str()), Some(style));
        }
        assert_eq!(MapStyle::from_id("OSM"), Some(MapStyle::OpenStreetMap));
        assert_eq!(MapStyle::from_id("carto-light"), Some(MapStyle::CartoLight));
        assert_eq!(MapStyle::from_id("satellite"), None);
    }

    #[test]
    fn test_saved_place_ids_are_unique() {
        let a = SavedPlace::new("A".to_string(), 0.0, 0.0);
        let b = SavedPlace::new("B".to_string(), 0.0, 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_resolve_credential_precedence() {
        assert_eq!(
            resolve_credential(Some("from-env"), Some("from-config")),
            Some("from-env".to_string())
        );
        assert_eq!(
            resolve_credential(None, Some("from-config")),
            Some("from-config".to_string())
        );
        assert_eq!(
            resolve_credential(Some(""), Some("from-config")),
            Some("from-config".to_string())
        );
        assert_eq!(resolve_credential(Some("  "), None), None);
        assert_eq!(resolve_credential(None, None), None);
    }

    #[test]
    fn test_add_place_validates_coordinates() {
        let mut config = AppConfig::default();

        let place = config.add_place("Home".to_string(), 25.03, 121.56).unwrap();
        assert_eq!(place.name, "Home");
        assert!(!place.id.is_empty());

        assert_eq!(
            config.add_place("Nowhere".to_string(), 200.0, 0.0).unwrap_err(),
            CoordinateError::Latitude(200.0)
        );
        assert!(config.add_place("Offscale".to_string(), 0.0, -181.0).is_err());
        assert_eq!(config.saved_places.len(), 1);
    }
}
