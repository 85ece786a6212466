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

//! Tile source built from the configured map style.

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

use super::MapLoadError;
use crate::config::MapStyle;
use crate::settings::MapSettings;

const CARTO_ATTRIBUTION: &str = "© OpenStreetMap contributors, © CARTO";
const CARTO_ATTRIBUTION_URL: &str = "https://carto.com/attributions";
const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const OSM_ATTRIBUTION_URL: &str = "https://www.openstreetmap.org/copyright";

impl MapStyle {
    /// Built-in URL template, `None` for the custom style
    pub fn builtin_template(&self) -> Option<&'static str> {
        match self {
            MapStyle::CartoDark => Some("https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png"),
            MapStyle::CartoLight => Some("https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png"),
            MapStyle::OpenStreetMap => Some("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            MapStyle::Custom => None,
        }
    }

    fn attribution(&self) -> Attribution {
        let (text, url) = match self {
            MapStyle::CartoDark | MapStyle::CartoLight => (CARTO_ATTRIBUTION, CARTO_ATTRIBUTION_URL),
            MapStyle::OpenStreetMap => (OSM_ATTRIBUTION, OSM_ATTRIBUTION_URL),
            MapStyle::Custom => ("Custom tiles", ""),
        };
        Attribution {
            text,
            url,
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// Tile source for any `{z}/{x}/{y}` template.
///
/// `{s}` is replaced with a Carto-style subdomain (a-d) picked from the tile
/// coordinates, and `{api_key}` is substituted once at construction.
#[derive(Debug, Clone)]
pub struct StyleTileSource {
    style: MapStyle,
    template: String,
}

impl StyleTileSource {
    /// Validate the template for the configured style.
    pub fn from_settings(settings: &MapSettings) -> Result<Self, MapLoadError> {
        let template = match settings.style.builtin_template() {
            Some(template) => template.to_string(),
            None => settings
                .custom_tile_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .ok_or(MapLoadError::MissingCustomUrl)?,
        };

        Self::new(settings.style, &template, settings.tile_api_key.as_deref())
    }

    pub fn new(style: MapStyle, template: &str, api_key: Option<&str>) -> Result<Self, MapLoadError> {
        let template = template.trim();

        if !(template.starts_with("https://") || template.starts_with("http://")) {
            return Err(MapLoadError::UnsupportedScheme(template.to_string()));
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !template.contains(placeholder) {
                return Err(MapLoadError::MissingPlaceholder(placeholder));
            }
        }

        let template = if template.contains("{api_key}") {
            let key = api_key.ok_or(MapLoadError::MissingApiKey)?;
            template.replace("{api_key}", key)
        } else {
            template.to_string()
        };

        Ok(Self { style, template })
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }
}

impl TileSource for StyleTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Subdomain load balancing (a, b, c, d) based on tile coordinates
        let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];

        self.template
            .replace("{s}", &subdomain.to_string())
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        self.style.attribution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: u32, y: u32, zoom: u8) -> TileId {
        TileId { x, y, zoom }
    }

    #[test]
    fn test_carto_subdomains() {
        let source = StyleTileSource::new(
            MapStyle::CartoDark,
            MapStyle::CartoDark.builtin_template().unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(
            source.tile_url(tile(0, 0, 3)),
            "https://a.basemaps.cartocdn.com/dark_all/3/0/0.png"
        );
        assert_eq!(
            source.tile_url(tile(2, 1, 3)),
            "https://d.basemaps.cartocdn.com/dark_all/3/2/1.png"
        );
    }

    #[test]
    fn test_osm_template() {
        let source = StyleTileSource::new(
            MapStyle::OpenStreetMap,
            MapStyle::OpenStreetMap.builtin_template().unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(
            source.tile_url(tile(13_703, 7_013, 14)),
            "https://tile.openstreetmap.org/14/13703/7013.png"
        );
        assert_eq!(source.attribution().text, "© OpenStreetMap contributors");
    }

    #[test]
    fn test_api_key_substitution() {
        let source = StyleTileSource::new(
            MapStyle::Custom,
            "https://tiles.example.com/{z}/{x}/{y}.png?key={api_key}",
            Some("secret"),
        )
        .unwrap();
        assert_eq!(
            source.tile_url(tile(1, 2, 3)),
            "https://tiles.example.com/3/1/2.png?key=secret"
        );
    }

    #[test]
    fn test_api_key_required_when_referenced() {
        let err = StyleTileSource::new(
            MapStyle::Custom,
            "https://tiles.example.com/{z}/{x}/{y}.png?key={api_key}",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MapLoadError::MissingApiKey));
    }

    #[test]
    fn test_invalid_templates() {
        assert!(matches!(
            StyleTileSource::new(MapStyle::Custom, "ftp://tiles/{z}/{x}/{y}", None),
            Err(MapLoadError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            StyleTileSource::new(MapStyle::Custom, "https://tiles/{z}/{x}.png", None),
            Err(MapLoadError::MissingPlaceholder("{y}"))
        ));
    }
}
