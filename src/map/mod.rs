//! Interactive map view.
//!
//! This module wraps the `walkers` slippy map: tile source selection,
//! click capture, place markers, and recentering on the selected point.

pub mod click_plugin;
pub mod tile_source;
pub mod view;

use thiserror::Error;

pub use view::{MapEvent, MapView};

/// Reasons the map widget can fail to initialize.
///
/// Terminal for the session: the map stays non-interactive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapLoadError {
    #[error("tile URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),

    #[error("tile URL is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("tile URL needs an API key; set WEATHERMAP_TILE_API_KEY or tile_api_key in the config")]
    MissingApiKey,

    #[error("map style is 'custom' but no custom_tile_url is configured")]
    MissingCustomUrl,
}
