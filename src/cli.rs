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

use clap::Parser;

use crate::config::MapStyle;

/// Click anywhere on the map to see the week's weather for that spot.
#[derive(Debug, Parser)]
#[command(name = "weathermap-desktop", version, about)]
pub struct Args {
    /// Latitude to select at startup
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude to select at startup
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Initial zoom level (overrides config)
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Map style (overrides config and WEATHERMAP_MAP_ID)
    #[arg(long, value_enum)]
    pub style: Option<MapStyle>,

    /// Save --lat/--lon as a named place in the config before starting
    #[arg(long, value_name = "NAME", requires_all = ["lat", "lon"])]
    pub save_place: Option<String>,

    /// Print the config file path and exit
    #[arg(long)]
    pub print_config_path: bool,

    /// Overwrite the config file with defaults
    #[arg(long)]
    pub reset_config: bool,
}
