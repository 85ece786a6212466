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

use forecast_client::{CoordinateError, Coordinates};
use walkers::Position;

/// The currently selected map point driving the forecast query.
///
/// Replaced wholesale on every click. Coordinates are not validated here;
/// [`FocusPoint::coordinates`] is the gate in front of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Identifier of the saved place the click landed on, if any
    pub place_id: Option<String>,
}

impl FocusPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            place_id: None,
        }
    }

    #[must_use]
    pub fn with_place(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Validated coordinates for a forecast request
    pub fn coordinates(&self) -> Result<Coordinates, CoordinateError> {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Map position for recentering
    pub fn position(&self) -> Position {
        walkers::lat_lon(self.latitude, self.longitude)
    }
}
