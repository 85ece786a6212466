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

//! Map plugin that draws place markers and the focus pin, and turns a click
//! into geographic coordinates.

use std::sync::{Arc, Mutex};

use egui::{Color32, Pos2, Stroke};
use forecast_client::{clamp_latitude, wrap_longitude};
use walkers::{MapMemory, Plugin, Position, Projector};

use crate::config::SavedPlace;
use crate::focus::FocusPoint;

/// Clicks closer than this (in points) to a place marker select the place
pub const PLACE_HIT_RADIUS: f32 = 12.0;

const PLACE_RADIUS: f32 = 5.0;
const FOCUS_RADIUS: f32 = 7.0;

/// A click resolved to geographic coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    pub latitude: f64,
    pub longitude: f64,
    pub place_id: Option<String>,
}

impl MapClick {
    /// Click on empty map. The map can be panned across the antimeridian, so
    /// longitude is wrapped back into range.
    pub fn at(position: Position) -> Self {
        Self {
            latitude: clamp_latitude(position.y()),
            longitude: wrap_longitude(position.x()),
            place_id: None,
        }
    }

    /// Click on a place marker snaps to the place
    pub fn on_place(place: &PlaceMarker) -> Self {
        Self {
            latitude: place.position.y(),
            longitude: place.position.x(),
            place_id: Some(place.id.clone()),
        }
    }

    pub fn into_focus_point(self) -> FocusPoint {
        let point = FocusPoint::new(self.latitude, self.longitude);
        match self.place_id {
            Some(id) => point.with_place(id),
            None => point,
        }
    }
}

/// A saved place as drawn on the map
#[derive(Debug, Clone)]
pub struct PlaceMarker {
    pub id: String,
    pub name: String,
    pub position: Position,
}

impl From<&SavedPlace> for PlaceMarker {
    fn from(place: &SavedPlace) -> Self {
        Self {
            id: place.id.clone(),
            name: place.name.clone(),
            position: walkers::lat_lon(place.latitude, place.longitude),
        }
    }
}

/// Closest marker within `radius` of the pointer (magnetic selection)
pub fn nearest_marker<'a>(
    markers: impl IntoIterator<Item = (&'a PlaceMarker, Pos2)>,
    pointer: Pos2,
    radius: f32,
) -> Option<&'a PlaceMarker> {
    markers
        .into_iter()
        .map(|(marker, pos)| (marker, pos.distance(pointer)))
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(marker, _)| marker)
}

/// Plugin that renders markers and reports the click (if any) for this frame.
///
/// walkers consumes plugins by value each frame, so the click is handed back
/// through a shared slot.
#[derive(Debug)]
pub struct ClickCapturePlugin {
    markers: Vec<PlaceMarker>,
    focus: Option<Position>,
    clicked: Arc<Mutex<Option<MapClick>>>,
    map_rect: egui::Rect,
}

impl ClickCapturePlugin {
    pub fn new(clicked: Arc<Mutex<Option<MapClick>>>, map_rect: egui::Rect) -> Self {
        Self {
            markers: Vec::new(),
            focus: None,
            clicked,
            map_rect,
        }
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Vec<PlaceMarker>) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_focus(mut self, focus: Option<Position>) -> Self {
        self.focus = focus;
        self
    }
}

impl Plugin for ClickCapturePlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter().with_clip_rect(self.map_rect);

        let projected: Vec<(&PlaceMarker, Pos2)> = self
            .markers
            .iter()
            .map(|marker| {
                let screen = projector.project(marker.position);
                (marker, egui::pos2(screen.x, screen.y))
            })
            .collect();

        for (marker, pos) in &projected {
            if !self.map_rect.expand(PLACE_RADIUS).contains(*pos) {
                continue;
            }
            draw_place(&painter, *pos, &marker.name);
        }

        if let Some(focus) = self.focus {
            let screen = projector.project(focus);
            draw_focus_pin(&painter, egui::pos2(screen.x, screen.y));
        }

        // Drags pan the map; only a plain click selects a point
        if !response.clicked() {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };

        let click = match nearest_marker(projected.iter().copied(), pointer, PLACE_HIT_RADIUS) {
            Some(marker) => MapClick::on_place(marker),
            None => MapClick::at(projector.unproject(pointer.to_vec2())),
        };

        if let Ok(mut slot) = self.clicked.lock() {
            *slot = Some(click);
        }
    }
}

fn draw_place(painter: &egui::Painter, pos: Pos2, name: &str) {
    painter.circle_filled(pos, PLACE_RADIUS, Color32::from_rgb(100, 180, 220));
    painter.circle_stroke(pos, PLACE_RADIUS, Stroke::new(1.5, Color32::WHITE));

    let text_pos = pos + egui::vec2(9.0, 0.0);
    let font = egui::FontId::proportional(11.0);
    let galley = painter.layout_no_wrap(name.to_string(), font.clone(), Color32::WHITE);

    // Background box behind the label
    let padding = egui::vec2(3.0, 2.0);
    let box_rect = egui::Rect::from_min_size(
        text_pos - egui::vec2(padding.x, galley.size().y / 2.0 + padding.y),
        galley.size() + padding * 2.0,
    );
    painter.rect_filled(box_rect, 2.0, Color32::from_rgba_unmultiplied(0, 0, 0, 180));
    painter.text(text_pos, egui::Align2::LEFT_CENTER, name, font, Color32::WHITE);
}

fn draw_focus_pin(painter: &egui::Painter, pos: Pos2) {
    let head = pos - egui::vec2(0.0, 14.0);
    painter.line_segment([pos, head], Stroke::new(2.0, Color32::from_rgb(180, 30, 30)));
    painter.circle_filled(head, FOCUS_RADIUS, Color32::from_rgb(220, 50, 50));
    painter.circle_stroke(head, FOCUS_RADIUS, Stroke::new(2.0, Color32::WHITE));
    painter.circle_filled(pos, 2.0, Color32::from_rgb(180, 30, 30));
}
