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

//! Map view component.
//!
//! Owns the map memory (center/zoom), the tile fetcher and the current focus
//! point. The tile fetcher is acquired lazily on the first frame; if that
//! fails the map stays non-interactive for the rest of the session.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Tiles};

use super::click_plugin::{ClickCapturePlugin, MapClick, PlaceMarker};
use super::tile_source::StyleTileSource;
use super::MapLoadError;
use crate::config::APP_NAME;
use crate::focus::FocusPoint;
use crate::settings::{MapSettings, Settings};

/// Something the user did on the map this frame
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Clicked(FocusPoint),
}

enum Widget {
    Unloaded,
    Ready(HttpTiles),
    Failed(MapLoadError),
}

pub struct MapView {
    settings: Arc<Settings>,
    memory: MapMemory,
    widget: Widget,
    focus: Option<FocusPoint>,
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("focus", &self.focus)
            .field("interactive", &self.is_interactive())
            .finish_non_exhaustive()
    }
}

impl MapView {
    pub fn new(settings: Arc<Settings>) -> Self {
        let mut memory = MapMemory::default();
        memory.center_at(settings.map.default_center());
        if memory.set_zoom(settings.map.default_zoom).is_err() {
            warn!("Zoom level {} is out of range, using the map default", settings.map.default_zoom);
        }

        Self {
            settings,
            memory,
            widget: Widget::Unloaded,
            focus: None,
        }
    }

    /// Build the tile source for the configured style.
    pub fn tile_source(settings: &MapSettings) -> Result<StyleTileSource, MapLoadError> {
        StyleTileSource::from_settings(settings)
    }

    /// Acquire the tile fetcher on first use. Never retried after a failure.
    fn ensure_loaded(&mut self, ctx: &egui::Context) {
        if !matches!(self.widget, Widget::Unloaded) {
            return;
        }

        self.widget = match Self::tile_source(&self.settings.map) {
            Ok(source) => {
                info!("Loading map tiles ({})", source.style().as_str());
                let http_options = HttpOptions {
                    cache: tile_cache_dir(&source),
                    ..Default::default()
                };
                Widget::Ready(HttpTiles::with_options(source, http_options, ctx.clone()))
            }
            Err(e) => {
                error!("Error loading map: {}", e);
                Widget::Failed(e)
            }
        };
    }

    /// Replace the focus point and recenter.
    ///
    /// `None` resets the view to the default center.
    pub fn set_focus(&mut self, focus: Option<FocusPoint>) {
        match &focus {
            Some(point) => self.memory.center_at(point.position()),
            None => self.memory.center_at(self.settings.map.default_center()),
        }
        self.focus = focus;
    }

    pub fn focus(&self) -> Option<&FocusPoint> {
        self.focus.as_ref()
    }

    /// Whether clicks are being captured
    pub fn is_interactive(&self) -> bool {
        matches!(self.widget, Widget::Ready(_))
    }

    pub fn load_error(&self) -> Option<&MapLoadError> {
        match &self.widget {
            Widget::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Draw the map filling the available space.
    ///
    /// Returns the click (if any) resolved to a focus point. The caller
    /// decides what to do with it; the view recenters once
    /// [`MapView::set_focus`] is called.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<MapEvent> {
        self.ensure_loaded(ui.ctx());

        let map_rect = ui.available_rect_before_wrap();

        if let Some(e) = self.load_error() {
            draw_load_error(ui, map_rect, e);
            return None;
        }
        let Widget::Ready(tiles) = &mut self.widget else {
            return None;
        };

        let markers: Vec<PlaceMarker> = if self.settings.map.show_saved_places {
            self.settings.map.saved_places.iter().map(PlaceMarker::from).collect()
        } else {
            Vec::new()
        };

        let clicked = Arc::new(Mutex::new(None::<MapClick>));
        let plugin = ClickCapturePlugin::new(Arc::clone(&clicked), map_rect)
            .with_markers(markers)
            .with_focus(self.focus.as_ref().map(FocusPoint::position));

        let attribution = tiles.attribution();
        let my_position = self.settings.map.default_center();
        ui.add(Map::new(Some(tiles), &mut self.memory, my_position).with_plugin(plugin));

        if self.settings.map.show_zoom_controls {
            self.draw_zoom_controls(ui, map_rect);
        }
        draw_attribution(ui, map_rect, attribution.text, attribution.url);

        let click = clicked.lock().ok().and_then(|mut slot| slot.take());
        click.map(|click| MapEvent::Clicked(click.into_focus_point()))
    }

    fn draw_zoom_controls(&mut self, ui: &mut egui::Ui, map_rect: egui::Rect) {
        egui::Area::new(egui::Id::new("map_zoom_controls"))
            .fixed_pos(map_rect.right_top() + egui::vec2(-44.0, 10.0))
            .show(ui.ctx(), |ui| {
                ui.vertical(|ui| {
                    if ui.button(egui::RichText::new("➕").size(14.0)).clicked() {
                        if let Err(e) = self.memory.zoom_in() {
                            debug!("Zoom in ignored: {:?}", e);
                        }
                    }
                    if ui.button(egui::RichText::new("➖").size(14.0)).clicked() {
                        if let Err(e) = self.memory.zoom_out() {
                            debug!("Zoom out ignored: {:?}", e);
                        }
                    }
                });
            });
    }
}

/// Per-style tile cache directory, or `None` if it cannot be created
fn tile_cache_dir(source: &StyleTileSource) -> Option<PathBuf> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(APP_NAME)
        .join("tiles")
        .join(source.style().as_str());

    match std::fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            warn!("Tile cache disabled, cannot create {}: {}", dir.display(), e);
            None
        }
    }
}

fn draw_attribution(ui: &mut egui::Ui, map_rect: egui::Rect, text: &str, url: &str) {
    let painter = ui.painter();
    let font = egui::FontId::proportional(10.0);
    let galley = painter.layout_no_wrap(text.to_string(), font, egui::Color32::from_black_alpha(200));

    let padding = egui::vec2(4.0, 2.0);
    let rect = egui::Rect::from_min_size(
        map_rect.right_bottom() - galley.size() - padding * 2.0 - egui::vec2(6.0, 6.0),
        galley.size() + padding * 2.0,
    );
    painter.rect_filled(rect, 2.0, egui::Color32::from_white_alpha(180));
    painter.galley(rect.min + padding, galley, egui::Color32::BLACK);

    if url.is_empty() {
        return;
    }

    let response = ui
        .interact(rect, egui::Id::new("map_attribution"), egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        if let Err(e) = webbrowser::open(url) {
            warn!("Failed to open {}: {}", url, e);
        }
    }
}

fn draw_load_error(ui: &mut egui::Ui, rect: egui::Rect, error: &MapLoadError) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(40, 44, 52));

    // Error bubble in the middle of the (non-interactive) map area
    let message = format!("Map unavailable: {error}");
    let galley = painter.layout_no_wrap(message, egui::FontId::proportional(13.0), egui::Color32::WHITE);
    let padding = egui::vec2(12.0, 6.0);
    let bubble = egui::Rect::from_center_size(rect.center(), galley.size() + padding * 2.0);

    painter.rect_filled(bubble, 5.0, egui::Color32::from_rgb(220, 50, 50));
    painter.galley(bubble.min + padding, galley, egui::Color32::WHITE);
}
