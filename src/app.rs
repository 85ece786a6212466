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

use std::sync::Arc;

use forecast_client::DailyForecastSource;
use log::info;

use crate::focus::FocusPoint;
use crate::forecast::{ForecastPanel, ForecastWorker};
use crate::map::{MapEvent, MapView};
use crate::settings::Settings;
use crate::ui::{ForecastWindow, PanelAction};

/// Top-level application: map on the whole window, forecast floating on top
pub struct WeatherMapApp<S> {
    map: MapView,
    panel: ForecastPanel,
    worker: ForecastWorker<S>,
    window: ForecastWindow,
}

impl<S> std::fmt::Debug for WeatherMapApp<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherMapApp")
            .field("map", &self.map)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}

impl<S: DailyForecastSource> WeatherMapApp<S> {
    pub fn new(settings: Arc<Settings>, worker: ForecastWorker<S>) -> Self {
        let initial_focus = settings.initial_focus.clone();

        let mut app = Self {
            map: MapView::new(settings),
            panel: ForecastPanel::new(),
            worker,
            window: ForecastWindow::new(),
        };

        if let Some(focus) = initial_focus {
            app.select(focus);
        }
        app
    }

    /// New focus point: recenter the map and fetch its forecast
    pub fn select(&mut self, focus: FocusPoint) {
        self.map.set_focus(Some(focus.clone()));
        match self.panel.select(focus) {
            Ok(request) => self.worker.request(request),
            Err(_) => self.worker.cancel(),
        }
    }

    /// Drop the selection and return to the default view
    pub fn clear_focus(&mut self) {
        info!("Selection cleared");
        self.worker.cancel();
        self.map.set_focus(None);
        self.panel.clear();
    }

    /// Feed settled fetches into the panel
    fn apply_outcomes(&mut self) {
        for outcome in self.worker.poll() {
            self.panel.complete(&outcome.ticket, outcome.result);
        }
    }
}

impl<S: DailyForecastSource> eframe::App for WeatherMapApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_outcomes();

        let event = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.map.show(ui))
            .inner;

        if let Some(MapEvent::Clicked(focus)) = event {
            self.select(focus);
        }

        let action = self.window.render(ctx, &self.panel);
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if action == PanelAction::Clear || (escape && self.panel.focus().is_some()) {
            self.clear_focus();
        }

        // Keep the spinner moving until the fetch settles
        if self.panel.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
