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

use forecast_client::{DailyForecast, DailyRecord};

use crate::focus::FocusPoint;
use crate::forecast::{ForecastPanel, PanelError, PanelState};

pub const HEADER: &str = "Weekly Weather Forecast of the Selected Place";
pub const IDLE_MESSAGE: &str = "Select a place on the map";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching weather data";

const MISSING: &str = "–";
const BAR_WIDTH: f32 = 120.0;

/// What the user asked for from the panel this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Clear,
}

fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1}°C"))
}

/// `min°C ~ max°C`, one decimal
pub fn format_temperature_range(record: &DailyRecord) -> String {
    format!(
        "{} ~ {}",
        celsius(record.min_temperature_c),
        celsius(record.max_temperature_c)
    )
}

pub fn format_precipitation(value: Option<f64>) -> String {
    match value {
        Some(mm) => format!("Precipitation: {mm:.1} mm"),
        None => format!("Precipitation: {MISSING}"),
    }
}

/// One row: `YYYY-MM-DD | min°C ~ max°C | Precipitation: p mm`
pub fn format_row(record: &DailyRecord) -> String {
    format!(
        "{} | {} | {}",
        record.date.format("%Y-%m-%d"),
        format_temperature_range(record),
        format_precipitation(record.precipitation_mm)
    )
}

/// Where a day's min/max sit within the week's span, as fractions of the bar
pub fn range_fraction(record: &DailyRecord, span: (f64, f64)) -> Option<(f32, f32)> {
    let (lo, hi) = span;
    let min = record.min_temperature_c?;
    let max = record.max_temperature_c?;

    let width = hi - lo;
    if width <= f64::EPSILON {
        return Some((0.0, 1.0));
    }

    #[allow(clippy::cast_possible_truncation, reason = "fractions in [0, 1]")]
    let fraction = |t: f64| ((t - lo) / width).clamp(0.0, 1.0) as f32;
    Some((fraction(min), fraction(max)))
}

fn describe_focus(focus: &FocusPoint) -> String {
    format!("{:.4}°, {:.4}°", focus.latitude, focus.longitude)
}

/// Floating window showing the forecast for the focus point
#[derive(Debug)]
pub struct ForecastWindow {
    pub visible: bool,
}

impl Default for ForecastWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastWindow {
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn render(&mut self, ctx: &egui::Context, panel: &ForecastPanel) -> PanelAction {
        let mut action = PanelAction::None;

        if !self.visible {
            egui::Window::new("show_forecast")
                .title_bar(false)
                .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
                .resizable(false)
                .frame(window_frame(ctx))
                .show(ctx, |ui| {
                    if ui.button(egui::RichText::new("🌦 Show Forecast")
                        .color(egui::Color32::from_rgb(40, 90, 140))
                        .size(11.0))
                        .clicked() {
                        self.visible = true;
                    }
                });
            return action;
        }

        egui::Window::new("Forecast")
            .title_bar(false)
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
            .max_width(500.0)
            .resizable(false)
            .collapsible(false)
            .frame(window_frame(ctx))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(HEADER)
                        .color(egui::Color32::from_rgb(30, 30, 30))
                        .size(14.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("✕").size(12.0))
                            .on_hover_text("Hide forecast")
                            .clicked() {
                            self.visible = false;
                        }
                    });
                });

                if let Some(focus) = panel.focus() {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(describe_focus(focus))
                            .color(egui::Color32::from_rgb(90, 90, 90))
                            .size(11.0)
                            .monospace());
                        if let PanelState::Ready(DailyForecast { timezone: Some(tz), .. }) = panel.state() {
                            ui.label(egui::RichText::new(tz)
                                .color(egui::Color32::from_rgb(120, 120, 120))
                                .size(11.0));
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Clear").clicked() {
                                action = PanelAction::Clear;
                            }
                        });
                    });
                }

                ui.separator();

                match panel.state() {
                    PanelState::Idle => {
                        ui.label(egui::RichText::new(IDLE_MESSAGE).color(egui::Color32::GRAY));
                    }
                    PanelState::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading...");
                        });
                    }
                    PanelState::Error(PanelError::Fetch(_)) => {
                        ui.label(egui::RichText::new(FETCH_ERROR_MESSAGE)
                            .color(egui::Color32::from_rgb(200, 50, 50)));
                    }
                    PanelState::Error(e @ PanelError::InvalidCoordinates(_)) => {
                        ui.label(egui::RichText::new(format!("Cannot fetch a forecast here: {e}"))
                            .color(egui::Color32::from_rgb(200, 120, 30)));
                    }
                    PanelState::Ready(forecast) => {
                        render_rows(ui, panel.rows(), forecast.temperature_span());
                    }
                }
            });

        action
    }
}

fn window_frame(ctx: &egui::Context) -> egui::Frame {
    egui::Frame::window(&ctx.style())
        .fill(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 235))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(200, 200, 200)))
        .corner_radius(6.0)
}

fn render_rows(ui: &mut egui::Ui, rows: &[DailyRecord], span: Option<(f64, f64)>) {
    if rows.is_empty() {
        ui.label(egui::RichText::new("No forecast days returned").color(egui::Color32::GRAY));
        return;
    }

    for record in rows {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format_row(record))
                .color(egui::Color32::from_rgb(30, 30, 30))
                .size(12.0)
                .monospace());

            if let Some(fractions) = span.and_then(|span| range_fraction(record, span)) {
                draw_range_bar(ui, fractions);
            }
        });
    }
}

/// Thin bar with the day's min..max painted over the week's span
fn draw_range_bar(ui: &mut egui::Ui, (from, to): (f32, f32)) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(BAR_WIDTH, 6.0), egui::Sense::hover());
    let painter = ui.painter();

    painter.rect_filled(rect, 3.0, egui::Color32::from_rgb(225, 225, 225));

    let filled = egui::Rect::from_min_max(
        egui::pos2(rect.left() + rect.width() * from, rect.top()),
        egui::pos2(rect.left() + rect.width() * to, rect.bottom()),
    );
    painter.rect_filled(filled, 3.0, egui::Color32::from_rgb(240, 140, 60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(min: Option<f64>, max: Option<f64>, precipitation: Option<f64>) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            min_temperature_c: min,
            max_temperature_c: max,
            precipitation_mm: precipitation,
        }
    }

    #[test]
    fn test_row_format() {
        let row = format_row(&record(Some(24.06), Some(31.2), Some(0.0)));
        assert_eq!(row, "2024-06-03 | 24.1°C ~ 31.2°C | Precipitation: 0.0 mm");
    }

    #[test]
    fn test_row_with_missing_values() {
        let row = format_row(&record(None, Some(30.0), None));
        assert_eq!(row, "2024-06-03 | – ~ 30.0°C | Precipitation: –");
    }

    #[test]
    fn test_negative_temperatures() {
        assert_eq!(
            format_temperature_range(&record(Some(-12.34), Some(-3.0), None)),
            "-12.3°C ~ -3.0°C"
        );
    }

    #[test]
    fn test_range_fraction() {
        let (from, to) = range_fraction(&record(Some(15.0), Some(20.0), None), (10.0, 30.0)).unwrap();
        assert!((from - 0.25).abs() < 1e-6);
        assert!((to - 0.5).abs() < 1e-6);

        assert_eq!(range_fraction(&record(Some(20.0), Some(20.0), None), (20.0, 20.0)), Some((0.0, 1.0)));
        assert_eq!(range_fraction(&record(None, Some(20.0), None), (10.0, 30.0)), None);
    }

    #[test]
    fn test_describe_focus() {
        assert_eq!(describe_focus(&FocusPoint::new(25.0243, 121.5359)), "25.0243°, 121.5359°");
    }
}
