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

//! Forecast panel state machine.
//!
//! ```text
//! Idle ──select──▶ Loading ──complete(ok)──▶ Ready
//!   ▲                 │ ▲                      │
//!   │                 │ └──────select──────────┤
//!   │                 └────complete(err)──▶ Error
//!   └──────────────────clear──────────────────┘
//! ```
//!
//! Every selection issues a fresh [`FetchTicket`]. Only the outcome carrying
//! the current ticket is applied; anything older is dropped.

use forecast_client::{CoordinateError, Coordinates, DailyForecast, DailyRecord, FetchError};
use log::{debug, info, warn};
use thiserror::Error;

use crate::focus::FocusPoint;

/// Identifies one fetch: a generation number plus the point that started it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    focus: FocusPoint,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn focus(&self) -> &FocusPoint {
        &self.focus
    }
}

/// A validated fetch the caller should hand to the worker
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub coordinates: Coordinates,
}

/// What the panel shows instead of data rows
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(CoordinateError),

    #[error("{0}")]
    Fetch(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Loading,
    Ready(DailyForecast),
    Error(PanelError),
}

#[derive(Debug, Default)]
pub struct ForecastPanel {
    state: PanelState,
    focus: Option<FocusPoint>,
    current: Option<FetchTicket>,
    next_generation: u64,
}

impl ForecastPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for a new point.
    ///
    /// Out-of-range coordinates go straight to `Error` and no ticket is
    /// issued, so nothing reaches the network. Either way any previous data
    /// and any outstanding ticket are dropped.
    pub fn select(&mut self, focus: FocusPoint) -> Result<FetchRequest, CoordinateError> {
        self.focus = Some(focus.clone());
        self.next_generation += 1;

        let coordinates = match focus.coordinates() {
            Ok(coordinates) => coordinates,
            Err(e) => {
                warn!("Not fetching forecast: {}", e);
                self.current = None;
                self.state = PanelState::Error(PanelError::InvalidCoordinates(e));
                return Err(e);
            }
        };

        let ticket = FetchTicket {
            generation: self.next_generation,
            focus,
        };
        info!("Fetching forecast for {} (#{})", coordinates, ticket.generation);

        self.current = Some(ticket.clone());
        self.state = PanelState::Loading;

        Ok(FetchRequest { ticket, coordinates })
    }

    /// Forget the selection and go back to `Idle`
    pub fn clear(&mut self) {
        self.focus = None;
        self.current = None;
        self.state = PanelState::Idle;
    }

    /// Apply a settled fetch.
    ///
    /// Returns `false` (and changes nothing) when the ticket is not the one
    /// currently awaited.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<DailyForecast, FetchError>) -> bool {
        if self.current.as_ref() != Some(ticket) {
            debug!("Discarding stale forecast response (#{})", ticket.generation);
            return false;
        }
        self.current = None;

        self.state = match result {
            Ok(forecast) => {
                let focus = ticket.focus();
                info!(
                    "Forecast ready for {:.4}, {:.4}: {} days",
                    focus.latitude,
                    focus.longitude,
                    forecast.len()
                );
                PanelState::Ready(forecast)
            }
            Err(e) => {
                warn!("Error fetching weather data: {}", e);
                PanelState::Error(PanelError::Fetch(e.to_string()))
            }
        };
        true
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn focus(&self) -> Option<&FocusPoint> {
        self.focus.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PanelState::Loading)
    }

    /// Rows to render, empty unless `Ready`
    pub fn rows(&self) -> &[DailyRecord] {
        match &self.state {
            PanelState::Ready(forecast) => &forecast.records,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week() -> DailyForecast {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let records = (0..7)
            .map(|i| DailyRecord {
                date: start + chrono::Days::new(i),
                min_temperature_c: Some(20.0 + i as f64),
                max_temperature_c: Some(30.0 + i as f64),
                precipitation_mm: Some(i as f64 * 0.5),
            })
            .collect();
        DailyForecast {
            timezone: Some("Asia/Taipei".to_string()),
            records,
        }
    }

    #[test]
    fn test_select_from_idle_goes_to_loading() {
        let mut panel = ForecastPanel::new();
        assert_eq!(panel.state(), &PanelState::Idle);

        let request = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        assert!(panel.is_loading());
        assert!((request.coordinates.latitude() - 25.0).abs() < f64::EPSILON);
        assert!((request.coordinates.longitude() - 121.5).abs() < f64::EPSILON);
        assert_eq!(request.ticket.focus(), &FocusPoint::new(25.0, 121.5));
    }

    #[test]
    fn test_invalid_coordinates_never_issue_a_ticket() {
        let mut panel = ForecastPanel::new();

        for (lat, lon) in [(90.5, 0.0), (-91.0, 10.0), (10.0, 180.1), (0.0, f64::NAN)] {
            assert!(panel.select(FocusPoint::new(lat, lon)).is_err());
            assert!(matches!(
                panel.state(),
                PanelState::Error(PanelError::InvalidCoordinates(_))
            ));
        }
    }

    #[test]
    fn test_boundary_coordinates_are_fetched() {
        let mut panel = ForecastPanel::new();
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert!(panel.select(FocusPoint::new(lat, lon)).is_ok());
        }
    }

    #[test]
    fn test_seven_days_render_in_order() {
        let mut panel = ForecastPanel::new();
        let request = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();

        assert!(panel.complete(&request.ticket, Ok(week())));
        let rows = panel.rows();
        assert_eq!(rows.len(), 7);
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(rows[3].min_temperature_c, Some(23.0));
        assert_eq!(rows[3].max_temperature_c, Some(33.0));
        assert_eq!(rows[3].precipitation_mm, Some(1.5));
    }

    #[test]
    fn test_fetch_error_clears_data() {
        let mut panel = ForecastPanel::new();
        let first = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        panel.complete(&first.ticket, Ok(week()));

        let second = panel.select(FocusPoint::new(35.0, 139.0)).unwrap();
        assert!(panel.rows().is_empty());

        let err = FetchError::Malformed("daily data not found in the response".to_string());
        assert!(panel.complete(&second.ticket, Err(err)));
        assert!(matches!(panel.state(), PanelState::Error(PanelError::Fetch(_))));
        assert!(panel.rows().is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut panel = ForecastPanel::new();
        let first = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        let second = panel.select(FocusPoint::new(35.0, 139.0)).unwrap();

        // First request resolves late
        assert!(!panel.complete(&first.ticket, Ok(week())));
        assert!(panel.is_loading());

        assert!(panel.complete(&second.ticket, Ok(DailyForecast::default())));
        assert!(!panel.complete(&first.ticket, Ok(week())));
        assert_eq!(panel.state(), &PanelState::Ready(DailyForecast::default()));
    }

    #[test]
    fn test_same_point_twice_gets_distinct_tickets() {
        let mut panel = ForecastPanel::new();
        let first = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        let second = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        assert_ne!(first.ticket, second.ticket);
        assert!(!panel.complete(&first.ticket, Ok(week())));
    }

    #[test]
    fn test_complete_applies_once() {
        let mut panel = ForecastPanel::new();
        let request = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        assert!(panel.complete(&request.ticket, Ok(week())));
        assert!(!panel.complete(&request.ticket, Ok(DailyForecast::default())));
        assert_eq!(panel.rows().len(), 7);
    }

    #[test]
    fn test_clear_invalidates_outstanding_fetch() {
        let mut panel = ForecastPanel::new();
        let request = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        panel.clear();

        assert_eq!(panel.state(), &PanelState::Idle);
        assert!(panel.focus().is_none());
        assert!(!panel.complete(&request.ticket, Ok(week())));
        assert_eq!(panel.state(), &PanelState::Idle);
    }

    #[test]
    fn test_invalid_selection_drops_pending_fetch() {
        let mut panel = ForecastPanel::new();
        let request = panel.select(FocusPoint::new(25.0, 121.5)).unwrap();
        assert!(panel.select(FocusPoint::new(120.0, 0.0)).is_err());
        assert!(!panel.complete(&request.ticket, Ok(week())));
    }
}
