//! UI components for Weather Map Desktop.

pub mod forecast_window;

pub use forecast_window::{ForecastWindow, PanelAction};
