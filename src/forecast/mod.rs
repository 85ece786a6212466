//! Forecast panel: selection state and background fetching.

pub mod state;
pub mod worker;

pub use state::{ForecastPanel, PanelError, PanelState};
pub use worker::ForecastWorker;
