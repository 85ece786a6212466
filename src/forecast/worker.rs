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

//! Background forecast fetching.
//!
//! Fetches run on the tokio runtime and report back over a channel that the
//! UI thread drains once per frame. Starting a new fetch cancels the one in
//! flight.

use std::sync::Arc;

use forecast_client::{DailyForecast, DailyForecastSource, FetchError};
use log::debug;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::state::{FetchRequest, FetchTicket};

/// A fetch that has settled
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<DailyForecast, FetchError>,
}

pub struct ForecastWorker<S> {
    source: Arc<S>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: Option<CancellationToken>,
    repaint: Option<egui::Context>,
}

impl<S> std::fmt::Debug for ForecastWorker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastWorker")
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: DailyForecastSource> ForecastWorker<S> {
    pub fn new(source: S, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            runtime,
            tx,
            rx,
            in_flight: None,
            repaint: None,
        }
    }

    /// Wake the UI when a fetch settles
    #[must_use]
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    /// Start fetching, cancelling whatever was in flight.
    pub fn request(&mut self, request: FetchRequest) {
        self.cancel();

        let cancel_token = CancellationToken::new();
        self.in_flight = Some(cancel_token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        let FetchRequest { ticket, coordinates } = request;

        self.runtime.spawn(async move {
            let result = tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!("Forecast fetch #{} cancelled", ticket.generation());
                    return;
                }
                result = source.fetch(coordinates) => result,
            };

            // Receiver is gone only when the app is shutting down
            if tx.send(FetchOutcome { ticket, result }).is_ok() {
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            }
        });
    }

    /// Abort the in-flight fetch, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Drain every outcome that has arrived since the last poll
    pub fn poll(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl<S> Drop for ForecastWorker<S> {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
