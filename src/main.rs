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

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod cli;
mod config;
mod focus;
mod forecast;
mod map;
mod settings;
mod ui;

use std::sync::Arc;

use clap::Parser;
use forecast_client::ForecastClient;
use log::{error, info, warn};

use app::WeatherMapApp;
use cli::Args;
use config::AppConfig;
use forecast::ForecastWorker;
use settings::{EnvOverrides, Settings};

fn load_config(args: &Args) -> AppConfig {
    if args.reset_config {
        let config = AppConfig::default();
        match config.save() {
            Ok(()) => info!("Configuration reset to defaults"),
            Err(e) => error!("Failed to reset configuration: {}", e),
        }
        return config;
    }

    match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    let mut config = load_config(&args);

    if let (Some(name), Some(lat), Some(lon)) = (&args.save_place, args.lat, args.lon) {
        match config.add_place(name.clone(), lat, lon) {
            Ok(place) => {
                info!("Saving place '{}' ({}, {})", place.name, lat, lon);
                if let Err(e) = config.save() {
                    error!("Failed to save configuration: {}", e);
                }
            }
            Err(e) => error!("Not saving place '{}': {}", name, e),
        }
    }

    let settings = Arc::new(Settings::resolve(&config, &args, &EnvOverrides::from_env()));
    info!("Starting Weather Map Desktop ({} tiles)", settings.map.style.as_str());

    let runtime = tokio::runtime::Runtime::new()?;
    let client = ForecastClient::new(settings.forecast.client_config())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Weather Map"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "Weather Map",
        options,
        Box::new(move |cc| {
            let worker = ForecastWorker::new(client, handle).with_repaint(cc.egui_ctx.clone());
            Ok(Box::new(WeatherMapApp::new(settings, worker)))
        }),
    )?;

    // In-flight fetches are abandoned with the runtime
    runtime.shutdown_background();
    Ok(())
}
