mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::PolicyLensApp;
use eframe::egui;
use state::AppState;

/// Portfolio file loaded at startup, relative to the working directory.
const DATA_PATH: &str = "data/home.csv";

fn main() -> eframe::Result {
    env_logger::init();

    // A bad portfolio file aborts before any window is shown; the dashboard
    // never runs on a partially loaded dataset.
    let dataset = match data::loader::load_portfolio(Path::new(DATA_PATH)) {
        Ok(dataset) => dataset,
        Err(err) => {
            log::error!("failed to load {DATA_PATH}: {err}");
            std::process::exit(2);
        }
    };
    log::info!(
        "loaded {} policies across years {:?}",
        dataset.len(),
        dataset.unique_years
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Policy Lens – Home Portfolio Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(PolicyLensApp::new(AppState::new(dataset))))),
    )
}
