mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::OrdersDashApp;
use eframe::egui;

/// Loaded at startup when present, matching the upstream dashboard's
/// fixed input file.
const DEFAULT_DATASET: &str = "main_data.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Orders Dash – E-commerce Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(startup_app()))),
    )
}

/// Build the app, pre-loading the default dataset if it exists.
fn startup_app() -> OrdersDashApp {
    let mut app = OrdersDashApp::default();

    let path = Path::new(DEFAULT_DATASET);
    if path.exists() {
        match data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} order lines from {DEFAULT_DATASET} ({} – {})",
                    dataset.len(),
                    dataset.min_date,
                    dataset.max_date
                );
                app.state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {DEFAULT_DATASET}: {e:#}");
                app.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    } else {
        log::info!("{DEFAULT_DATASET} not found, waiting for File → Open");
        app.state.status_message =
            Some(format!("{DEFAULT_DATASET} not found – use File → Open"));
    }

    app
}
