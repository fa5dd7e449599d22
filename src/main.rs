//! Titanic EDA - Exploratory Data Analysis dashboard for the Titanic passenger dataset
//!
//! Loads the CSV, shows its overview and picks charts for the selected columns.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::EdaApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let mut config = AppConfig::load_or_default();
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = PathBuf::from(path);
    }
    log::info!("starting with dataset {}", config.dataset_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Titanic EDA"),
        ..Default::default()
    };

    eframe::run_native(
        "Titanic EDA",
        options,
        Box::new(|cc| Ok(Box::new(EdaApp::new(cc, config)))),
    )
}
