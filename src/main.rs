mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::DexboardApp;
use clap::Parser;
use eframe::egui;

use config::Args;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();
    log::debug!("Starting with {args:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dexboard – Creature Stats",
        options,
        Box::new(move |_cc| Ok(Box::new(DexboardApp::new(AppState::new(&args))))),
    )
}
