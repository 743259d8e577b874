mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::TrajectoryExplorerApp;
use config::AppConfig;
use data::vehicles::VehicleCatalog;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    let dataset_path = config.dataset_path();
    let dataset = data::loader::load_file(&dataset_path)
        .with_context(|| format!("loading trajectory table {}", dataset_path.display()))?;

    let mut vehicles = VehicleCatalog::new(&config.data_dir, config.vehicles.clone());
    if config.preload_vehicles {
        let loaded = vehicles.preload_all();
        log::info!("Preloaded {loaded} of {} launch vehicles", vehicles.names().len());
    }

    let state = AppState::new(dataset, dataset_path, vehicles, config.dashboard);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Uranus Trajectory Exploration",
        options,
        Box::new(|_cc| Ok(Box::new(TrajectoryExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
