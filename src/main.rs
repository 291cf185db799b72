mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::SaludAtlasApp;
use config::Manifest;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // The analysis directory is always configured explicitly, never
    // guessed from where the binary happens to run.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let base_dir = match config::resolve_base_dir(&args) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("salud-atlas: {e}");
            std::process::exit(2);
        }
    };
    let manifest = match Manifest::load_or_default(&base_dir) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("salud-atlas: {e:#}");
            std::process::exit(2);
        }
    };

    log::info!("analysis directory: {}", base_dir.display());
    let state = AppState::new(base_dir, manifest);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salud Atlas – Hospital Access in Peru",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the PNG maps.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(SaludAtlasApp::new(state)))
        }),
    )
}
