mod app;
mod config;
mod upload;
mod utils;

use app::DropzoneApp;
use config::StorageConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match StorageConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid storage configuration");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([480.0, 420.0])
            .with_min_inner_size([400.0, 360.0]),
        ..Default::default()
    };

    if let Err(err) = eframe::run_native(
        "S3 Dropzone",
        options,
        Box::new(move |cc| Box::new(DropzoneApp::new(cc, config))),
    ) {
        tracing::error!(error = %err, "failed to start GUI");
    }
}
