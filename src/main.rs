use anyhow::anyhow;
use tracing::{info, warn};

use tumble::app::SandboxApp;
use tumble::config::{load_settings, save_settings, settings_path, SandboxSettings};
use tumble::utils::logging::{init_logging, log_system_info};

fn main() -> anyhow::Result<()> {
    init_logging();
    log_system_info();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load settings, using defaults: {}", e);
            SandboxSettings::default()
        }
    };

    if settings_path().is_some_and(|path| !path.exists()) {
        match save_settings(&settings) {
            Ok(path) => info!("Wrote default settings to {:?}", path),
            Err(e) => warn!("Could not write default settings: {}", e),
        }
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(format!("{} {}", settings.window.title, tumble::VERSION))
            .with_inner_size([settings.window.width, settings.window.height]),
        renderer: eframe::Renderer::Wgpu,
        // Must match SURFACE_DEPTH_FORMAT.
        depth_buffer: 32,
        ..Default::default()
    };

    eframe::run_native(
        tumble::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(SandboxApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow!("eframe exited with an error: {}", e))?;

    info!("Exited cleanly");
    Ok(())
}
