mod app;
mod app_dir;
mod gl_renderer;
mod glow_device;
mod input;
mod settings;
mod ui;

use eframe::egui;
use tracing::info;

use app::FractViewApp;
use settings::AppSettings;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting FractView");

    let settings = AppSettings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("FractView")
            .with_inner_size([settings.window_width, settings.window_height]),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "FractView",
        options,
        Box::new(move |cc| {
            let app = FractViewApp::new(cc, settings)?;
            Ok(Box::new(app))
        }),
    )
}
