use anyhow::Result;
use eframe::egui;
use log::info;

mod app;
mod driver;
mod engine;
mod surface;

use app::TriangleApp;

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting Sierpinski's Triangle");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sierpinski's Triangle")
            .with_inner_size([980.0, 640.0])
            .with_min_inner_size([560.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sierpinski's Triangle",
        options,
        Box::new(|_cc| Ok(Box::new(TriangleApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
