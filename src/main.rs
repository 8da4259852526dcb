//! Entry point for the AgroDesk desktop client.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use agrodesk::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use agrodesk::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting AgroDesk");

    let viewport = egui::ViewportBuilder::default()
        .with_title("AgroDesk")
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size([1200.0, 800.0]);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "AgroDesk",
        native_options,
        Box::new(|_cc| match EguiApp::new() {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => {
                tracing::error!(error = %err, "startup failed");
                Ok(Box::new(LaunchError { message: err }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start AgroDesk");
                ui.label(&self.message);
            });
        });
    }
}
