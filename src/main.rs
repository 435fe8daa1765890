#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the LoRA Bench config editor.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use lorabench::editor::{EditorApp, EditorState};
use lorabench::logging;
use lorabench::settings;
use tracing::warn;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let settings = settings::load_or_default().unwrap_or_else(|err| {
        warn!("Editor settings unavailable, using defaults: {err}");
        settings::EditorSettings::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1280.0, 800.0))
        .with_min_inner_size(egui::vec2(960.0, 640.0));

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "LoRA Bench",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(EditorState::new(settings))))),
    )?;
    Ok(())
}
