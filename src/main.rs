#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod accuracy;
mod app;
mod data;
mod trajectory;

use app::SimulatorApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Firearm Accuracy Simulator",
        options,
        Box::new(|cc| Ok(Box::new(SimulatorApp::new(cc)))),
    )
}
