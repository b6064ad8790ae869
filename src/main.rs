use std::path::PathBuf;

use eatery_dash::app::EateryDashApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: survey file to open on startup.
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Eatery Dash – Restaurant Survey Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(EateryDashApp::new(initial_file)))),
    )
}
