use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EateryDashApp {
    pub state: AppState,
}

impl EateryDashApp {
    /// Create the app, optionally opening a survey file right away.
    pub fn new(initial_file: Option<std::path::PathBuf>) -> Self {
        let mut state = AppState::default();
        if let Some(path) = initial_file {
            state.open(&path);
        }
        Self { state }
    }
}

impl Default for EateryDashApp {
    fn default() -> Self {
        Self::new(None)
    }
}

impl eframe::App for EateryDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: view + variable selection ----
        egui::SidePanel::left("view_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the selected view's charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::central_panel(ui, &self.state);
        });
    }
}
