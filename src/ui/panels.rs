use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::view::{self, Payload, ViewKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(
                    state.table.is_some(),
                    egui::Button::new("Export view data…"),
                )
                .clicked()
            {
                export_view_data(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} responses, {} columns",
                table.len(),
                table.columns().len()
            ));
        } else {
            ui.label("No survey loaded");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – view and variable selection
// ---------------------------------------------------------------------------

/// Render the view selector and the current view's variable checkboxes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Restaurant Dashboard");
    ui.separator();

    ui.strong("View");
    for view in ViewKind::ALL {
        if ui
            .selectable_label(state.view == view, view.label())
            .clicked()
        {
            state.set_view(view);
        }
    }
    ui.separator();

    let routes = state.view.routes();
    if !routes.is_empty() {
        ui.strong("Variables");
        ui.label(
            RichText::new("None selected shows all")
                .small()
                .color(Color32::GRAY),
        );

        ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                for route in routes {
                    let mut checked = state.is_selected(route.column);
                    let label = route.column.replace('_', " ");
                    if ui.checkbox(&mut checked, label).changed() {
                        state.toggle_variable(route.column);
                    }
                }
                if ui.small_button("Clear").clicked() {
                    state.clear_selection();
                }
            });
    }

    // Scatter axis pickers for the relation view.
    let scatter_vars = state.view.scatter_variables();
    if !scatter_vars.is_empty() {
        ui.separator();
        ui.strong("Scatter comparison");
        axis_combo(ui, "X axis", &mut state.scatter_x, scatter_vars);
        axis_combo(ui, "Y axis", &mut state.scatter_y, scatter_vars);
    }
}

fn axis_combo(ui: &mut Ui, label: &str, current: &mut String, options: &[&str]) {
    egui::ComboBox::from_label(label)
        .selected_text(current.replace('_', " "))
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui
                    .selectable_label(current == option, option.replace('_', " "))
                    .clicked()
                {
                    *current = option.to_string();
                }
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("Supported files", &["csv", "tsv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

/// Serialize the current view's payloads (plus the scatter pair, where the
/// view has one) and write them to a JSON file picked by the user.
fn export_view_data(state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };

    let mut payloads = match view::view_payloads(&table, state.view, state.requested()) {
        Ok(p) => p,
        Err(e) => {
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };
    if !state.view.scatter_variables().is_empty() && state.scatter_x != state.scatter_y {
        match view::scatter_payload(&table, &state.scatter_x, &state.scatter_y) {
            Ok(p) => payloads.push(p),
            Err(e) => {
                state.status_message = Some(format!("Error: {e}"));
                return;
            }
        }
    }
    // RawTable is a marker for the renderer, not exportable data.
    payloads.retain(|p| !matches!(p, Payload::RawTable));

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export view data")
        .set_file_name(format!("{}.json", state.view.name()))
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };

    let result = serde_json::to_string_pretty(&payloads)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));

    match result {
        Ok(()) => {
            log::info!("exported {} payloads to {}", payloads.len(), path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("export failed: {e}");
            state.status_message = Some(format!("Export failed: {e}"));
        }
    }
}
