use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{Status, ViewerState};

// ---------------------------------------------------------------------------
// Left side panel – per-metric values
// ---------------------------------------------------------------------------

/// Render the left panel listing every bar value.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Values");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for panel in &state.figure.panels {
                egui::CollapsingHeader::new(RichText::new(&panel.title).strong())
                    .id_salt(&panel.title)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        egui::Grid::new(("values", &panel.title))
                            .striped(true)
                            .num_columns(2)
                            .show(ui, |ui: &mut Ui| {
                                for bar in &panel.bars {
                                    ui.label(
                                        RichText::new(&bar.category).color(Color32::from(bar.color)),
                                    );
                                    ui.monospace(&bar.label);
                                    ui.end_row();
                                }
                            });
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui.button("Export PNG…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} algorithms, {} metrics",
            state.figure.categories.len(),
            state.figure.panels.len()
        ));

        ui.separator();

        if ui.selectable_label(state.show_values, "Values").clicked() {
            state.show_values = !state.show_values;
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut ViewerState) {
    let file_name = state
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::report::DEFAULT_OUTPUT.to_string());

    let file = rfd::FileDialog::new()
        .set_title("Export figure")
        .add_filter("PNG", &["png"])
        .set_file_name(file_name)
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
