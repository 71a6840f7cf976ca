use eframe::egui::{self, Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

use crate::figure::Panel;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Figure grid (central panel)
// ---------------------------------------------------------------------------

/// Render every metric panel in its grid cell; unused cells stay blank.
pub fn figure_grid(ui: &mut Ui, state: &ViewerState) {
    let figure = &state.figure;
    let spacing = ui.spacing().item_spacing;
    let cols = figure.cols.max(1) as f32;
    let rows = figure.rows.max(1) as f32;
    let cell_w = ((ui.available_width() - spacing.x * (cols - 1.0)) / cols).max(50.0);
    let cell_h = ((ui.available_height() - spacing.y * (rows - 1.0)) / rows).max(50.0);

    egui::Grid::new("figure_grid")
        .spacing(spacing)
        .show(ui, |ui: &mut Ui| {
            for row in 0..figure.rows {
                for col in 0..figure.cols {
                    match figure.panel_at(row, col) {
                        Some(panel) => panel_plot(ui, panel, state.show_values, cell_w, cell_h),
                        None => {
                            ui.allocate_space(egui::vec2(cell_w, cell_h));
                        }
                    }
                }
                ui.end_row();
            }
        });
}

fn panel_plot(ui: &mut Ui, panel: &Panel, show_values: bool, width: f32, height: f32) {
    ui.vertical(|ui: &mut Ui| {
        ui.set_width(width);
        let title = ui.label(RichText::new(&panel.title).strong());
        let plot_height = (height - title.rect.height() - ui.spacing().item_spacing.y).max(30.0);

        let categories: Vec<String> = panel.bars.iter().map(|b| b.category.clone()).collect();
        let bars: Vec<Bar> = panel
            .bars
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_drawn())
            .map(|(i, b)| {
                Bar::new(i as f64, b.height)
                    .width(0.8)
                    .name(&b.category)
                    .fill(Color32::from(b.color))
            })
            .collect();
        let range = panel.value_range();

        Plot::new(&panel.title)
            .width(width)
            .height(plot_height)
            .include_y(range.start)
            .include_y(range.end)
            .x_axis_formatter(move |mark, _range| category_at(&categories, mark.value))
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
                if show_values {
                    for (i, b) in panel.bars.iter().enumerate().filter(|(_, b)| b.is_drawn()) {
                        plot_ui.text(
                            Text::new(PlotPoint::new(i as f64, b.height), b.label.clone())
                                .anchor(Align2::CENTER_BOTTOM),
                        );
                    }
                }
            });
    });
}

/// Axis label for an x grid mark: the category name on integer positions,
/// nothing in between.
pub fn category_at(categories: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_marks() {
        let cats = vec!["FCFS".to_string(), "SJF".to_string()];
        assert_eq!(category_at(&cats, 0.0), "FCFS");
        assert_eq!(category_at(&cats, 1.0), "SJF");
        assert_eq!(category_at(&cats, 0.5), "");
        assert_eq!(category_at(&cats, -1.0), "");
        assert_eq!(category_at(&cats, 2.0), "");
    }
}
