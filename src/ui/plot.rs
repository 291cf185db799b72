use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorRamp;
use crate::data::model::TableFrame;

// ---------------------------------------------------------------------------
// Department bar chart
// ---------------------------------------------------------------------------

/// Column names in the enriched department summary written by the upstream
/// pipeline.
const DEPARTMENT_COL: &str = "NOMBDEP";
const COUNT_COL: &str = "hospital_count";

/// Render hospital counts per department as a bar chart, coloured with the
/// choropleth ramp. Hovering a bar shows the department name.
pub fn department_bar_chart(ui: &mut Ui, frame: &TableFrame) {
    let (Some(name_idx), Some(count_idx)) = (
        frame.column_index(DEPARTMENT_COL),
        frame.column_index(COUNT_COL),
    ) else {
        ui.label(format!(
            "Department summary is missing the '{DEPARTMENT_COL}' or \
             '{COUNT_COL}' column."
        ));
        return;
    };

    let pairs: Vec<(String, f64)> = frame
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.get(name_idx)?.to_string();
            let count = row.get(count_idx)?.as_f64()?;
            Some((name, count))
        })
        .collect();
    if pairs.is_empty() {
        ui.label("Department summary has no plottable rows.");
        return;
    }

    let counts: Vec<f64> = pairs.iter().map(|(_, c)| *c).collect();
    let ramp = ColorRamp::new(&counts);

    let bars: Vec<Bar> = pairs
        .iter()
        .enumerate()
        .map(|(i, (name, count))| {
            Bar::new(i as f64, *count)
                .name(name)
                .width(0.8)
                .fill(ramp.color_for(*count))
        })
        .collect();

    Plot::new("department_chart")
        .height(320.0)
        .x_axis_label("department")
        .y_axis_label("public hospitals")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
