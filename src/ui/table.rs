use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::TableFrame;

// ---------------------------------------------------------------------------
// Dataset preview grid
// ---------------------------------------------------------------------------

/// How many columns a preview shows before eliding. The registry export
/// has dozens; showing them all makes the grid unusable.
const MAX_PREVIEW_COLS: usize = 8;

/// Render the first `max_rows` rows of a frame as a striped grid, eliding
/// columns past [`MAX_PREVIEW_COLS`].
pub fn preview_grid(ui: &mut Ui, id: &str, frame: &TableFrame, max_rows: usize) {
    if frame.columns.is_empty() {
        ui.label("(empty table)");
        return;
    }

    let n_cols = frame.columns.len().min(MAX_PREVIEW_COLS);
    let elided = frame.columns.len().saturating_sub(n_cols);

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(70.0), n_cols)
            .header(20.0, |mut header| {
                for col in frame.columns.iter().take(n_cols) {
                    header.col(|ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|mut body| {
                for row in frame.head(max_rows) {
                    body.row(18.0, |mut table_row| {
                        for cell in row.iter().take(n_cols) {
                            table_row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });

    if elided > 0 {
        ui.small(format!("… {elided} more columns not shown"));
    }
}
