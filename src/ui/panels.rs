use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::LoadError;
use crate::data::model::Dataset;
use crate::state::{AppState, LoadedAsset, LoadedDataset, Tab};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Top bar – tab strip
// ---------------------------------------------------------------------------

/// Render the tab strip and the source-count summary.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Salud Atlas");
        ui.separator();
        ui.selectable_value(&mut state.tab, Tab::DataSources, "Data Sources");
        ui.selectable_value(&mut state.tab, Tab::RegionalAnalysis, "Regional Analysis");
        ui.selectable_value(&mut state.tab, Tab::InteractiveMaps, "Interactive Maps");

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let loaded = state.loaded_count();
            let total = state.datasets.len();
            let text = format!("{loaded}/{total} datasets loaded");
            if loaded == total {
                ui.label(text);
            } else {
                ui.label(RichText::new(text).color(Color32::YELLOW));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Central panel – tab dispatch
// ---------------------------------------------------------------------------

pub fn central(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::DataSources => data_sources_tab(ui, state),
            Tab::RegionalAnalysis => regional_tab(ui, state),
            Tab::InteractiveMaps => interactive_tab(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Tab 1: data sources
// ---------------------------------------------------------------------------

fn data_sources_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("The Data Behind the Analysis");
    ui.label(
        "Three geospatial sources are combined to measure hospital \
         accessibility across Peru: the MINSA registry of operating public \
         health establishments (IPRESS), the INEI directory of populated \
         centers, and the official district cartography. The department \
         summary is produced by the upstream analysis pipeline.",
    );
    ui.add_space(8.0);

    for loaded in &state.datasets {
        dataset_section(ui, loaded);
        ui.add_space(6.0);
    }
}

fn dataset_section(ui: &mut Ui, loaded: &LoadedDataset) {
    ui.separator();
    ui.strong(section_title(&loaded.handle.logical_name));

    match loaded.result.as_ref() {
        Ok(dataset) => {
            if dataset.is_empty() {
                ui.label("0 records");
                return;
            }
            ui.label(format!("{} records", dataset.len()));
            if let Dataset::Geo(geo) = dataset {
                if let Some(first) = geo.geometry.first() {
                    ui.small(format!(
                        "geometry: {} ({} vertices in the first record)",
                        first.kind, first.n_points
                    ));
                }
            }
            table::preview_grid(ui, &loaded.handle.logical_name, dataset.table(), 10);
        }
        Err(e) => load_warning(ui, e),
    }
}

fn section_title(logical_name: &str) -> &str {
    match logical_name {
        "hospitals" => "Public Health Establishments (IPRESS)",
        "populated_centers" => "National Directory of Populated Centers",
        "districts" => "District Cartography",
        "departments" => "Department Summary",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tab 2: regional analysis
// ---------------------------------------------------------------------------

fn regional_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("District and Department Level Analysis");
    ui.label(
        "The static maps below were rendered by the analysis pipeline. They \
         contrast the dense coastal supply of hospitals with the chronic \
         deficit across the rural highlands and the Amazon.",
    );
    ui.add_space(8.0);

    for asset in &state.static_maps {
        static_map(ui, asset);
        ui.add_space(6.0);
    }

    ui.separator();
    ui.strong("Hospitals per Department");
    match state.dataset("departments").map(|d| d.result.as_ref()) {
        Some(Ok(dataset)) => {
            if let Some(counts) = dataset.table().numeric_column("hospital_count") {
                let total: f64 = counts.iter().sum();
                ui.label(format!("{} public hospitals nationwide", total as i64));
            }
            table::preview_grid(ui, "departments_summary", dataset.table(), 25);
            ui.add_space(6.0);
            plot::department_bar_chart(ui, dataset.table());
        }
        Some(Err(e)) => load_warning(ui, e),
        None => {
            ui.label("No 'departments' dataset in the manifest.");
        }
    }
}

fn static_map(ui: &mut Ui, asset: &LoadedAsset) {
    ui.strong(&asset.entry.title);
    match asset.result.as_ref() {
        Ok(bytes) => {
            let uri = format!("bytes://{}", asset.entry.path.display());
            ui.add(
                egui::Image::from_bytes(uri, bytes.clone())
                    .max_width(ui.available_width().min(900.0)),
            );
        }
        Err(e) => load_warning(ui, e),
    }
}

// ---------------------------------------------------------------------------
// Tab 3: interactive maps
// ---------------------------------------------------------------------------

fn interactive_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("How Far Is the Nearest Hospital?");
    ui.label(
        "The interactive maps use 10 km buffers around populated centers to \
         visualize coverage gaps. They are self-contained Leaflet pages \
         rendered by the pipeline; open them in a browser to explore.",
    );
    ui.add_space(8.0);

    for asset in &state.interactive_maps {
        html_map_card(ui, state, asset);
        ui.add_space(6.0);
    }

    ui.separator();
    ui.strong("Key Takeaways");
    ui.label(
        "• Coverage circles overlap constantly in Lima: the challenge there \
         is capacity, not distance.\n\
         • In Loreto large voids separate the circles; for many river \
         communities the nearest facility is hours or days away.\n\
         • Closing the gap is a placement problem, not only a construction \
         problem.",
    );
}

fn html_map_card(ui: &mut Ui, state: &AppState, asset: &LoadedAsset) {
    ui.strong(&asset.entry.title);
    match asset.result.as_ref() {
        Ok(bytes) => {
            let resolved = state.loader.resolve(&asset.entry.path);
            ui.label(format!(
                "ready – {} KiB at {}",
                bytes.len() / 1024,
                resolved.display()
            ));
        }
        Err(e) => load_warning(ui, e),
    }
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// A load failure rendered inline, the way the upstream dashboard showed
/// warnings instead of crashing.
fn load_warning(ui: &mut Ui, err: &LoadError) {
    let text = match err {
        LoadError::NotFound(path) => format!(
            "Not found: {}. Run the analysis pipeline to generate it.",
            path.display()
        ),
        LoadError::Parse { path, detail } => {
            format!("Could not read {}: {detail}", path.display())
        }
    };
    ui.label(RichText::new(text).color(Color32::YELLOW));
}
