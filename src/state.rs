use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AssetEntry, Manifest};
use crate::data::loader::{AssetResult, DatasetHandle, LoadResult, ResourceLoader};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The dashboard tabs, mirroring the three sections of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    DataSources,
    RegionalAnalysis,
    InteractiveMaps,
}

/// One dataset together with its (possibly failed) load outcome.
pub struct LoadedDataset {
    pub handle: DatasetHandle,
    pub result: Arc<LoadResult>,
}

/// One pre-rendered map file together with its load outcome.
pub struct LoadedAsset {
    pub entry: AssetEntry,
    pub result: Arc<AssetResult>,
}

/// The full UI state, independent of rendering. Everything is loaded once
/// at startup through [`ResourceLoader`]; a failed source shows up as an
/// inline warning on its tab, never as a crash.
pub struct AppState {
    pub loader: ResourceLoader,
    pub datasets: Vec<LoadedDataset>,
    pub static_maps: Vec<LoadedAsset>,
    pub interactive_maps: Vec<LoadedAsset>,
    pub tab: Tab,
}

impl AppState {
    /// Build the state and eagerly load every source named by the
    /// manifest. The loader caches per path, so this is the only place
    /// filesystem reads happen.
    pub fn new(base_dir: PathBuf, manifest: Manifest) -> Self {
        let loader = ResourceLoader::new(base_dir);

        let datasets = manifest
            .datasets
            .iter()
            .map(|handle| LoadedDataset {
                result: loader.load(handle),
                handle: handle.clone(),
            })
            .collect();

        let load_assets = |entries: &[AssetEntry]| -> Vec<LoadedAsset> {
            entries
                .iter()
                .map(|entry| LoadedAsset {
                    result: loader.load_asset(&entry.path),
                    entry: entry.clone(),
                })
                .collect()
        };
        let static_maps = load_assets(&manifest.static_maps);
        let interactive_maps = load_assets(&manifest.interactive_maps);

        log::info!(
            "startup complete: {} filesystem reads for {} sources",
            loader.fetch_count(),
            manifest.datasets.len() + manifest.static_maps.len() + manifest.interactive_maps.len()
        );

        AppState {
            loader,
            datasets,
            static_maps,
            interactive_maps,
            tab: Tab::DataSources,
        }
    }

    /// Look up a dataset by its logical name.
    pub fn dataset(&self, logical_name: &str) -> Option<&LoadedDataset> {
        self.datasets
            .iter()
            .find(|d| d.handle.logical_name == logical_name)
    }

    /// How many of the manifest's datasets loaded successfully.
    pub fn loaded_count(&self) -> usize {
        self.datasets.iter().filter(|d| d.result.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::data::loader::DatasetKind;

    #[test]
    fn startup_tolerates_every_source_missing() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(dir.path().to_path_buf(), Manifest::default());

        assert_eq!(state.loaded_count(), 0);
        assert_eq!(state.datasets.len(), 4);
        assert!(state.static_maps.iter().all(|a| a.result.is_err()));
        assert!(state.interactive_maps.iter().all(|a| a.result.is_err()));
    }

    #[test]
    fn partial_availability_loads_what_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data/IPRESS.csv"),
            b"CODIGO,NOMBRE\n1,HOSPITAL A\n",
        )
        .unwrap();

        let state = AppState::new(dir.path().to_path_buf(), Manifest::default());
        assert_eq!(state.loaded_count(), 1);

        let hospitals = state.dataset("hospitals").unwrap();
        assert_eq!(hospitals.handle.kind, DatasetKind::Tabular);
        assert_eq!(hospitals.result.as_ref().as_ref().unwrap().len(), 1);
    }
}
