use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::loader::DatasetHandle;

// ---------------------------------------------------------------------------
// Base directory
// ---------------------------------------------------------------------------

/// Environment variable naming the analysis directory.
pub const BASE_DIR_ENV: &str = "SALUD_ATLAS_DIR";

/// Manifest filename looked up inside the base directory.
pub const MANIFEST_FILE: &str = "atlas.json";

/// Resolve the base directory from the first CLI argument or the
/// environment. The directory is always configured explicitly; the upstream
/// scripts each guessed it differently (script location, two levels up,
/// cwd) and broke depending on how they were launched.
pub fn resolve_base_dir(args: &[String]) -> Result<PathBuf> {
    let dir = match args.first() {
        Some(arg) => PathBuf::from(arg),
        None => match std::env::var_os(BASE_DIR_ENV) {
            Some(v) => PathBuf::from(v),
            None => bail!(
                "no analysis directory configured: pass it as the first \
                 argument or set {BASE_DIR_ENV}"
            ),
        },
    };
    if !dir.is_dir() {
        bail!("analysis directory does not exist: {}", dir.display());
    }
    Ok(dir)
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// A pre-rendered output file to display: a caption plus its path relative
/// to the base directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub title: String,
    pub path: PathBuf,
}

impl AssetEntry {
    fn new(title: &str, path: &str) -> Self {
        AssetEntry {
            title: title.to_string(),
            path: PathBuf::from(path),
        }
    }
}

/// Declares what the dashboard shows: the datasets to load and the
/// pre-rendered maps produced by the upstream pipeline. Read from
/// `atlas.json` in the base directory when present, otherwise the default
/// layout below is assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub datasets: Vec<DatasetHandle>,
    pub static_maps: Vec<AssetEntry>,
    pub interactive_maps: Vec<AssetEntry>,
}

impl Default for Manifest {
    /// The directory layout shared by the upstream analysis:
    /// `data/` holds the sources, `outputs/` the rendered maps.
    fn default() -> Self {
        Manifest {
            datasets: vec![
                DatasetHandle::tabular("hospitals", "data/IPRESS.csv").with_encoding("latin1"),
                DatasetHandle::vector("populated_centers", "data/CCPP_IGN100K.shp"),
                DatasetHandle::vector("districts", "data/DISTRITOS.shp"),
                DatasetHandle::columnar("departments", "outputs/deptos_enriched.parquet"),
            ],
            static_maps: vec![
                AssetEntry::new(
                    "Public hospitals per district",
                    "outputs/mapa_total_hospitales.png",
                ),
                AssetEntry::new(
                    "Districts without any public hospital",
                    "outputs/mapa_distritos_sin_hospitales.png",
                ),
                AssetEntry::new(
                    "Top 10 districts by hospital count",
                    "outputs/mapa_top_10_distritos.png",
                ),
            ],
            interactive_maps: vec![
                AssetEntry::new(
                    "National choropleth with hospital clusters",
                    "outputs/mapa_nacional.html",
                ),
                AssetEntry::new("Proximity analysis – Lima", "outputs/mapa_proximidad_Lima.html"),
                AssetEntry::new(
                    "Proximity analysis – Loreto",
                    "outputs/mapa_proximidad_Loreto.html",
                ),
            ],
        }
    }
}

impl Manifest {
    /// Read `atlas.json` from the base directory, falling back to the
    /// default layout when the file is absent. A present-but-invalid
    /// manifest is an error; silently ignoring it would hide typos.
    pub fn load_or_default(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(MANIFEST_FILE);
        if !path.exists() {
            log::info!("no {MANIFEST_FILE} in {}, using defaults", base_dir.display());
            return Ok(Manifest::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
