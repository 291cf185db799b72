use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, BooleanArray, StringArray};
use arrow::datatypes::DataType;
use encoding_rs::Encoding;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use shapefile::Shape;
use shapefile::dbase::FieldValue;
use thiserror::Error;

use super::model::{CellValue, Dataset, GeoFrame, GeomSummary, TableFrame};

// ---------------------------------------------------------------------------
// Dataset handles
// ---------------------------------------------------------------------------

/// Which parser a dataset goes through. Dispatch is driven by this declared
/// kind, never by sniffing the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Delimited text (the IPRESS registry export).
    Tabular,
    /// Parquet, self-describing, no encoding parameter.
    Columnar,
    /// ESRI shapefile: the `.shp` descriptor plus its `.dbf`/`.shx` siblings.
    Vector,
}

/// Identifies one loadable resource: a display name, a path (absolute, or
/// relative to the loader's base directory) and the declared kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetHandle {
    pub logical_name: String,
    pub path: PathBuf,
    pub kind: DatasetKind,
    /// Text encoding label for tabular sources (WHATWG label such as
    /// "latin1" or "utf-8"). Registry exports from MINSA are latin-1, so
    /// that is the default. Ignored by the other kinds.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl DatasetHandle {
    /// A tabular handle with no explicit encoding; the loader falls back
    /// to windows-1252, the registry-export default.
    pub fn tabular(name: &str, path: impl Into<PathBuf>) -> Self {
        DatasetHandle {
            logical_name: name.to_string(),
            path: path.into(),
            kind: DatasetKind::Tabular,
            encoding: None,
        }
    }

    pub fn columnar(name: &str, path: impl Into<PathBuf>) -> Self {
        DatasetHandle {
            logical_name: name.to_string(),
            path: path.into(),
            kind: DatasetKind::Columnar,
            encoding: None,
        }
    }

    pub fn vector(name: &str, path: impl Into<PathBuf>) -> Self {
        DatasetHandle {
            logical_name: name.to_string(),
            path: path.into(),
            kind: DatasetKind::Vector,
            encoding: None,
        }
    }

    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = Some(label.to_string());
        self
    }

    fn resolve_encoding(&self) -> Result<&'static Encoding> {
        match &self.encoding {
            None => Ok(encoding_rs::WINDOWS_1252),
            Some(label) => Encoding::for_label(label.as_bytes())
                .with_context(|| format!("unknown encoding label '{label}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Load results
// ---------------------------------------------------------------------------

/// The only two failure classes the loader reports. Anything else escaping
/// a parser is wrapped into `Parse` before it crosses this boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("could not parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },
}

pub type LoadResult = Result<Dataset, LoadError>;

/// Raw bytes of a pre-rendered output (HTML map, PNG image), verbatim.
pub type AssetResult = Result<Vec<u8>, LoadError>;

// ---------------------------------------------------------------------------
// ResourceLoader
// ---------------------------------------------------------------------------

/// Resolves logical datasets to files, parses them once, and memoizes the
/// outcome per (resolved path, kind) for the rest of the process lifetime.
///
/// Failures are cached exactly like successes: a missing file is reported
/// as a value and never retried. The loader never panics and never lets a
/// parser fault escape; callers decide how to surface a `LoadError`.
///
/// The base directory is the only path-resolution input. It is supplied at
/// construction and nothing here ever consults the current working
/// directory.
pub struct ResourceLoader {
    base_dir: PathBuf,
    datasets: Mutex<HashMap<(PathBuf, DatasetKind), Arc<LoadResult>>>,
    assets: Mutex<HashMap<PathBuf, Arc<AssetResult>>>,
    fetches: AtomicUsize,
}

impl ResourceLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        ResourceLoader {
            base_dir: base_dir.into(),
            datasets: Mutex::new(HashMap::new()),
            assets: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Resolve a dataset path against the base directory. Absolute paths
    /// pass through untouched.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// How many cache misses have gone to the filesystem so far. Logged at
    /// shutdown and asserted on by the caching tests.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Load a dataset, reusing the cached outcome when one exists.
    ///
    /// The cache lock is held across the parse, which makes the
    /// check-then-insert atomic and gives at-most-once parsing per key even
    /// under concurrent callers. Call volume is a handful of datasets at
    /// startup, so a single guard is plenty.
    pub fn load(&self, handle: &DatasetHandle) -> Arc<LoadResult> {
        let resolved = self.resolve(&handle.path);
        let key = (resolved.clone(), handle.kind);

        let mut cache = lock_unpoisoned(&self.datasets);
        if let Some(hit) = cache.get(&key) {
            log::debug!("cache hit: {}", resolved.display());
            return Arc::clone(hit);
        }

        let result = Arc::new(self.fetch(handle, &resolved));
        match result.as_ref() {
            Ok(ds) => log::info!(
                "loaded '{}' from {} ({} records)",
                handle.logical_name,
                resolved.display(),
                ds.len()
            ),
            Err(e) => log::warn!("load failed for '{}': {e}", handle.logical_name),
        }
        cache.insert(key, Arc::clone(&result));
        result
    }

    /// Load a pre-rendered output file (HTML map, PNG image) as raw bytes.
    /// Same contract and caching as [`ResourceLoader::load`]: the exact
    /// bytes on disk, or a `NotFound`/`Parse` value.
    pub fn load_asset(&self, path: &Path) -> Arc<AssetResult> {
        let resolved = self.resolve(path);

        let mut cache = lock_unpoisoned(&self.assets);
        if let Some(hit) = cache.get(&resolved) {
            return Arc::clone(hit);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        let result = if !resolved.exists() {
            Err(LoadError::NotFound(resolved.clone()))
        } else {
            fs::read(&resolved).map_err(|e| LoadError::Parse {
                path: resolved.clone(),
                detail: e.to_string(),
            })
        };
        if let Err(e) = &result {
            log::warn!("asset load failed: {e}");
        }

        let result = Arc::new(result);
        cache.insert(resolved, Arc::clone(&result));
        result
    }

    /// Cache miss path: check existence, then hand off to the parser for
    /// the declared kind. Every parser fault is converted to a value here;
    /// nothing propagates past this function.
    fn fetch(&self, handle: &DatasetHandle, resolved: &Path) -> LoadResult {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        if !resolved.exists() {
            return Err(LoadError::NotFound(resolved.to_path_buf()));
        }

        let parsed = match handle.kind {
            DatasetKind::Tabular => handle
                .resolve_encoding()
                .and_then(|enc| parse_delimited(resolved, enc)),
            DatasetKind::Columnar => parse_parquet(resolved),
            DatasetKind::Vector => parse_shapefile(resolved),
        };

        parsed.map_err(|e| LoadError::Parse {
            path: resolved.to_path_buf(),
            detail: format!("{e:#}"),
        })
    }
}

/// Recover the guard even if a previous holder panicked; the maps stay
/// usable because insertion is the last step of every critical section.
fn lock_unpoisoned<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ---------------------------------------------------------------------------
// Delimited-text parser
// ---------------------------------------------------------------------------

/// Parse a delimited-text file using the configured encoding. The registry
/// exports are not UTF-8, so the bytes are decoded first and a decode with
/// errors is treated as a parse failure rather than silently mangled.
fn parse_delimited(path: &Path, encoding: &'static Encoding) -> Result<Dataset> {
    let raw = fs::read(path).context("reading file")?;
    // No BOM sniffing: a leading BOM must not override the configured
    // encoding.
    let (text, had_errors) = encoding.decode_without_bom_handling(&raw);
    if had_errors {
        bail!("byte stream is not valid {}", encoding.name());
    }

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut frame = TableFrame::new(headers);
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        frame
            .rows
            .push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(Dataset::Table(frame))
}

// ---------------------------------------------------------------------------
// Parquet parser
// ---------------------------------------------------------------------------

fn parse_parquet(path: &Path) -> Result<Dataset> {
    let file = fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mut frame = TableFrame::new(columns);

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| cell_from_arrow(batch.column(col), row))
                .collect();
            frame.rows.push(cells);
        }
    }

    Ok(Dataset::Table(frame))
}

/// Extract a single cell from an Arrow column at a given row.
fn cell_from_arrow(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_primitive::<arrow::datatypes::Int32Type>();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_primitive::<arrow::datatypes::Int64Type>();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_primitive::<arrow::datatypes::Float32Type>();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_primitive::<arrow::datatypes::Float64Type>();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            if let Some(arr) = col.as_any().downcast_ref::<BooleanArray>() {
                CellValue::Bool(arr.value(row))
            } else {
                CellValue::Null
            }
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

// ---------------------------------------------------------------------------
// Shapefile parser
// ---------------------------------------------------------------------------

/// Parse a shapefile into attribute rows plus geometry summaries. The
/// `shapefile` crate locates the `.dbf`/`.shx` siblings from the `.shp`
/// path itself. Attribute columns come back unordered from dBase, so they
/// are sorted by name once for a stable display order.
fn parse_shapefile(path: &Path) -> Result<Dataset> {
    let mut reader = shapefile::Reader::from_path(path).context("opening shapefile")?;

    let mut frame: Option<TableFrame> = None;
    let mut geometry = Vec::new();

    for shape_record in reader.iter_shapes_and_records() {
        let (shape, record) = shape_record.context("reading shapefile record")?;
        geometry.push(summarize_shape(&shape));

        let pairs: Vec<(String, FieldValue)> = record.into_iter().collect();
        let frame = frame.get_or_insert_with(|| {
            let mut names: Vec<String> = pairs.iter().map(|(n, _)| n.clone()).collect();
            names.sort();
            TableFrame::new(names)
        });

        let mut row = vec![CellValue::Null; frame.columns.len()];
        for (name, value) in pairs {
            if let Some(idx) = frame.column_index(&name) {
                row[idx] = cell_from_dbase(value);
            }
        }
        frame.rows.push(row);
    }

    Ok(Dataset::Geo(GeoFrame {
        table: frame.unwrap_or_else(|| TableFrame::new(Vec::new())),
        geometry,
    }))
}

fn cell_from_dbase(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Character(Some(s)) => CellValue::String(s),
        FieldValue::Character(None) => CellValue::Null,
        FieldValue::Numeric(Some(n)) => CellValue::Float(n),
        FieldValue::Numeric(None) => CellValue::Null,
        FieldValue::Float(Some(f)) => CellValue::Float(f as f64),
        FieldValue::Float(None) => CellValue::Null,
        FieldValue::Integer(i) => CellValue::Integer(i as i64),
        FieldValue::Double(d) => CellValue::Float(d),
        FieldValue::Logical(Some(b)) => CellValue::Bool(b),
        FieldValue::Logical(None) => CellValue::Null,
        other => CellValue::String(format!("{other:?}")),
    }
}

fn summarize_shape(shape: &Shape) -> GeomSummary {
    let n_points = match shape {
        Shape::NullShape => 0,
        Shape::Point(_) | Shape::PointM(_) | Shape::PointZ(_) => 1,
        Shape::Polyline(p) => p.parts().iter().map(|part| part.len()).sum(),
        Shape::PolylineM(p) => p.parts().iter().map(|part| part.len()).sum(),
        Shape::PolylineZ(p) => p.parts().iter().map(|part| part.len()).sum(),
        Shape::Polygon(p) => p.rings().iter().map(|r| r.points().len()).sum(),
        Shape::PolygonM(p) => p.rings().iter().map(|r| r.points().len()).sum(),
        Shape::PolygonZ(p) => p.rings().iter().map(|r| r.points().len()).sum(),
        Shape::Multipoint(p) => p.points().len(),
        Shape::MultipointM(p) => p.points().len(),
        Shape::MultipointZ(p) => p.points().len(),
        Shape::Multipatch(p) => p.patches().iter().map(|patch| patch.points().len()).sum(),
    };
    GeomSummary {
        kind: shape.shapetype().to_string(),
        n_points,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    fn write_department_parquet(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let schema = Arc::new(Schema::new(vec![
            Field::new("NOMBDEP", DataType::Utf8, false),
            Field::new("hospital_count", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["LIMA", "LORETO"])),
                Arc::new(Int64Array::from(vec![412, 37])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn caches_success_and_never_reparses() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "ipress.csv", b"CODIGO,NOMBRE\n1,HOSPITAL A\n2,POSTA B\n");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("hospitals", "ipress.csv");

        let first = loader.load(&handle);
        let second = loader.load(&handle);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(loader.fetch_count(), 1);

        // Deleting the file must not matter: the cached outcome is served
        // without touching the filesystem again.
        fs::remove_file(&path).unwrap();
        let third = loader.load(&handle);
        assert!(third.is_ok());
        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn missing_file_is_not_found_and_cached() {
        let dir = TempDir::new().unwrap();
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("hospitals", "nope.csv");

        let result = loader.load(&handle);
        match result.as_ref() {
            Err(LoadError::NotFound(p)) => assert_eq!(p, &dir.path().join("nope.csv")),
            other => panic!("expected NotFound, got {other:?}"),
        }

        // The failure is cached too; no second filesystem check.
        loader.load(&handle);
        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn malformed_content_is_a_parse_error_value() {
        let dir = TempDir::new().unwrap();
        // Bytes that are valid in no UTF-8 decoding.
        write_csv(&dir, "junk.csv", b"\xff\xfe\x00\x01PAR1\x81\x9d");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("junk", "junk.csv").with_encoding("utf-8");

        match loader.load(&handle).as_ref() {
            Err(LoadError::Parse { detail, .. }) => {
                assert!(detail.contains("UTF-8"), "unexpected detail: {detail}")
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn byte_order_mark_does_not_override_configured_encoding() {
        let dir = TempDir::new().unwrap();
        // UTF-16LE BOM followed by "a\n1\n" in UTF-16LE. Under the
        // configured utf-8 this is a decode failure; the BOM must not be
        // sniffed and honoured instead.
        write_csv(&dir, "bom.csv", b"\xff\xfea\x00\n\x001\x00\n\x00");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("bom", "bom.csv").with_encoding("utf-8");

        match loader.load(&handle).as_ref() {
            Err(LoadError::Parse { detail, .. }) => {
                assert!(detail.contains("UTF-8"), "unexpected detail: {detail}")
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn ragged_csv_is_a_parse_error_value() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "ragged.csv", b"a,b\n1,2\n3,4,5\n");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("ragged", "ragged.csv").with_encoding("utf-8");

        assert!(matches!(
            loader.load(&handle).as_ref(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn configured_encoding_is_honoured() {
        let dir = TempDir::new().unwrap();
        // "CLÍNICA" in latin-1: Í is a single 0xCD byte, invalid as UTF-8.
        write_csv(&dir, "ipress.csv", b"NOMBRE\nCL\xcdNICA SAN PABLO\n");

        let loader = ResourceLoader::new(dir.path());
        let latin = loader.load(&DatasetHandle::tabular("h", "ipress.csv"));
        let table = match latin.as_ref() {
            Ok(Dataset::Table(t)) => t,
            other => panic!("expected table, got {other:?}"),
        };
        assert_eq!(
            table.rows[0][0],
            CellValue::String("CLÍNICA SAN PABLO".to_string())
        );

        // The same bytes under UTF-8 are a decode failure, not a silent
        // mojibake success.
        let fresh = ResourceLoader::new(dir.path());
        let utf8 = fresh.load(&DatasetHandle::tabular("h", "ipress.csv").with_encoding("utf-8"));
        assert!(matches!(utf8.as_ref(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn unknown_encoding_label_is_a_parse_error_value() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "ipress.csv", b"a\n1\n");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::tabular("h", "ipress.csv").with_encoding("klingon-8");

        assert!(matches!(
            loader.load(&handle).as_ref(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn dispatch_follows_declared_kind_not_extension() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "data.bin", b"NOMBRE,UBIGEO\nHOSPITAL A,150101\n");
        let loader = ResourceLoader::new(dir.path());

        // Same resolved path, three declared kinds: tabular parses, the
        // other two fail, and each outcome is cached independently.
        let tabular = loader.load(&DatasetHandle::tabular("d", "data.bin"));
        let columnar = loader.load(&DatasetHandle::columnar("d", "data.bin"));
        let vector = loader.load(&DatasetHandle::vector("d", "data.bin"));

        assert!(tabular.is_ok());
        assert!(matches!(columnar.as_ref(), Err(LoadError::Parse { .. })));
        assert!(matches!(vector.as_ref(), Err(LoadError::Parse { .. })));
        assert_eq!(loader.fetch_count(), 3);
    }

    #[test]
    fn failures_do_not_leak_across_entries() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "good.csv", b"a\n1\n");
        let loader = ResourceLoader::new(dir.path());

        let bad = loader.load(&DatasetHandle::tabular("bad", "missing.csv"));
        let good = loader.load(&DatasetHandle::tabular("good", "good.csv"));

        assert!(matches!(bad.as_ref(), Err(LoadError::NotFound(_))));
        assert!(good.is_ok());

        // Re-reads of both come from the cache, unchanged.
        assert!(loader
            .load(&DatasetHandle::tabular("bad", "missing.csv"))
            .is_err());
        assert!(loader.load(&DatasetHandle::tabular("good", "good.csv")).is_ok());
        assert_eq!(loader.fetch_count(), 2);
    }

    #[test]
    fn parquet_round_trips_department_summary() {
        let dir = TempDir::new().unwrap();
        write_department_parquet(&dir, "deptos_enriched.parquet");
        let loader = ResourceLoader::new(dir.path());
        let handle = DatasetHandle::columnar("departments", "deptos_enriched.parquet");

        let result = loader.load(&handle);
        let table = match result.as_ref() {
            Ok(Dataset::Table(t)) => t,
            other => panic!("expected table, got {other:?}"),
        };

        assert_eq!(table.columns, vec!["NOMBDEP", "hospital_count"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::String("LIMA".to_string()));
        assert_eq!(table.rows[1][1], CellValue::Integer(37));
        assert_eq!(table.numeric_column("hospital_count"), Some(vec![412.0, 37.0]));
    }

    #[test]
    fn absolute_paths_bypass_the_base_directory() {
        let data_dir = TempDir::new().unwrap();
        let other_dir = TempDir::new().unwrap();
        let abs = write_csv(&other_dir, "elsewhere.csv", b"a\n1\n");

        let loader = ResourceLoader::new(data_dir.path());
        let result = loader.load(&DatasetHandle::tabular("elsewhere", abs));
        assert!(result.is_ok());
    }

    #[test]
    fn assets_come_back_byte_exact_and_cached() {
        let dir = TempDir::new().unwrap();
        let bytes: &[u8] = b"<html><body>mapa</body></html>";
        write_csv(&dir, "mapa_nacional.html", bytes);
        let loader = ResourceLoader::new(dir.path());

        let first = loader.load_asset(Path::new("mapa_nacional.html"));
        assert_eq!(first.as_ref().as_deref().unwrap(), bytes);

        let second = loader.load_asset(Path::new("mapa_nacional.html"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.fetch_count(), 1);

        let missing = loader.load_asset(Path::new("mapa_proximidad_Lima.html"));
        assert!(matches!(missing.as_ref(), Err(LoadError::NotFound(_))));
    }
}
