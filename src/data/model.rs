use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value covering the dtypes seen in the source
/// exports (IPRESS registry CSV, department Parquet, shapefile attributes).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for charting and colour ramps.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Parse a raw text field the way the registry exports type them:
    /// integers, then floats, then booleans, everything else stays text.
    pub fn from_text(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// TableFrame – rows with named columns
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column names plus rows of cells.
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableFrame {
    pub fn new(columns: Vec<String>) -> Self {
        TableFrame {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` rows, for the preview grids.
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Extract a column as `f64`, skipping rows where the cell is not
    /// numeric. Returns None when the column does not exist.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx).and_then(CellValue::as_f64))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// GeoFrame – attribute table plus per-row geometry summaries
// ---------------------------------------------------------------------------

/// Shape metadata kept for display. The geometry itself is not interpreted
/// here; all spatial analysis happened upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct GeomSummary {
    /// Shape kind as reported by the file, e.g. "Point" or "Polygon".
    pub kind: String,
    /// Total vertex count across all parts.
    pub n_points: usize,
}

/// A vector dataset: shapefile attribute records plus one geometry summary
/// per record. `geometry.len() == table.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFrame {
    pub table: TableFrame,
    pub geometry: Vec<GeomSummary>,
}

// ---------------------------------------------------------------------------
// Dataset – what the loader hands back on success
// ---------------------------------------------------------------------------

/// A successfully parsed dataset of either flavour.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Table(TableFrame),
    Geo(GeoFrame),
}

impl Dataset {
    /// The attribute table, whichever flavour this is.
    pub fn table(&self) -> &TableFrame {
        match self {
            Dataset::Table(t) => t,
            Dataset::Geo(g) => &g.table,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_types_registry_fields() {
        assert_eq!(CellValue::from_text("12"), CellValue::Integer(12));
        assert_eq!(CellValue::from_text("-3.5"), CellValue::Float(-3.5));
        assert_eq!(CellValue::from_text("true"), CellValue::Bool(true));
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(
            CellValue::from_text("LORETO"),
            CellValue::String("LORETO".into())
        );
    }

    #[test]
    fn numeric_column_skips_non_numeric_cells() {
        let mut frame = TableFrame::new(vec!["dep".into(), "count".into()]);
        frame.rows.push(vec![
            CellValue::String("LIMA".into()),
            CellValue::Integer(120),
        ]);
        frame
            .rows
            .push(vec![CellValue::String("LORETO".into()), CellValue::Null]);
        frame.rows.push(vec![
            CellValue::String("CUSCO".into()),
            CellValue::Float(34.0),
        ]);

        assert_eq!(frame.numeric_column("count"), Some(vec![120.0, 34.0]));
        assert_eq!(frame.numeric_column("missing"), None);
    }

    #[test]
    fn head_clamps_to_row_count() {
        let mut frame = TableFrame::new(vec!["a".into()]);
        frame.rows.push(vec![CellValue::Integer(1)]);
        assert_eq!(frame.head(10).len(), 1);
        assert_eq!(frame.head(0).len(), 0);
    }
}
