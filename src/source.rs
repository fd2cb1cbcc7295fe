//! Edge table sources.
//!
//! A source returns the raw table (`EdgeTable`) exactly as stored. Shape
//! checks live in `validate_edges` so every source reports the same errors:
//! - `SOURCE` and `TARGET` columns are required (case-insensitive)
//! - `RELATIONSHIP` is optional and defaults to `CONNECTED`
//! - an empty table is an error, as is a row with a blank endpoint
//!
//! Two sources are provided: delimited files and sled-backed tables. The
//! sled layout uses two trees:
//! - `tables:schema`: table name → JSON list of column names
//! - `table:<NAME>`: big-endian row number → JSON list of cell values

use crate::error::{DashboardError, DataFetchError, InputShapeError};
use crate::models::{EdgeRecord, EdgeTable};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

const SCHEMA_TREE: &str = "tables:schema";

pub const SOURCE_COLUMN: &str = "SOURCE";
pub const TARGET_COLUMN: &str = "TARGET";
pub const RELATIONSHIP_COLUMN: &str = "RELATIONSHIP";

pub trait EdgeSource: Send + Sync {
    /// Stable identity used as the cache key.
    fn identity(&self) -> String;
    /// Table name shown in diagnostics.
    fn table_name(&self) -> &str;
    fn fetch(&self) -> Result<EdgeTable, DataFetchError>;
}

// ============================================================================
// Delimited Files
// ============================================================================

pub struct CsvFileSource {
    path: PathBuf,
    delimiter: u8,
    name: String,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "EDGES".to_string());
        Self {
            path,
            delimiter: b',',
            name,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Overrides the table name derived from the file stem.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl EdgeSource for CsvFileSource {
    fn identity(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn table_name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<EdgeTable, DataFetchError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataFetchError::Unreachable(format!("{}: {}", self.path.display(), e)))?;
        let table = read_delimited(file, self.delimiter)?;
        info!(source = %self.identity(), rows = table.rows.len(), "fetched edge table");
        Ok(table)
    }
}

pub fn read_delimited<R: io::Read>(reader: R, delimiter: u8) -> Result<EdgeTable, DataFetchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| DataFetchError::Schema(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DataFetchError::Schema(e.to_string()))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(EdgeTable { columns, rows })
}

// ============================================================================
// Sled Tables
// ============================================================================

/// The database is opened on first fetch, so an unreadable or locked store
/// surfaces as a fetch error rather than a startup failure.
pub struct SledTableSource {
    db: Mutex<Option<sled::Db>>,
    db_path: PathBuf,
    table: String,
}

impl SledTableSource {
    pub fn new(db_path: impl Into<PathBuf>, table: &str) -> Self {
        Self {
            db: Mutex::new(None),
            db_path: db_path.into(),
            table: table.to_string(),
        }
    }

    pub fn from_db(db: sled::Db, db_path: impl Into<PathBuf>, table: &str) -> Self {
        Self {
            db: Mutex::new(Some(db)),
            db_path: db_path.into(),
            table: table.to_string(),
        }
    }

    fn db(&self) -> Result<sled::Db, DataFetchError> {
        let mut slot = self
            .db
            .lock()
            .map_err(|e| DataFetchError::Unreachable(e.to_string()))?;
        if let Some(db) = slot.as_ref() {
            return Ok(db.clone());
        }
        let db = sled::open(&self.db_path).map_err(|e| {
            DataFetchError::Unreachable(format!("{}: {}", self.db_path.display(), e))
        })?;
        *slot = Some(db.clone());
        Ok(db)
    }
}

fn table_tree_name(table: &str) -> String {
    format!("table:{}", table)
}

impl EdgeSource for SledTableSource {
    fn identity(&self) -> String {
        format!("sled:{}#{}", self.db_path.display(), self.table)
    }

    fn table_name(&self) -> &str {
        &self.table
    }

    fn fetch(&self) -> Result<EdgeTable, DataFetchError> {
        let db = self.db()?;
        let schema_tree = db
            .open_tree(SCHEMA_TREE)
            .map_err(|e| DataFetchError::Unreachable(e.to_string()))?;
        let raw_columns = schema_tree
            .get(self.table.as_bytes())
            .map_err(|e| DataFetchError::Unreachable(e.to_string()))?
            .ok_or_else(|| DataFetchError::Schema(format!("table {} does not exist", self.table)))?;
        let columns: Vec<String> = serde_json::from_slice(&raw_columns)
            .map_err(|e| DataFetchError::Schema(format!("corrupt schema for {}: {}", self.table, e)))?;

        let rows_tree = db
            .open_tree(table_tree_name(&self.table))
            .map_err(|e| DataFetchError::Unreachable(e.to_string()))?;

        let mut rows = Vec::new();
        for entry in rows_tree.iter() {
            let (_, v) = entry.map_err(|e| DataFetchError::Unreachable(e.to_string()))?;
            let row: Vec<String> = serde_json::from_slice(&v)
                .map_err(|e| DataFetchError::Schema(format!("corrupt row in {}: {}", self.table, e)))?;
            rows.push(row);
        }

        info!(source = %self.identity(), rows = rows.len(), "fetched edge table");
        Ok(EdgeTable { columns, rows })
    }
}

/// Replaces the contents of `table` with `data`.
pub fn write_table(db: &sled::Db, table: &str, data: &EdgeTable) -> Result<(), DataFetchError> {
    let io_err = |e: sled::Error| DataFetchError::Unreachable(e.to_string());

    let schema_tree = db.open_tree(SCHEMA_TREE).map_err(io_err)?;
    let rows_tree = db.open_tree(table_tree_name(table)).map_err(io_err)?;
    rows_tree.clear().map_err(io_err)?;

    let columns =
        serde_json::to_vec(&data.columns).map_err(|e| DataFetchError::Schema(e.to_string()))?;
    schema_tree.insert(table.as_bytes(), columns).map_err(io_err)?;

    for (i, row) in data.rows.iter().enumerate() {
        let value = serde_json::to_vec(row).map_err(|e| DataFetchError::Schema(e.to_string()))?;
        rows_tree
            .insert((i as u64).to_be_bytes(), value)
            .map_err(io_err)?;
    }

    db.flush().map_err(io_err)?;
    Ok(())
}

/// Loads a delimited file into a sled table. Returns the number of rows.
pub fn import_csv_into_table(
    db: &sled::Db,
    table: &str,
    csv_path: &Path,
) -> Result<usize, DataFetchError> {
    let data = CsvFileSource::new(csv_path).fetch()?;
    write_table(db, table, &data)?;
    info!(table, rows = data.rows.len(), "imported edge table");
    Ok(data.rows.len())
}

// ============================================================================
// Shape Validation
// ============================================================================

pub fn validate_edges(table: &EdgeTable, table_name: &str) -> Result<Vec<EdgeRecord>, DashboardError> {
    let missing: Vec<&str> = [SOURCE_COLUMN, TARGET_COLUMN]
        .into_iter()
        .filter(|c| table.column_index(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(DataFetchError::Schema(format!(
            "table {} is missing column(s) {}; found [{}]",
            table_name,
            missing.join(", "),
            table.columns.join(", ")
        ))
        .into());
    }

    if table.is_empty() {
        return Err(DataFetchError::Empty(table_name.to_string()).into());
    }

    // Both present, checked above.
    let source_idx = table.column_index(SOURCE_COLUMN).unwrap_or_default();
    let target_idx = table.column_index(TARGET_COLUMN).unwrap_or_default();
    let relationship_idx = table.column_index(RELATIONSHIP_COLUMN);

    fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(|s| s.trim()).unwrap_or("")
    }

    let mut edges = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let source = cell(row, source_idx);
        let target = cell(row, target_idx);
        if source.is_empty() || target.is_empty() {
            return Err(InputShapeError {
                row: i,
                reason: format!(
                    "empty {}",
                    if source.is_empty() { SOURCE_COLUMN } else { TARGET_COLUMN }
                ),
            }
            .into());
        }
        let relationship = relationship_idx.map(|idx| cell(row, idx)).unwrap_or("");
        edges.push(EdgeRecord::new(source, target, relationship));
    }

    Ok(edges)
}

// ============================================================================
// Export
// ============================================================================

/// Serializes the original table, header first, as comma-separated text.
pub fn export_csv(table: &EdgeTable) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
