//! Table model and the fetch collaborator that loads named tables.
//!
//! A [`Table`] is the in-memory form of one sheet: an ordered header plus
//! ordered data rows, immutable once read. [`TableSource`] abstracts where
//! tables come from; the shipped implementation, [`CsvWorkbook`], resolves a
//! table name to `<workbook>/<name>.csv` and reads it through the io layer.

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::Encoding;
use thiserror::Error;

use crate::{config::SourceConfig, io_utils};

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// True when the table holds no data rows (the header does not count).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("table '{name}' not found in workbook {workbook:?}")]
    TableNotFound { name: String, workbook: PathBuf },
    #[error("reading table '{name}': {message}")]
    Read { name: String, message: String },
}

pub trait TableSource {
    fn fetch(&self, name: &str) -> Result<Table, SourceError>;
}

/// File-backed table source: one CSV (or TSV) file per table name inside a
/// workbook directory.
pub struct CsvWorkbook {
    root: PathBuf,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
}

impl CsvWorkbook {
    pub fn open(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            root: config.workbook.clone(),
            delimiter: config.delimiter_byte()?,
            encoding: io_utils::resolve_encoding(config.encoding.as_deref())?,
        })
    }

    fn table_path(&self, name: &str) -> PathBuf {
        let csv = self.root.join(format!("{name}.csv"));
        if csv.is_file() {
            return csv;
        }
        let tsv = self.root.join(format!("{name}.tsv"));
        if tsv.is_file() { tsv } else { csv }
    }

    fn read_table(&self, name: &str, path: &Path) -> Result<Table> {
        let delimiter = io_utils::resolve_input_delimiter(path, self.delimiter);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
        let headers = io_utils::reader_headers(&mut reader, self.encoding)?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record
                .map_err(anyhow::Error::from)
                .and_then(|record| io_utils::decode_record(&record, self.encoding))
                .map_err(|err| err.context(format!("Reading row {}", row_idx + 2)))?;
            rows.push(record);
        }
        Ok(Table::new(name, headers, rows))
    }
}

impl TableSource for CsvWorkbook {
    fn fetch(&self, name: &str) -> Result<Table, SourceError> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(SourceError::TableNotFound {
                name: name.to_string(),
                workbook: self.root.clone(),
            });
        }
        self.read_table(name, &path)
            .map_err(|err| SourceError::Read {
                name: name.to_string(),
                message: format!("{err:#}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn workbook_with(name: &str, contents: &str) -> (tempfile::TempDir, CsvWorkbook) {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(name), contents).expect("write table");
        let config = SourceConfig {
            workbook: dir.path().to_path_buf(),
            delimiter: None,
            encoding: None,
        };
        let workbook = CsvWorkbook::open(&config).expect("open workbook");
        (dir, workbook)
    }

    #[test]
    fn fetch_reads_headers_and_rows() {
        let (_dir, workbook) =
            workbook_with("players.csv", "Name,Pos,Team\nLeBron James,F,LAL\n");
        let table = workbook.fetch("players").expect("fetch table");
        assert_eq!(table.headers, vec!["Name", "Pos", "Team"]);
        assert_eq!(table.rows, vec![vec!["LeBron James", "F", "LAL"]]);
        assert!(!table.is_empty());
    }

    #[test]
    fn fetch_header_only_table_is_empty() {
        let (_dir, workbook) = workbook_with("projections.csv", "Name,Team,Proj\n");
        let table = workbook.fetch("projections").expect("fetch table");
        assert!(table.is_empty());
    }

    #[test]
    fn fetch_missing_table_reports_not_found() {
        let (_dir, workbook) = workbook_with("players.csv", "Name\n");
        let err = workbook.fetch("projections").expect_err("missing table");
        assert!(matches!(err, SourceError::TableNotFound { .. }));
    }
}
