//! Delimited text reader producing a typed `Table`.
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};

use crate::error::PipelineError;
use crate::io::DatasetSource;
use crate::table::{Column, Table};

/// Cell contents treated as missing values.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Read a delimited file with a header row. A column is numeric when every
/// present cell parses as a float, categorical otherwise.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read header row")?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(anyhow!("Header row is empty"));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        for (col_idx, cell) in record.iter().enumerate() {
            cells[col_idx].push((!is_missing(cell)).then(|| cell.to_string()));
        }
    }

    let names: Vec<String> = headers.iter().map(str::to_string).collect();
    let columns: Vec<Column> = cells.into_iter().map(infer_column).collect();
    Ok(Table::new(names, columns)?)
}

fn infer_column(cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Categorical(cells),
    }
}

fn delimiter_for(path: &Path) -> u8 {
    let is_tsv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

/// A CSV (or TSV, by extension) file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    pub path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSource { path: path.into() }
    }
}

impl DatasetSource for CsvFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> crate::error::Result<Table> {
        std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))
            .and_then(|f| read_table(f, delimiter_for(&self.path)))
            .map_err(|e| PipelineError::acquisition(self.describe(), format!("{:#}", e)))
    }
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct CsvBytesSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl CsvBytesSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        CsvBytesSource {
            name: name.into(),
            bytes,
        }
    }
}

impl DatasetSource for CsvBytesSource {
    fn describe(&self) -> String {
        format!("upload {}", self.name)
    }

    fn fetch(&self) -> crate::error::Result<Table> {
        read_table(self.bytes.as_slice(), delimiter_for(Path::new(&self.name)))
            .map_err(|e| PipelineError::acquisition(self.describe(), format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_numeric_and_categorical() {
        let data = "age,sex,Heart Disease\n50,Laki-laki,Presence\n,Perempuan,Absence\n";
        let table = read_table(data.as_bytes(), b',').unwrap();
        assert_eq!(table.nrows(), 2);
        assert_eq!(
            table.column("age"),
            Some(&Column::Numeric(vec![Some(50.0), None]))
        );
        assert!(!table.column("sex").unwrap().is_numeric());
    }

    #[test]
    fn missing_markers_are_none() {
        let data = "x,y\nNA,a\nnan,NULL\n";
        let table = read_table(data.as_bytes(), b',').unwrap();
        assert_eq!(table.column("x"), Some(&Column::Numeric(vec![None, None])));
        assert_eq!(
            table.column("y"),
            Some(&Column::Categorical(vec![Some("a".to_string()), None]))
        );
    }

    #[test]
    fn ragged_rows_fail() {
        let data = "x,y\n1,2\n3\n";
        assert!(read_table(data.as_bytes(), b',').is_err());
    }

    #[test]
    fn duplicate_headers_fail() {
        let data = "x,x\n1,2\n";
        assert!(read_table(data.as_bytes(), b',').is_err());
    }

    #[test]
    fn tsv_extension_switches_delimiter() {
        let source = CsvBytesSource::new("upload.tsv", b"a\tb\n1\t2\n".to_vec());
        let table = source.fetch().unwrap();
        assert_eq!(table.ncols(), 2);
    }
}
