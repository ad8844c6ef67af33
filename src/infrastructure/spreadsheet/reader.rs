//! Turns uploaded bytes into a grid of trimmed string cells.
//!
//! Delimited text goes through `csv` with flexible row lengths; workbooks go
//! through `calamine`, reading the first worksheet that holds any data.
//! Rows whose cells are all blank are dropped in both cases.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Could not parse delimited text: {0}")]
    Delimited(#[from] csv::Error),

    #[error("Could not open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheet with data")]
    NoWorksheet,
}

pub type Table = Vec<Vec<String>>;

pub fn read_delimited(text: &str, delimiter: u8) -> Result<Table, ReaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if !is_blank(&row) {
            rows.push(row);
        }
    }
    debug!(rows = rows.len(), delimiter = %(delimiter as char).escape_debug(), "Delimited text read");
    Ok(rows)
}

/// Reads the first non-empty worksheet. Blocking; callers on the async
/// runtime should wrap it in `spawn_blocking`.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Table, ReaderError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names().to_vec();

    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let rows: Table = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect::<Vec<_>>())
            .filter(|row| !is_blank(row))
            .collect();
        if !rows.is_empty() {
            debug!(sheet = %name, rows = rows.len(), "Worksheet read");
            return Ok(rows);
        }
    }
    Err(ReaderError::NoWorksheet)
}

/// Renders a cell the way an operator sees it: integral floats without a
/// trailing `.0`, so pincodes stored as numbers come out as six digits.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{:.0}", f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ragged_rows_and_skips_blank_lines() {
        let rows = read_delimited("pincode,zone\n110001 , N1\n\n,\n400001,W1,extra\n", b',').unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["pincode", "zone"],
                vec!["110001", "N1"],
                vec!["400001", "W1", "extra"],
            ]
        );
    }

    #[test]
    fn honours_quoted_delimiters() {
        let rows = read_delimited("pin\tcity\n560001\t\"Bengaluru\tUrban\"\n", b'\t').unwrap();
        assert_eq!(rows[1], vec!["560001", "Bengaluru\tUrban"]);
    }

    #[test]
    fn renders_numeric_cells_without_fraction() {
        assert_eq!(render_cell(&Data::Float(110001.0)), "110001");
        assert_eq!(render_cell(&Data::Float(12.5)), "12.5");
        assert_eq!(render_cell(&Data::Int(560001)), "560001");
        assert_eq!(render_cell(&Data::Bool(true)), "true");
        assert_eq!(render_cell(&Data::Empty), "");
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        assert!(read_workbook(b"definitely not a spreadsheet".to_vec()).is_err());
    }
}
