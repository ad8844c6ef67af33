//! Parsing of price blocks pasted from a spreadsheet.

use super::matrix::MatrixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasteDelimiter {
    Tab,
    Semicolon,
    Comma,
    Whitespace,
}

/// Parses pasted tabular text into rows of prices.
///
/// Spreadsheet copies are tab-separated; comma, semicolon and plain
/// whitespace separated blocks are accepted too. Leading and trailing blank
/// lines are ignored, blank cells read as `0`.
pub fn parse_price_block(text: &str) -> Result<Vec<Vec<f64>>, MatrixError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let lines = match (start, end) {
        (Some(start), Some(end)) => &lines[start..=end],
        _ => return Err(MatrixError::EmptyPaste),
    };

    let delimiter = detect_delimiter(lines);
    lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            split_cells(line, delimiter)
                .into_iter()
                .enumerate()
                .map(|(column, cell)| {
                    parse_price_cell(cell, delimiter).ok_or_else(|| MatrixError::InvalidCell {
                        row: row + 1,
                        column: column + 1,
                        value: cell.trim().to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, MatrixError>>()
        })
        .collect()
}

fn detect_delimiter(lines: &[&str]) -> PasteDelimiter {
    if lines.iter().any(|l| l.contains('\t')) {
        PasteDelimiter::Tab
    } else if lines.iter().any(|l| l.contains(';')) {
        PasteDelimiter::Semicolon
    } else if lines.iter().any(|l| l.contains(',')) {
        PasteDelimiter::Comma
    } else {
        PasteDelimiter::Whitespace
    }
}

fn split_cells(line: &str, delimiter: PasteDelimiter) -> Vec<&str> {
    match delimiter {
        PasteDelimiter::Tab => line.split('\t').collect(),
        PasteDelimiter::Semicolon => line.split(';').collect(),
        PasteDelimiter::Comma => line.split(',').collect(),
        // "Rs. 35" is one price, not two cells.
        PasteDelimiter::Whitespace => line
            .split_whitespace()
            .filter(|token| !is_currency_marker(token))
            .collect(),
    }
}

fn is_currency_marker(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "₹" | "rs" | "rs." | "inr"
    )
}

fn parse_price_cell(cell: &str, delimiter: PasteDelimiter) -> Option<f64> {
    let mut value = cell.trim().replace('₹', "");
    for prefix in ["INR", "Rs.", "Rs", "rs.", "rs"] {
        if let Some(stripped) = value.trim_start().strip_prefix(prefix) {
            value = stripped.to_string();
            break;
        }
    }
    if delimiter != PasteDelimiter::Comma {
        value = value.replace(',', "");
    }
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}
