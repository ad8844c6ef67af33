use super::dto::SourceFormat;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Delimiters tried on the first line, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.trim().to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

/// Decides between delimited text and a workbook: by extension first, then
/// by container magic bytes, defaulting to text.
pub fn sniff_format(file_name: &str, data: &[u8]) -> SourceFormat {
    match extension_of(file_name).as_deref() {
        Some("csv" | "txt" | "tsv") => SourceFormat::Delimited,
        Some("xlsx" | "xls" | "xlsm") => SourceFormat::Workbook,
        _ if data.starts_with(ZIP_MAGIC) || data.starts_with(OLE_MAGIC) => SourceFormat::Workbook,
        _ => SourceFormat::Delimited,
    }
}

/// UTF-8 text with any BOM removed; invalid sequences are replaced rather
/// than rejected.
pub fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

/// Picks the delimiter that splits the first non-blank line into the most
/// columns. Ties go to the earlier candidate; a line with none of them is
/// treated as comma separated.
pub fn sniff_delimiter(text: &str) -> u8 {
    let Some(first) = text.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };
    let mut best = (b',', 1usize);
    for delimiter in DELIMITERS {
        let columns = count_columns(first, delimiter);
        if columns > best.1 {
            best = (delimiter, columns);
        }
    }
    best.0
}

/// Field count of one line, ignoring delimiters inside double quotes.
fn count_columns(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 1;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
