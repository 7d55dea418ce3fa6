use crate::coding_oa::ResponseTable;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading an uploaded response file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("file has no extension")]
    MissingExtension,

    #[error("file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    NoSheets,
}

/// Read a CSV document into a response table
///
/// The first record is the header. Fields may be quoted; a doubled quote inside
/// a quoted field is a literal quote, and a quoted field may span several
/// lines. Blank lines are skipped.
///
/// # Arguments
/// * `content` - The whole CSV document, optionally starting with a BOM
///
/// # Returns
/// * `ResponseTable` - Header plus data records; empty input gives an empty table
///
/// # Examples
/// ```
/// use survey_syntax::loader::table_from_csv;
///
/// let table = table_from_csv("Vrid,R1\n1001,\"3\"\n");
/// assert_eq!(table.headers, vec!["Vrid", "R1"]);
/// assert_eq!(table.rows, vec![vec!["1001", "3"]]);
/// ```
pub fn table_from_csv(content: &str) -> ResponseTable {
    let content = content.trim_start_matches('\u{feff}');
    let mut records = parse_csv_records(content).into_iter();

    let headers = match records.next() {
        Some(record) => record.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return ResponseTable::default(),
    };

    ResponseTable::new(headers, records.collect())
}

// Parse a CSV document into records, ending a record only at an unquoted newline
fn parse_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Double quote inside quoted field - add a single quote
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                record.push(std::mem::take(&mut current_field));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut current_field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => current_field.push(c),
        }
    }

    // Add the last record when the document does not end with a newline
    if !current_field.is_empty() || !record.is_empty() {
        record.push(current_field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = matches!(record.as_slice(), [only] if only.trim().is_empty());
    if !blank {
        records.push(record);
    }
}

/// Read the first sheet of a workbook (xlsx, xlsm, xlsb, xls, ods) held in memory
///
/// The first row is the header; every cell is rendered as text and empty cells
/// become empty strings.
pub fn table_from_workbook(bytes: Vec<u8>) -> Result<ResponseTable, LoadError> {
    use calamine::{Reader, open_workbook_auto_from_rs};
    use std::io::Cursor;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheets)??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    let headers = match rows.next() {
        Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(ResponseTable::default()),
    };

    Ok(ResponseTable::new(headers, rows.collect()))
}

/// Detect the file type from its name and load the appropriate format
pub fn load_table(file_name: &str, bytes: Vec<u8>) -> Result<ResponseTable, LoadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let table = match extension.as_deref() {
        Some("csv") => table_from_csv(&String::from_utf8(bytes)?),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => table_from_workbook(bytes)?,
        Some(ext) => return Err(LoadError::UnsupportedExtension(ext.to_string())),
        None => return Err(LoadError::MissingExtension),
    };

    log::debug!(
        "loaded {} with {} columns and {} rows",
        file_name,
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}
