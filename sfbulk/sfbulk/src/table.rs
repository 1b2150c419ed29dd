//! CSV input tables.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ByteRecord, Position, ReaderBuilder};

use crate::error::SfBulkError;

const ESCAPE: u8 = b'\\';
const QUOTE: u8 = b'"';
const DELIMITER: u8 = b',';

/// Header plus data rows of one input CSV. Every row has the header's length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from in-memory rows, checking every row against the
    /// header length. Line numbers in errors assume the header is line 1.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, SfBulkError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(SfBulkError::FieldLenMismatch {
                path: "<memory>".to_string(),
                line: index as u64 + 2,
                expected: header.len(),
                found: row.len(),
            });
        }
        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a CSV file: comma delimited, backslash escapes, first line is the header.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, SfBulkError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SfBulkError::Parameter(format!("cannot read CSV file {}: {e}", path.display()))
    })?;
    read_csv(file, path)
}

/// Same as [`load_table`] for an already opened reader.
pub fn read_table<R: Read>(reader: R) -> Result<Table, SfBulkError> {
    read_csv(reader, Path::new("<input>"))
}

fn read_csv<R: Read>(mut reader: R, path: &Path) -> Result<Table, SfBulkError> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|source| SfBulkError::Io {
            path: PathBuf::from(path),
            source,
        })?;
    let input = quote_escaped_cells(&raw);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .escape(Some(ESCAPE))
        .from_reader(input.as_slice());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let more = reader.read_byte_record(&mut record).map_err(|source| SfBulkError::Csv {
            path: PathBuf::from(path),
            source,
        })?;
        if !more {
            break;
        }
        let cells: Vec<String> = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();

        let Some(expected) = header.as_ref().map(Vec::len) else {
            header = Some(cells);
            continue;
        };
        if cells.len() != expected {
            return Err(SfBulkError::FieldLenMismatch {
                path: path.display().to_string(),
                line: physical_line(&input, record.position()),
                expected,
                found: cells.len(),
            });
        }
        rows.push(cells);
    }

    let header = header.ok_or_else(|| {
        SfBulkError::Parameter(format!("CSV file {} has no header line", path.display()))
    })?;
    tracing::debug!(
        path = %path.display(),
        columns = header.len(),
        rows = rows.len(),
        "loaded table"
    );
    Ok(Table { header, rows })
}

/// Rewrite unquoted cells that contain `\<c>` escapes as quoted cells.
///
/// The csv reader honours the escape byte only inside quotes. An unquoted
/// cell such as `Smith\, Jr` is decoded here and re-emitted as
/// `"Smith, Jr"`, with quotes and backslashes escaped again. Newline
/// counts are unchanged, so record positions still name physical lines.
fn quote_escaped_cells(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    let mut field_start = true;
    while i < input.len() {
        let byte = input[i];
        if is_terminator(byte) {
            out.push(byte);
            field_start = true;
            i += 1;
            continue;
        }
        if field_start && byte == QUOTE {
            i = copy_quoted(input, i, &mut out);
            field_start = false;
            continue;
        }
        if !field_start {
            // Bytes trailing a closing quote are left to the csv reader.
            out.push(byte);
            i += 1;
            continue;
        }

        let mut cell = Vec::new();
        let mut escaped = false;
        while i < input.len() && !is_terminator(input[i]) {
            match input.get(i + 1) {
                Some(&next) if input[i] == ESCAPE => {
                    cell.push(next);
                    escaped = true;
                    i += 2;
                }
                _ => {
                    cell.push(input[i]);
                    i += 1;
                }
            }
        }
        if escaped {
            out.push(QUOTE);
            for &b in &cell {
                if b == QUOTE || b == ESCAPE {
                    out.push(ESCAPE);
                }
                out.push(b);
            }
            out.push(QUOTE);
        } else {
            out.extend_from_slice(&cell);
        }
        field_start = false;
    }
    out
}

/// Line a record starts on. The reader stamps a record with its position
/// before skipping blank lines, so newlines in that gap are added back.
fn physical_line(input: &[u8], position: Option<&Position>) -> u64 {
    let Some(position) = position else {
        return 0;
    };
    let skipped = usize::try_from(position.byte())
        .ok()
        .and_then(|start| input.get(start..))
        .unwrap_or_default()
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    position.line() + skipped as u64
}

fn is_terminator(byte: u8) -> bool {
    matches!(byte, DELIMITER | b'\n' | b'\r')
}

/// Copy a quoted cell starting at `start`, returning the index after its
/// closing quote (or the end of input).
fn copy_quoted(input: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    out.push(QUOTE);
    let mut i = start + 1;
    while i < input.len() {
        let byte = input[i];
        out.push(byte);
        i += 1;
        if byte == ESCAPE {
            if let Some(&next) = input.get(i) {
                out.push(next);
                i += 1;
            }
        } else if byte == QUOTE {
            if input.get(i) == Some(&QUOTE) {
                out.push(QUOTE);
                i += 1;
            } else {
                return i;
            }
        }
    }
    i
}
