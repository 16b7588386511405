//! CSV decoding with encoding and delimiter auto-detection.
//!
//! Raw bytes are decoded (chardet + encoding_rs), the delimiter is sniffed
//! from the header line, and rows are deserialized into typed
//! [`Observation`]s by the `csv` crate. Schema checks live in
//! [`crate::dataset`]; this module only turns text into rows.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Metric, Observation, YEAR_HEADER};

/// Digit-grouped numbers such as `1,265` or `-12,000.5`.
static GROUPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").expect("static regex is valid")
});

/// CSV parsing error with context
#[derive(Debug, Clone, PartialEq)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Decoded file content with the detected settings
#[derive(Debug, Clone)]
pub struct Decoded {
    /// UTF-8 text
    pub content: String,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0,
        // UTF-8 and unknown charsets: lossy UTF-8
        _ => String::from_utf8_lossy(bytes),
    };
    // Strip a UTF-8 byte order mark so the first header matches.
    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse one numeric cell.
///
/// Empty cells and `NaN` markers are missing. Digit grouping is accepted.
/// Anything else that is not a finite number is an error.
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    let parsed = match s.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) if GROUPED_NUMBER.is_match(s) => s.replace(',', "").parse::<f64>().ok(),
        Err(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("expected a number, found '{}'", s)),
    }
}

/// Read the header record of decoded content.
pub fn read_headers(content: &str, delimiter: char) -> Result<Vec<String>, CsvError> {
    let mut reader = reader_for(content, delimiter);
    let headers = reader
        .headers()
        .map_err(|e| CsvError::new(1, format!("Cannot read header: {}", e)))?;

    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "No headers found"));
    }
    Ok(headers)
}

/// Deserialize every data row of decoded content into observations.
pub fn parse_observations(content: &str, delimiter: char) -> Result<Vec<Observation>, CsvError> {
    let mut reader = reader_for(content, delimiter);
    let header_record = reader
        .headers()
        .map_err(|e| CsvError::new(1, format!("Cannot read header: {}", e)))?
        .clone();
    let typed_columns = typed_columns(&header_record);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            CsvError::new(line, e.to_string())
        })?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        check_cells(line, &typed_columns, &header_record, &record)?;
        let obs: Observation = record
            .deserialize(Some(&header_record))
            .map_err(|e| deserialize_error(line, &e, &header_record, &record))?;
        records.push(obs);
    }

    Ok(records)
}

/// Kind of value a header holds, for cell pre-validation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CellKind {
    Year,
    Number,
}

fn typed_columns(headers: &csv::StringRecord) -> Vec<(usize, CellKind)> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            if header.trim() == YEAR_HEADER {
                Some((idx, CellKind::Year))
            } else if Metric::ALL.iter().any(|m| m.matches_header(header)) {
                Some((idx, CellKind::Number))
            } else {
                None
            }
        })
        .collect()
}

/// Validate typed cells so errors name the exact column and value.
fn check_cells(
    line: usize,
    columns: &[(usize, CellKind)],
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<(), CsvError> {
    for &(idx, kind) in columns {
        let Some(raw) = record.get(idx) else { continue };
        let result = match kind {
            CellKind::Year => raw
                .trim()
                .parse::<i32>()
                .map(|_| ())
                .map_err(|_| format!("expected a year, found '{}'", raw.trim())),
            CellKind::Number => parse_number(raw).map(|_| ()),
        };
        if let Err(message) = result {
            let mut err = CsvError::new(line, message).with_value(raw);
            if let Some(header) = headers.get(idx) {
                err = err.with_column(header.trim());
            }
            return Err(err);
        }
    }
    Ok(())
}

fn reader_for(content: &str, delimiter: char) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn deserialize_error(
    line: usize,
    err: &csv::Error,
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> CsvError {
    match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => {
            let mut csv_err = CsvError::new(line, de.kind().to_string());
            if let Some(idx) = de.field().map(|f| f as usize) {
                if let Some(header) = headers.get(idx) {
                    csv_err = csv_err.with_column(header.trim());
                }
                if let Some(value) = record.get(idx) {
                    csv_err = csv_err.with_value(value);
                }
            }
            csv_err
        }
        _ => CsvError::new(line, err.to_string()),
    }
}

/// Decode raw bytes with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let decoded = decode_auto(&std::fs::read("Energy_data.csv")?)?;
/// println!("Encoding: {}, Delimiter: '{}'", decoded.encoding, decoded.delimiter);
/// let rows = parse_observations(&decoded.content, decoded.delimiter)?;
/// ```
pub fn decode_auto(bytes: &[u8]) -> Result<Decoded, CsvError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    Ok(Decoded {
        content,
        encoding,
        delimiter,
    })
}
