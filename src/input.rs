use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod fields;

pub use fields::{select_records, validate_field, FieldSelection, RecordSelection, SelectedRecord};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no valid file found at input path {0}")]
    NotFound(String),
    #[error("unsupported input file format `{0}`; expected .json or .csv")]
    UnsupportedFormat(String),
    #[error("failed to read input file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse json input {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse csv input {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error(
        "csv input {path} line {line} has {found} fields but the header has {expected}; a space before an opening quote is read as part of an unquoted field"
    )]
    CsvRowLength {
        path: String,
        line: u64,
        expected: u64,
        found: u64,
    },
    #[error("invalid input document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },
    #[error("record {index} field `{field}` has an unsupported value")]
    UnsupportedValue { index: usize, field: String },
    #[error("input file {0} contains no records")]
    Empty(String),
    #[error("record {index} is missing field `{field}`")]
    MissingField { index: usize, field: String },
    #[error("record {index} field `{field}` must be a single channel name")]
    ChannelNotText { index: usize, field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

/// A cell from the input file, resolved once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A list of member names given as-is.
    Sequence(Vec<String>),
    /// A single string; as a member list it is split on `,` or `;`.
    Delimited(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Delimited(value) => Some(value.as_str()),
            FieldValue::Sequence(_) => None,
        }
    }

    /// Member names in input order.
    ///
    /// Sequences are returned untouched. Delimited values are split on `,` and
    /// `;`, each token trimmed, and empty tokens dropped.
    pub fn member_names(&self) -> Vec<String> {
        match self {
            FieldValue::Sequence(names) => names.clone(),
            FieldValue::Delimited(raw) => raw
                .split([',', ';'])
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// One row of the input file. Field order follows the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    fields: Vec<(String, FieldValue)>,
}

impl InputRecord {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Strips shell escapes and surrounding whitespace from a typed or dropped path.
pub fn normalize_input_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.replace('\\', "").trim())
}

pub fn detect_format(path: &Path) -> Result<InputFormat, InputError> {
    let extension = path
        .extension()
        .and_then(|v| v.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "json" => Ok(InputFormat::Json),
        "csv" => Ok(InputFormat::Csv),
        _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
    }
}

pub fn load_input(path: &Path) -> Result<Vec<InputRecord>, InputError> {
    let shown = path.display().to_string();
    if !path.is_file() {
        return Err(InputError::NotFound(shown));
    }
    let format = detect_format(path)?;
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: shown.clone(),
        source,
    })?;

    let records = match format {
        InputFormat::Json => parse_json_records(&raw, &shown)?,
        InputFormat::Csv => parse_csv_records(&raw, &shown)?,
    };
    if records.is_empty() {
        return Err(InputError::Empty(shown));
    }
    info!(path = %shown, records = records.len(), ?format, "loaded input file");
    Ok(records)
}

pub fn parse_json_records(raw: &str, path: &str) -> Result<Vec<InputRecord>, InputError> {
    let document: Value = serde_json::from_str(raw).map_err(|source| InputError::Json {
        path: path.to_string(),
        source,
    })?;
    let Value::Array(items) = document else {
        return Err(InputError::InvalidDocument {
            path: path.to_string(),
            reason: "top level must be an array of objects".to_string(),
        });
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(InputError::InvalidDocument {
                path: path.to_string(),
                reason: format!("record {index} is not an object"),
            });
        };
        let mut fields = Vec::with_capacity(map.len());
        for (name, value) in map {
            let value = json_field_value(value).ok_or_else(|| InputError::UnsupportedValue {
                index,
                field: name.clone(),
            })?;
            fields.push((name, value));
        }
        records.push(InputRecord::new(fields));
    }
    Ok(records)
}

fn json_scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(json_scalar_text)
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::Sequence),
        other => json_scalar_text(other).map(FieldValue::Delimited),
    }
}

pub fn parse_csv_records(raw: &str, path: &str) -> Result<Vec<InputRecord>, InputError> {
    let csv_error = |source| InputError::Csv {
        path: path.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_row_error(path, source))?;
        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.to_string(), FieldValue::Delimited(cell.to_string())))
            .collect();
        records.push(InputRecord::new(fields));
    }
    Ok(records)
}

fn csv_row_error(path: &str, source: csv::Error) -> InputError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = source.kind()
    {
        return InputError::CsvRowLength {
            path: path.to_string(),
            line: pos.as_ref().map(csv::Position::line).unwrap_or(0),
            expected: *expected_len,
            found: *len,
        };
    }
    InputError::Csv {
        path: path.to_string(),
        source,
    }
}
