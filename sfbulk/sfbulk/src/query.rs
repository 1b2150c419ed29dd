//! Query result normalization into tabular or keyed form.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use sfbulk_core::{QueryCursor, QueryPage, Record, Value};

use crate::error::SfBulkError;

static QUERY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^select .* from .*").expect("query pattern is valid"));

static DATETIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?)(?:Z|[+-]\d{2}:?\d{2})?$")
        .expect("date-time pattern is valid")
});

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Reject anything that does not look like `select ... from ...`.
///
/// The check is case-sensitive and happens before any network call.
pub fn validate_query(query: &str) -> Result<(), SfBulkError> {
    if QUERY_PATTERN.is_match(query) {
        Ok(())
    } else {
        Err(SfBulkError::Parameter(format!(
            "query must match 'select .* from .*': {query}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFormat {
    /// Header row derived from the first record plus one row per record.
    #[default]
    Tabular,
    /// One keyed record per result, with value post-processing.
    Dict,
}

impl QueryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tabular => "tabular",
            Self::Dict => "dict",
        }
    }
}

impl FromStr for QueryFormat {
    type Err = SfBulkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabular" => Ok(Self::Tabular),
            "dict" | "dictionary" => Ok(Self::Dict),
            other => Err(SfBulkError::Parameter(format!(
                "unrecognized query format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized query result.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Tabular {
        header: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Records(Vec<Record>),
}

impl QueryOutput {
    fn empty(format: QueryFormat) -> Self {
        match format {
            QueryFormat::Tabular => Self::Tabular {
                header: Vec::new(),
                rows: Vec::new(),
            },
            QueryFormat::Dict => Self::Records(Vec::new()),
        }
    }

    /// Number of result records.
    pub fn len(&self) -> usize {
        match self {
            Self::Tabular { rows, .. } => rows.len(),
            Self::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns query pages of either client variant into [`QueryOutput`] and keeps
/// the continuation state of the last page.
#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    meta_keys: &'static [&'static str],
    cursor: Option<QueryCursor>,
    done: bool,
}

impl QueryNormalizer {
    /// `meta_keys` are the bookkeeping keys the client variant places in
    /// records; they are removed at every nesting level.
    pub fn new(meta_keys: &'static [&'static str]) -> Self {
        Self {
            meta_keys,
            cursor: None,
            done: true,
        }
    }

    pub fn cursor(&self) -> Option<&QueryCursor> {
        self.cursor.as_ref()
    }

    /// Whether the last page reported the result set as complete.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn reset(&mut self) {
        self.cursor = None;
        self.done = true;
    }

    pub fn normalize(&mut self, page: QueryPage, format: QueryFormat) -> QueryOutput {
        self.done = page.done;
        self.cursor = if page.done { None } else { page.cursor };
        if page.total_size == 0 {
            return QueryOutput::empty(format);
        }

        let records = page.records.into_iter().map(|r| self.strip(r));
        match format {
            QueryFormat::Tabular => {
                let records: Vec<Record> = records.collect();
                // Later records with extra keys are truncated to this shape.
                let header: Vec<String> = records
                    .first()
                    .map(|first| first.keys().map(str::to_string).collect())
                    .unwrap_or_default();
                let rows = records
                    .iter()
                    .map(|record| {
                        header
                            .iter()
                            .map(|key| record.get(key).cloned().unwrap_or(Value::Null))
                            .collect()
                    })
                    .collect();
                QueryOutput::Tabular { header, rows }
            }
            QueryFormat::Dict => QueryOutput::Records(records.map(convert_record).collect()),
        }
    }

    fn strip(&self, record: Record) -> Record {
        record
            .into_iter()
            .filter(|(key, _)| !self.meta_keys.contains(&key.as_str()))
            .map(|(key, value)| (key, self.strip_value(value)))
            .collect()
    }

    fn strip_value(&self, value: Value) -> Value {
        match value {
            Value::Record(record) => Value::Record(self.strip(record)),
            Value::List(items) => {
                Value::List(items.into_iter().map(|v| self.strip_value(v)).collect())
            }
            other => other,
        }
    }
}

fn convert_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (key, convert_value(value)))
        .collect()
}

/// Keyed-format value conversion: literal `None` becomes null, ISO-8601 dates
/// and date-times become temporal values with any offset dropped.
pub fn convert_value(value: Value) -> Value {
    match value {
        Value::String(text) => convert_text(text),
        Value::Record(record) => Value::Record(convert_record(record)),
        Value::List(items) => Value::List(items.into_iter().map(convert_value).collect()),
        other => other,
    }
}

fn convert_text(text: String) -> Value {
    if text == "None" {
        return Value::Null;
    }
    if let Some(local) = DATETIME_PATTERN.captures(&text).and_then(|c| c.get(1))
        && let Ok(datetime) = NaiveDateTime::parse_from_str(local.as_str(), "%Y-%m-%dT%H:%M:%S%.f")
    {
        return Value::DateTime(datetime);
    }
    if DATE_PATTERN.is_match(&text)
        && let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
    {
        return Value::Date(date);
    }
    Value::String(text)
}
