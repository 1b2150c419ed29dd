//! Batch mutation engine: one remote create/update/delete per CSV row, with
//! per-row outcome classification and success/failure artifacts.

use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
    str::FromStr,
};

use sfbulk_core::{
    ClientError, CrmClient, FieldDescriptor, FieldValues, ObjectSchema, ReceiptOutcome,
};

use crate::{error::SfBulkError, table::Table};

/// Rows between two [`BatchEvent::Progress`] observations.
pub const PROGRESS_INTERVAL: usize = 50;

const ID_COLUMN: &str = "Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether the first column carries the record id instead of a field.
    pub fn needs_id(&self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }

    /// Label written to the `Status` column of the success artifact.
    pub fn past_tense(&self) -> String {
        past_tense_label(self.as_str())
    }
}

impl FromStr for Action {
    type Err = SfBulkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(SfBulkError::Parameter(format!(
                "unknown action '{other}', expected create, update or delete"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capitalized past tense of an action name: `create` → `Created`.
///
/// The three known actions take a `d`; anything else takes `ed`.
pub fn past_tense_label(action: &str) -> String {
    let suffix = match action {
        "create" | "delete" | "update" => "d",
        _ => "ed",
    };
    let mut chars = action.chars();
    let mut label = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    label.push_str(suffix);
    label
}

/// Observation emitted while a batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent<'a> {
    /// About to dispatch the row with this 1-based number.
    Row { number: usize, row: &'a [String] },
    /// Emitted every [`PROGRESS_INTERVAL`] rows.
    Progress {
        processed: usize,
        successes: usize,
        failures: usize,
    },
}

/// Counts and artifact locations of a finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub action: Action,
    pub success_count: usize,
    pub failure_count: usize,
    /// `None` when no row succeeded.
    pub success_path: Option<PathBuf>,
    /// `None` when no row failed.
    pub failure_path: Option<PathBuf>,
}

impl BatchResult {
    pub fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Operator summary, one line for successes and one for failures.
    pub fn summary_lines(&self) -> [String; 2] {
        [
            summary_line(
                &format!("{:>6} successes", self.success_count),
                self.success_path.as_deref(),
            ),
            summary_line(
                &format!("{:>6} failures ", self.failure_count),
                self.failure_path.as_deref(),
            ),
        ]
    }
}

fn summary_line(counts: &str, path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{counts} ({})", path.display()),
        None => counts.to_string(),
    }
}

/// Unique id shared by the two artifacts of one batch.
pub fn artifact_id() -> String {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{stamp}_{}", &suffix[..8])
}

/// Output CSV created on its first row.
struct Artifact {
    path: PathBuf,
    header: Vec<String>,
    // csv::Writer flushes its buffer when dropped, so rows written before an
    // abort still reach the file.
    writer: Option<csv::Writer<File>>,
    rows: usize,
}

impl Artifact {
    fn new(path: PathBuf, header: &[String], last_column: &str) -> Self {
        let mut header = header.to_vec();
        header.push(last_column.to_string());
        Self {
            path,
            header,
            writer: None,
            rows: 0,
        }
    }

    fn write(&mut self, row: &[String], last: &str) -> Result<(), SfBulkError> {
        let writer = match &mut self.writer {
            Some(writer) => writer,
            empty => {
                let file = File::create(&self.path).map_err(|source| SfBulkError::Io {
                    path: self.path.clone(),
                    source,
                })?;
                let mut writer = csv::Writer::from_writer(file);
                writer.write_record(&self.header).map_err(|source| SfBulkError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
                tracing::debug!(path = %self.path.display(), "created artifact");
                empty.insert(writer)
            }
        };
        writer
            .write_record(row.iter().map(String::as_str).chain([last]))
            .map_err(|source| SfBulkError::Csv {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> Result<Option<PathBuf>, SfBulkError> {
        let Some(mut writer) = self.writer else {
            return Ok(None);
        };
        writer.flush().map_err(|source| SfBulkError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), rows = self.rows, "wrote artifact");
        Ok(Some(self.path))
    }
}

/// Check the header against the first-column rule of `action`.
pub(crate) fn check_id_column(header: &[String], action: Action) -> Result<(), SfBulkError> {
    if !action.needs_id() {
        return Ok(());
    }
    match header.first() {
        Some(first) if first.eq_ignore_ascii_case(ID_COLUMN) => Ok(()),
        other => Err(SfBulkError::Parameter(format!(
            "{action} requires '{ID_COLUMN}' as the first column, found '{}'",
            other.map(String::as_str).unwrap_or_default()
        ))),
    }
}

/// Resolve every data column of `header` to a field of `schema`.
fn resolve_columns<'s>(
    schema: &'s ObjectSchema,
    header: &[String],
    action: Action,
) -> Result<Vec<&'s FieldDescriptor>, SfBulkError> {
    let skip = usize::from(action.needs_id());
    header
        .iter()
        .skip(skip)
        .map(|column| {
            schema.field(column).ok_or_else(|| {
                SfBulkError::Validation(format!(
                    "{column} is not a valid field name for {}",
                    schema.object_type()
                ))
            })
        })
        .collect()
}

/// Payload of one row: date and double fields with an empty cell are left out.
fn row_payload(columns: &[&FieldDescriptor], cells: &[String]) -> FieldValues {
    columns
        .iter()
        .zip(cells)
        .filter(|(field, cell)| !(field.kind.skips_empty() && cell.is_empty()))
        .map(|(field, cell)| (field.name.as_str(), cell.as_str()))
        .collect()
}

fn dispatch<C: CrmClient + ?Sized>(
    client: &C,
    object_type: &str,
    action: Action,
    id: &str,
    fields: &FieldValues,
) -> Result<ReceiptOutcome, ClientError> {
    let receipt = match action {
        Action::Create => client.create_record(object_type, fields)?,
        Action::Update => client.update_record(object_type, id, fields)?,
        Action::Delete => client.delete_record(object_type, id)?,
    };
    Ok(receipt.outcome())
}

/// Run `action` over every row of `table`.
///
/// The header is validated against `schema` before the first row is sent.
/// A failed receipt or a non-schema client error becomes a failure row and the
/// batch continues; a schema fault from the remote side aborts it.
pub(crate) fn run_batch<C: CrmClient + ?Sized>(
    client: &C,
    schema: &ObjectSchema,
    table: &Table,
    action: Action,
    output_dir: &Path,
    observer: &mut dyn FnMut(BatchEvent<'_>),
) -> Result<BatchResult, SfBulkError> {
    let columns = resolve_columns(schema, table.header(), action)?;
    let object_type = schema.object_type();
    let id = artifact_id();
    let mut successes = Artifact::new(
        output_dir.join(format!("success_{object_type}_{id}.csv")),
        table.header(),
        "Status",
    );
    let mut failures = Artifact::new(
        output_dir.join(format!("failure_{object_type}_{id}.csv")),
        table.header(),
        "Failure",
    );
    let label = action.past_tense();
    tracing::info!(%action, object_type, rows = table.len(), "starting batch");

    for (index, row) in table.rows().iter().enumerate() {
        observer(BatchEvent::Row {
            number: index + 1,
            row,
        });

        let (record_id, cells) = if action.needs_id() {
            (row[0].as_str(), &row[1..])
        } else {
            ("", &row[..])
        };
        let fields = row_payload(&columns, cells);

        match dispatch(client, object_type, action, record_id, &fields) {
            Ok(outcome) if outcome.success => successes.write(row, &label)?,
            Ok(outcome) => {
                let message = outcome.error_message.unwrap_or_default();
                tracing::debug!(row = index + 1, %message, "row failed");
                failures.write(row, &message)?;
            }
            Err(err) if err.is_schema_fault() => return Err(err.into()),
            Err(err) => {
                tracing::warn!(row = index + 1, %err, "row failed with client error");
                failures.write(row, &err.to_string())?;
            }
        }

        let processed = index + 1;
        if processed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                processed,
                successes = successes.rows,
                failures = failures.rows,
                "batch progress"
            );
            observer(BatchEvent::Progress {
                processed,
                successes: successes.rows,
                failures: failures.rows,
            });
        }
    }

    let success_count = successes.rows;
    let failure_count = failures.rows;
    let failure_path = failures.finish()?;
    let success_path = successes.finish()?;
    Ok(BatchResult {
        action,
        success_count,
        failure_count,
        success_path,
        failure_path,
    })
}
