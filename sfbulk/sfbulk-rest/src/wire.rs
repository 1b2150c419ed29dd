//! JSON bodies of the REST data API and their conversion into core types.

use serde::Deserialize;
use sfbulk_core::{
    ClientError, FieldKind, FieldValues, MutationReceipt, ObjectSchema, ObjectSummary,
    QueryCursor, QueryPage, Record, Value,
};

#[derive(Debug, Deserialize)]
pub(crate) struct TokenBody {
    pub access_token: String,
    pub instance_url: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Debug, Deserialize)]
struct DescribeBody {
    name: String,
    fields: Vec<FieldBody>,
}

#[derive(Debug, Deserialize)]
struct FieldBody {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    length: u32,
}

#[derive(Debug, Deserialize)]
struct GlobalBody {
    sobjects: Vec<ObjectBody>,
}

#[derive(Debug, Deserialize)]
struct ObjectBody {
    name: String,
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody {
    total_size: u64,
    done: bool,
    next_records_url: Option<String>,
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SaveBody {
    id: Option<String>,
    success: bool,
    #[serde(default)]
    errors: Vec<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    #[serde(default, alias = "statusCode")]
    error_code: String,
}

pub(crate) fn parse_token(body: &str) -> Result<TokenBody, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::decode("token", e))
}

/// Map a failed OAuth token response onto [`ClientError::Auth`].
pub fn login_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<OAuthErrorBody>(body) {
        Ok(err) if err.error_description.is_empty() => ClientError::Auth { detail: err.error },
        Ok(err) => ClientError::Auth {
            detail: format!("{}: {}", err.error, err.error_description),
        },
        Err(_) => ClientError::Auth {
            detail: format!("HTTP status {status}"),
        },
    }
}

/// Parse a `sobjects/{type}/describe` body.
pub fn parse_describe(body: &str) -> Result<ObjectSchema, ClientError> {
    let describe: DescribeBody =
        serde_json::from_str(body).map_err(|e| ClientError::decode("describe", e))?;
    Ok(ObjectSchema::from_describe(
        describe.name,
        describe
            .fields
            .into_iter()
            .map(|f| (f.name, FieldKind::from(f.kind.as_str()), f.length)),
    ))
}

/// Parse the global `sobjects` listing.
pub fn parse_objects(body: &str) -> Result<Vec<ObjectSummary>, ClientError> {
    let global: GlobalBody =
        serde_json::from_str(body).map_err(|e| ClientError::decode("describe global", e))?;
    Ok(global
        .sobjects
        .into_iter()
        .map(|o| ObjectSummary {
            name: o.name,
            label: o.label,
        })
        .collect())
}

/// Parse a `query`/`queryAll` page. `nextRecordsUrl` becomes the cursor.
pub fn parse_query_page(body: &str) -> Result<QueryPage, ClientError> {
    let query: QueryBody =
        serde_json::from_str(body).map_err(|e| ClientError::decode("query", e))?;
    Ok(QueryPage {
        total_size: query.total_size,
        done: query.done,
        cursor: query.next_records_url.map(QueryCursor::new),
        records: query.records.into_iter().map(json_object_to_record).collect(),
    })
}

/// Interpret the status and body of a create/update/delete call.
///
/// Success bodies become structured receipts when present, bare status
/// receipts otherwise. Error arrays become failed receipts, except schema
/// faults, which are returned as errors so the batch stops.
pub fn parse_mutation_response(status: u16, body: &str) -> Result<MutationReceipt, ClientError> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(MutationReceipt::Status(status));
        }
        return Ok(match serde_json::from_str::<SaveBody>(body) {
            Ok(save) => MutationReceipt::Outcome {
                id: save.id,
                success: save.success,
                errors: save.errors.into_iter().map(|e| e.message).collect(),
            },
            Err(_) => MutationReceipt::Status(status),
        });
    }

    if status == 401 || status == 429 || status >= 500 {
        return Err(request_error(status, body));
    }

    let errors: Vec<ErrorBody> = serde_json::from_str(body).map_err(|_| ClientError::Http {
        status,
        body: body.to_string(),
    })?;
    if let Some(fault) = errors
        .iter()
        .map(|e| ClientError::Fault {
            code: e.error_code.clone(),
            message: e.message.clone(),
        })
        .find(ClientError::is_schema_fault)
    {
        return Err(fault);
    }
    Ok(MutationReceipt::failed(
        errors.into_iter().map(|e| e.message).collect(),
    ))
}

/// Map a non-2xx response of a read call onto a [`ClientError`].
pub fn request_error(status: u16, body: &str) -> ClientError {
    let first = serde_json::from_str::<Vec<ErrorBody>>(body)
        .ok()
        .and_then(|errors| errors.into_iter().next());
    match first {
        Some(err) if status == 401 => ClientError::Auth {
            detail: format!("{}: {}", err.error_code, err.message),
        },
        Some(err) if status < 500 && status != 429 => ClientError::Fault {
            code: err.error_code,
            message: err.message,
        },
        _ => ClientError::Http {
            status,
            body: body.to_string(),
        },
    }
}

pub(crate) fn payload(fields: &FieldValues) -> serde_json::Map<String, serde_json::Value> {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
        .collect()
}

fn json_object_to_record(object: serde_json::Map<String, serde_json::Value>) -> Record {
    object
        .into_iter()
        .map(|(key, value)| (key, json_to_value(value)))
        .collect()
}

fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(object) => Value::Record(json_object_to_record(object)),
    }
}
