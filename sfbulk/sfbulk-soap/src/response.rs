//! Response envelopes of the enterprise SOAP API and their conversion into
//! core types.

use sfbulk_core::{
    ClientError, FieldKind, MutationReceipt, ObjectSchema, ObjectSummary, QueryCursor, QueryPage,
    Record, Value,
};

use crate::xml::{XmlElement, parse_document};

/// Session established by `login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub server_url: String,
    pub session_id: String,
}

/// Parse a response document and return the `result` elements of its body.
///
/// A `Fault` body is turned into [`ClientError::Fault`].
pub fn body_results(xml: &str) -> Result<Vec<XmlElement>, ClientError> {
    let envelope = parse_document(xml)?;
    let body = envelope
        .child("Body")
        .ok_or_else(|| ClientError::decode("SOAP", "envelope has no Body"))?;
    if let Some(fault) = body.child("Fault") {
        return Err(fault_error(fault));
    }
    let response = body
        .children
        .first()
        .ok_or_else(|| ClientError::decode("SOAP", "empty Body"))?;
    Ok(response.children_named("result").cloned().collect())
}

fn single_result(xml: &str, what: &'static str) -> Result<XmlElement, ClientError> {
    body_results(xml)?
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::decode(what, "missing result element"))
}

fn fault_error(fault: &XmlElement) -> ClientError {
    let code = fault
        .child_text("faultcode")
        .or_else(|| fault.find("exceptionCode").map(|e| e.text.as_str()))
        .unwrap_or("UNKNOWN")
        .to_string();
    let message = fault
        .child_text("faultstring")
        .or_else(|| fault.find("exceptionMessage").map(|e| e.text.as_str()))
        .unwrap_or_default()
        .to_string();
    ClientError::Fault { code, message }
}

pub fn parse_login(xml: &str) -> Result<LoginResult, ClientError> {
    let result = single_result(xml, "login").map_err(|err| match err {
        ClientError::Fault { code, message } => ClientError::Auth {
            detail: format!("{code}: {message}"),
        },
        other => other,
    })?;
    let server_url = required_text(&result, "serverUrl", "login")?;
    let session_id = required_text(&result, "sessionId", "login")?;
    Ok(LoginResult {
        server_url,
        session_id,
    })
}

pub fn parse_describe(xml: &str) -> Result<ObjectSchema, ClientError> {
    let result = single_result(xml, "describeSObject")?;
    let object_type = required_text(&result, "name", "describeSObject")?;
    let fields = result
        .children_named("fields")
        .map(|field| {
            let name = required_text(field, "name", "describeSObject")?;
            let kind = FieldKind::from(field.child_text("type").unwrap_or_default());
            let length = field
                .child_text("length")
                .map(|l| l.parse::<u32>())
                .transpose()
                .map_err(|e| ClientError::decode("describeSObject", e))?
                .unwrap_or_default();
            Ok((name, kind, length))
        })
        .collect::<Result<Vec<_>, ClientError>>()?;
    Ok(ObjectSchema::from_describe(object_type, fields))
}

pub fn parse_objects(xml: &str) -> Result<Vec<ObjectSummary>, ClientError> {
    let result = single_result(xml, "describeGlobal")?;
    result
        .children_named("sobjects")
        .map(|sobject| {
            Ok(ObjectSummary {
                name: required_text(sobject, "name", "describeGlobal")?,
                label: required_text(sobject, "label", "describeGlobal")?,
            })
        })
        .collect()
}

/// Parse a `query`, `queryAll` or `queryMore` response. A nil
/// `queryLocator` means the result set is exhausted.
pub fn parse_query_page(xml: &str) -> Result<QueryPage, ClientError> {
    let result = single_result(xml, "query")?;
    let done = result.child_text("done") == Some("true");
    let total_size = result
        .child_text("size")
        .unwrap_or("0")
        .parse::<u64>()
        .map_err(|e| ClientError::decode("query", e))?;
    let cursor = result
        .child_text("queryLocator")
        .filter(|locator| !locator.is_empty())
        .map(QueryCursor::new);
    let records = result.children_named("records").map(element_to_record).collect();
    Ok(QueryPage {
        total_size,
        done,
        cursor,
        records,
    })
}

/// Parse the `SaveResult`/`DeleteResult` of a single-record mutation.
pub fn parse_save_result(xml: &str) -> Result<MutationReceipt, ClientError> {
    let result = single_result(xml, "save")?;
    let success = result.child_text("success") == Some("true");
    let errors = result
        .children_named("errors")
        .map(|error| error.child_text("message").unwrap_or_default().to_string())
        .collect();
    Ok(MutationReceipt::Outcome {
        id: result.child_text("id").map(str::to_string),
        success,
        errors,
    })
}

fn element_to_record(element: &XmlElement) -> Record {
    element
        .children
        .iter()
        .map(|child| (child.name.clone(), element_to_value(child)))
        .collect()
}

fn element_to_value(element: &XmlElement) -> Value {
    if element.is_nil() {
        Value::Null
    } else if !element.children.is_empty() {
        Value::Record(element_to_record(element))
    } else {
        Value::String(element.text.clone())
    }
}

fn required_text(
    element: &XmlElement,
    name: &str,
    what: &'static str,
) -> Result<String, ClientError> {
    element
        .child_text(name)
        .map(str::to_string)
        .ok_or_else(|| ClientError::decode(what, format!("missing <{name}>")))
}
