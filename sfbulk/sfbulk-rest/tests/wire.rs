use sfbulk_core::{ClientError, FieldKind, MutationReceipt, Value};
use sfbulk_rest::{
    login_error, parse_describe, parse_mutation_response, parse_objects, parse_query_page,
    request_error,
};

const DESCRIBE_CONTACT: &str = r#"{
    "name": "Contact",
    "label": "Contact",
    "fields": [
        {"name": "Id", "type": "id", "length": 18, "nillable": false},
        {"name": "LastName", "type": "string", "length": 80},
        {"name": "Birthdate", "type": "date", "length": 0},
        {"name": "Amount__c", "type": "double"}
    ]
}"#;

#[test]
fn describe_body_becomes_ordered_schema() {
    let schema = parse_describe(DESCRIBE_CONTACT).unwrap();
    assert_eq!(schema.object_type(), "Contact");
    assert_eq!(schema.len(), 4);

    let id = schema.field("id").unwrap();
    assert_eq!(id.kind, FieldKind::Id);
    assert_eq!(id.length, 18);
    assert_eq!(id.position, 1);

    let amount = schema.field("AMOUNT__C").unwrap();
    assert_eq!(amount.kind, FieldKind::Double);
    assert_eq!(amount.length, 0);
    assert_eq!(amount.position, 4);
}

#[test]
fn describe_body_without_fields_is_a_decode_error() {
    let err = parse_describe(r#"{"name": "Contact"}"#).unwrap_err();
    assert!(matches!(err, ClientError::Decode { what: "describe", .. }));
}

#[test]
fn global_describe_lists_labels() {
    let objects = parse_objects(
        r#"{"encoding": "UTF-8", "sobjects": [
            {"name": "Account", "label": "Account", "queryable": true},
            {"name": "Lead", "label": "Lead"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1].name, "Lead");
    assert_eq!(objects[1].label, "Lead");
}

#[test]
fn query_page_with_next_records_url_has_cursor() {
    let page = parse_query_page(
        r#"{
            "totalSize": 3100,
            "done": false,
            "nextRecordsUrl": "/services/data/v59.0/query/01gD0000002HU6KIAW-2000",
            "records": [
                {
                    "attributes": {"type": "Contact", "url": "/services/data/v59.0/sobjects/Contact/003A"},
                    "Id": "003A",
                    "LastName": "Smith",
                    "NumberOfEmployees": 12,
                    "Score__c": 4.5,
                    "HasOptedOutOfEmail": false,
                    "Email": null
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(page.total_size, 3100);
    assert!(!page.done);
    assert_eq!(
        page.cursor.as_ref().map(|c| c.as_str()),
        Some("/services/data/v59.0/query/01gD0000002HU6KIAW-2000")
    );

    let record = &page.records[0];
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(
        keys,
        vec![
            "attributes",
            "Id",
            "LastName",
            "NumberOfEmployees",
            "Score__c",
            "HasOptedOutOfEmail",
            "Email"
        ]
    );
    assert!(matches!(record.get("attributes"), Some(Value::Record(_))));
    assert_eq!(record.get("NumberOfEmployees"), Some(&Value::Int(12)));
    assert_eq!(record.get("Score__c"), Some(&Value::Float(4.5)));
    assert_eq!(record.get("HasOptedOutOfEmail"), Some(&Value::Bool(false)));
    assert_eq!(record.get("Email"), Some(&Value::Null));
}

#[test]
fn last_query_page_has_no_cursor() {
    let page = parse_query_page(r#"{"totalSize": 0, "done": true, "records": []}"#).unwrap();
    assert!(page.done);
    assert!(page.cursor.is_none());
    assert!(page.records.is_empty());
}

#[test]
fn create_response_is_structured_receipt() {
    let receipt = parse_mutation_response(
        201,
        r#"{"id": "003D000000QV9n2IAD", "success": true, "errors": []}"#,
    )
    .unwrap();
    assert_eq!(receipt, MutationReceipt::succeeded("003D000000QV9n2IAD"));
}

#[test]
fn no_content_response_is_status_receipt() {
    let receipt = parse_mutation_response(204, "").unwrap();
    assert_eq!(receipt, MutationReceipt::Status(204));
    assert!(receipt.outcome().success);
}

#[test]
fn validation_error_array_is_failed_receipt() {
    let receipt = parse_mutation_response(
        400,
        r#"[{"message": "Required fields are missing: [LastName]", "errorCode": "REQUIRED_FIELD_MISSING", "fields": ["LastName"]}]"#,
    )
    .unwrap();
    let outcome = receipt.outcome();
    assert!(!outcome.success);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("Required fields are missing: [LastName]")
    );
}

#[test]
fn invalid_field_error_is_schema_fault() {
    let err = parse_mutation_response(
        400,
        r#"[{"message": "No such column 'Nickname' on sobject of type Contact", "errorCode": "INVALID_FIELD"}]"#,
    )
    .unwrap_err();
    assert!(err.is_schema_fault());
}

#[test]
fn server_error_is_transient_http_error() {
    let err = parse_mutation_response(503, "Service Unavailable").unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 503, .. }));
    assert!(err.is_transient());
}

#[test]
fn expired_session_is_auth_error() {
    let err = request_error(
        401,
        r#"[{"message": "Session expired or invalid", "errorCode": "INVALID_SESSION_ID"}]"#,
    );
    assert!(matches!(err, ClientError::Auth { .. }));
}

#[test]
fn unknown_object_is_fault() {
    let err = request_error(
        404,
        r#"[{"errorCode": "NOT_FOUND", "message": "The requested resource does not exist"}]"#,
    );
    assert_eq!(err.fault_code(), Some("NOT_FOUND"));
}

#[test]
fn oauth_failure_maps_to_auth_error() {
    let err = login_error(
        400,
        r#"{"error": "invalid_grant", "error_description": "authentication failure"}"#,
    );
    assert_eq!(
        err.to_string(),
        "login failed: invalid_grant: authentication failure"
    );
}
