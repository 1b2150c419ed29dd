mod test_helpers;

use chrono::{NaiveDate, NaiveDateTime};
use sfbulk::{QueryFormat, QueryNormalizer, QueryOutput, Session, SfBulkError, validate_query};
use sfbulk_core::{QueryCursor, QueryPage, QueryScope, Record, Value};
use test_helpers::{Call, StubClient};

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn attributes() -> Value {
    Value::Record(record(&[
        ("type", Value::string("Contact")),
        ("url", Value::string("/services/data/v59.0/sobjects/Contact/003A")),
    ]))
}

fn contact_page(done: bool, cursor: Option<&str>) -> QueryPage {
    QueryPage {
        total_size: 3,
        done,
        cursor: cursor.map(QueryCursor::new),
        records: vec![
            record(&[
                ("attributes", attributes()),
                ("Id", Value::string("003A")),
                ("LastName", Value::string("Smith")),
                ("CreatedDate", Value::string("2024-01-15T10:30:00.000+0000")),
            ]),
            record(&[
                ("attributes", attributes()),
                ("Id", Value::string("003B")),
                ("LastName", Value::string("None")),
                ("Birthdate", Value::string("1980-02-01")),
                ("CreatedDate", Value::string("2024-01-16T08:00:00Z")),
            ]),
        ],
    }
}

#[test]
fn query_strings_are_checked_case_sensitively() {
    assert!(validate_query("select Id from Contact").is_ok());
    assert!(validate_query("select Id, Name from Account where Name = 'x'").is_ok());
    assert!(matches!(
        validate_query("SELECT Id FROM Contact"),
        Err(SfBulkError::Parameter(_))
    ));
    assert!(validate_query("delete from Contact").is_err());
    assert!(validate_query("select Id").is_err());
}

#[test]
fn malformed_query_never_reaches_the_client() {
    let client = StubClient::new();
    let log = client.log();
    let mut session = Session::new(client);

    let err = session
        .query("Select Id from Contact", QueryFormat::Tabular, QueryScope::Live)
        .unwrap_err();
    assert_eq!(err.kind(), "ParameterError");
    assert!(log.borrow().is_empty());
}

#[test]
fn format_names() {
    assert_eq!("tabular".parse::<QueryFormat>().unwrap(), QueryFormat::Tabular);
    assert_eq!("dict".parse::<QueryFormat>().unwrap(), QueryFormat::Dict);
    assert_eq!("dictionary".parse::<QueryFormat>().unwrap(), QueryFormat::Dict);
    assert!("json".parse::<QueryFormat>().is_err());
}

#[test]
fn empty_result_skips_header_synthesis() {
    let mut normalizer = QueryNormalizer::new(&["attributes"]);
    let page = QueryPage {
        total_size: 0,
        done: true,
        cursor: None,
        records: Vec::new(),
    };
    assert_eq!(
        normalizer.normalize(page.clone(), QueryFormat::Tabular),
        QueryOutput::Tabular {
            header: Vec::new(),
            rows: Vec::new()
        }
    );
    assert_eq!(
        normalizer.normalize(page, QueryFormat::Dict),
        QueryOutput::Records(Vec::new())
    );
}

#[test]
fn tabular_header_comes_from_first_record_without_meta_keys() {
    let mut normalizer = QueryNormalizer::new(&["attributes"]);
    let output = normalizer.normalize(contact_page(true, None), QueryFormat::Tabular);

    let QueryOutput::Tabular { header, rows } = output else {
        panic!("expected tabular output");
    };
    assert_eq!(header, vec!["Id", "LastName", "CreatedDate"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][2], Value::string("2024-01-15T10:30:00.000+0000"));
    // Birthdate only appears on the second record and is dropped.
    assert_eq!(
        rows[1],
        vec![
            Value::string("003B"),
            Value::string("None"),
            Value::string("2024-01-16T08:00:00Z"),
        ]
    );
}

#[test]
fn tabular_row_missing_a_header_key_gets_null() {
    let mut normalizer = QueryNormalizer::new(&[]);
    let page = QueryPage {
        total_size: 2,
        done: true,
        cursor: None,
        records: vec![
            record(&[("Id", Value::string("1")), ("Email", Value::string("a@b.c"))]),
            record(&[("Id", Value::string("2"))]),
        ],
    };
    let QueryOutput::Tabular { rows, .. } = normalizer.normalize(page, QueryFormat::Tabular) else {
        panic!("expected tabular output");
    };
    assert_eq!(rows[1], vec![Value::string("2"), Value::Null]);
}

#[test]
fn dict_records_convert_none_and_temporal_strings() {
    let mut normalizer = QueryNormalizer::new(&["attributes"]);
    let QueryOutput::Records(records) =
        normalizer.normalize(contact_page(true, None), QueryFormat::Dict)
    else {
        panic!("expected records");
    };

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert!(first.get("attributes").is_none());
    let created = NaiveDateTime::parse_from_str("2024-01-15 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(first.get("CreatedDate"), Some(&Value::DateTime(created)));

    let second = &records[1];
    assert_eq!(second.get("LastName"), Some(&Value::Null));
    assert_eq!(
        second.get("Birthdate"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(1980, 2, 1).unwrap()))
    );
    let created = NaiveDateTime::parse_from_str("2024-01-16 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(second.get("CreatedDate"), Some(&Value::DateTime(created)));
}

#[test]
fn meta_keys_are_stripped_from_nested_records() {
    let mut normalizer = QueryNormalizer::new(&["attributes"]);
    let page = QueryPage {
        total_size: 1,
        done: true,
        cursor: None,
        records: vec![record(&[
            ("attributes", attributes()),
            (
                "Account",
                Value::Record(record(&[
                    ("attributes", attributes()),
                    ("Name", Value::string("Acme")),
                ])),
            ),
        ])],
    };
    let QueryOutput::Records(records) = normalizer.normalize(page, QueryFormat::Dict) else {
        panic!("expected records");
    };
    let account = records[0].get("Account").and_then(Value::as_record).unwrap();
    assert_eq!(account.keys().collect::<Vec<_>>(), vec!["Name"]);
}

#[test]
fn query_more_follows_the_stored_cursor() {
    let client = StubClient::new()
        .then_page(contact_page(false, Some("01gA-2000")))
        .then_page(contact_page(true, None));
    let log = client.log();
    let mut session = Session::new(client);

    let first = session
        .query("select Id from Contact", QueryFormat::Dict, QueryScope::IncludeDeleted)
        .unwrap();
    assert_eq!(first.len(), 2);
    assert!(session.has_more());

    let second = session.query_more(QueryFormat::Tabular).unwrap();
    assert_eq!(second.len(), 2);
    assert!(!session.has_more());

    assert_eq!(
        *log.borrow(),
        vec![
            Call::Query(
                "select Id from Contact".to_string(),
                QueryScope::IncludeDeleted
            ),
            Call::Continue("01gA-2000".to_string()),
        ]
    );

    let err = session.query_more(QueryFormat::Tabular).unwrap_err();
    assert!(matches!(err, SfBulkError::State(_)));
}

#[test]
fn query_more_before_any_query_is_state_error() {
    let client = StubClient::new();
    let log = client.log();
    let mut session = Session::new(client);

    let err = session.query_more(QueryFormat::Dict).unwrap_err();
    assert_eq!(err.kind(), "StateError");
    assert!(log.borrow().is_empty());
}
