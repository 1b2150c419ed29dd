use sfbulk::{
    QueryOutput,
    core::{Record, Value},
};
use sfctl::output::QueryPrinter;

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn tabular_pages_share_one_header() {
    let mut printer = QueryPrinter::new(Vec::new());
    for id in ["1", "2"] {
        printer
            .push(QueryOutput::Tabular {
                header: vec!["Id".to_string(), "Name".to_string()],
                rows: vec![vec![Value::string(id), Value::Null]],
            })
            .unwrap();
    }
    let out = String::from_utf8(printer.finish().unwrap()).unwrap();
    assert_eq!(out, "Id,Name\n1,\n2,\n");
}

#[test]
fn empty_tabular_result_prints_nothing() {
    let mut printer = QueryPrinter::new(Vec::new());
    printer
        .push(QueryOutput::Tabular {
            header: Vec::new(),
            rows: Vec::new(),
        })
        .unwrap();
    assert!(printer.finish().unwrap().is_empty());
}

#[test]
fn records_print_as_one_json_array() {
    let mut printer = QueryPrinter::new(Vec::new());
    printer
        .push(QueryOutput::Records(vec![record(&[(
            "Id",
            Value::string("003A"),
        )])]))
        .unwrap();
    printer
        .push(QueryOutput::Records(vec![record(&[("Id", Value::Null)])]))
        .unwrap();
    let out = printer.finish().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed, serde_json::json!([{"Id": "003A"}, {"Id": null}]));
}
