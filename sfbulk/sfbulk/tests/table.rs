use std::io::Write;

use sfbulk::{SfBulkError, Table, load_table, read_table};

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_header_and_rows() {
    let file = csv_file("Id,LastName,Title\n003A,Smith,VP\n003B,\"Jones, Jr.\",\n");
    let table = load_table(file.path()).unwrap();

    assert_eq!(table.header(), ["Id", "LastName", "Title"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1], ["003B", "Jones, Jr.", ""]);
}

#[test]
fn blank_lines_are_skipped() {
    let table = read_table("Id,LastName\n\n003A,Smith\n\n003B,Jones\n".as_bytes()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1], ["003B", "Jones"]);
}

#[test]
fn backslash_escapes_quotes_inside_quoted_cells() {
    let table = read_table("Id,Title\n003A,\"say \\\"hi\\\"\"\n".as_bytes()).unwrap();
    assert_eq!(table.rows()[0][1], "say \"hi\"");
}

#[test]
fn backslash_escapes_delimiter_in_unquoted_cell() {
    let table = read_table("Id,LastName\n003A,Smith\\, Jr\n".as_bytes()).unwrap();
    assert_eq!(table.rows()[0], ["003A", "Smith, Jr"]);
}

#[test]
fn unquoted_escapes_keep_quotes_and_backslashes_literal() {
    let table = read_table("Id,Title\n003A,say \\\"hi\\\" \\\\o/\n003B,plain\n".as_bytes())
        .unwrap();
    assert_eq!(table.rows()[0][1], "say \"hi\" \\o/");
    assert_eq!(table.rows()[1], ["003B", "plain"]);
}

#[test]
fn escaped_newline_stays_in_cell_and_counts_as_a_line() {
    let err = read_table("Id,Title\n003A,two\\\nlines\n003B\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SfBulkError::FieldLenMismatch { line: 4, .. }), "{err}");

    let table = read_table("Id,Title\n003A,two\\\nlines\n".as_bytes()).unwrap();
    assert_eq!(table.rows()[0][1], "two\nlines");
}

#[test]
fn mismatch_after_blank_lines_reports_physical_line() {
    let err = read_table("Id,A\n\n\n003A\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SfBulkError::FieldLenMismatch { line: 4, .. }), "{err}");

    let err = read_table("Id,A\r\n\r\n003A,x\r\n003B\r\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SfBulkError::FieldLenMismatch { line: 4, .. }), "{err}");
}

#[test]
fn short_row_reports_its_line_number() {
    let file = csv_file("Id,LastName,Title\n003A,Smith,VP\n003B,Jones\n003C,Brown,CEO\n");
    let err = load_table(file.path()).unwrap_err();

    match err {
        SfBulkError::FieldLenMismatch {
            line,
            expected,
            found,
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn long_row_is_mismatch_too() {
    let err = read_table("Id\n003A\n003B,extra\n".as_bytes()).unwrap_err();
    assert_eq!(err.kind(), "FieldLenMismatch");
    assert!(err.to_string().contains("line 3"), "{err}");
}

#[test]
fn invalid_utf8_is_replaced() {
    let table = read_table(&b"Id,LastName\n003A,M\xfcller\n"[..]).unwrap();
    assert_eq!(table.rows()[0][1], "M\u{fffd}ller");
}

#[test]
fn missing_file_is_parameter_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_table(dir.path().join("nope.csv")).unwrap_err();
    assert_eq!(err.kind(), "ParameterError");
}

#[test]
fn empty_file_has_no_header() {
    let err = read_table("".as_bytes()).unwrap_err();
    assert!(matches!(err, SfBulkError::Parameter(_)));
}

#[test]
fn in_memory_table_checks_row_lengths() {
    let err = Table::new(
        vec!["Id".to_string(), "Name".to_string()],
        vec![vec!["1".to_string(), "a".to_string()], vec!["2".to_string()]],
    )
    .unwrap_err();
    assert!(matches!(err, SfBulkError::FieldLenMismatch { line: 3, .. }));
}
