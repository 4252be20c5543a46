//! End-to-end tests over the default engines (write -> save -> read -> verify)

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sheetserv::prelude::*;

fn service() -> Service {
    Service::default()
}

fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).display().to_string()
}

/// Build a two-sheet workbook directly with the writer engine, for tests that
/// need more than the single sheet the service writes.
fn two_sheet_fixture(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("quarters.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();

    let mut summary = rust_xlsxwriter::Worksheet::new();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "total").unwrap();
    summary.write_number(1, 0, 99.0).unwrap();
    workbook.push_worksheet(summary);

    let mut detail = rust_xlsxwriter::Worksheet::new();
    detail.set_name("Detail").unwrap();
    detail.write_string(0, 0, "item").unwrap();
    detail.write_string(0, 1, "count").unwrap();
    detail.write_string(1, 0, "widgets").unwrap();
    detail.write_number(1, 1, 7.0).unwrap();
    workbook.push_worksheet(detail);

    workbook.save(&path).unwrap();
    path.display().to_string()
}

/// Basic roundtrip: headers plus typed data rows
#[test]
fn test_roundtrip_basic() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "people.xlsx");

    let response = service()
        .write(
            &WriteRequest::new(
                &path,
                vec![
                    vec!["Alice".into(), CellValue::Int(30)],
                    vec!["Bob".into(), CellValue::Float(25.5)],
                ],
            )
            .headers(["name", "age"]),
        )
        .unwrap();
    assert_eq!(response.rows_written, 2);
    assert_eq!(response.column_count, 2);
    assert!(response.file_size_bytes > 0);

    let data = service()
        .read(&ReadRequest::new(&path).with_headers())
        .unwrap();
    assert_eq!(data.headers, Some(vec!["name".to_string(), "age".to_string()]));
    assert_eq!(data.row_count, 2);
    assert_eq!(data.column_count, 2);
    // Integral numbers come back as Int, fractions as Float.
    assert_eq!(data.rows[0], vec!["Alice".into(), CellValue::Int(30)]);
    assert_eq!(data.rows[1], vec!["Bob".into(), CellValue::Float(25.5)]);
}

/// Datetimes survive the trip through the serial-number representation
#[test]
fn test_roundtrip_datetime() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "times.xlsx");
    let stamp = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();

    service()
        .write(&WriteRequest::new(
            &path,
            vec![vec![CellValue::DateTime(stamp)]],
        ))
        .unwrap();

    let data = service().read(&ReadRequest::new(&path)).unwrap();
    assert_eq!(data.rows[0][0], CellValue::DateTime(stamp));
}

/// A header row with zero data rows still produces a valid workbook
#[test]
fn test_header_only_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "empty.xlsx");

    let response = service()
        .write(&WriteRequest::new(&path, Vec::new()).headers(["col_a", "col_b"]))
        .unwrap();
    assert_eq!(response.rows_written, 0);
    assert_eq!(response.column_count, 2);

    let data = service()
        .read(&ReadRequest::new(&path).with_headers())
        .unwrap();
    assert_eq!(
        data.headers,
        Some(vec!["col_a".to_string(), "col_b".to_string()])
    );
    assert_eq!(data.row_count, 0);
}

/// Output paths without an extension get `.xlsx` appended
#[test]
fn test_write_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "report");

    let response = service()
        .write(&WriteRequest::new(&path, vec![vec![CellValue::Int(1)]]))
        .unwrap();
    assert!(response.file_path.ends_with("report.xlsx"));
    assert!(std::path::Path::new(&response.file_path).exists());
}

/// `max_rows` caps data rows after the header split
#[test]
fn test_max_rows_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "many.xlsx");
    let rows = (1..=5)
        .map(|n| vec![CellValue::Int(n)])
        .collect::<Vec<_>>();
    service()
        .write(&WriteRequest::new(&path, rows).headers(["n"]))
        .unwrap();

    let data = service()
        .read(&ReadRequest::new(&path).with_headers().max_rows(2))
        .unwrap();
    assert_eq!(data.headers, Some(vec!["n".to_string()]));
    assert_eq!(data.row_count, 2);
    assert_eq!(data.rows, vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]]);
}

/// An explicit range selects a window; its first row becomes the header row
#[test]
fn test_range_read_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "grid.xlsx");
    service()
        .write(
            &WriteRequest::new(
                &path,
                vec![
                    vec!["x".into(), "keep".into(), "y".into()],
                    vec![CellValue::Int(1), CellValue::Int(10), CellValue::Int(100)],
                    vec![CellValue::Int(2), CellValue::Int(20), CellValue::Int(200)],
                ],
            ),
        )
        .unwrap();

    let data = service()
        .read(&ReadRequest::new(&path).range("B1:B3").with_headers())
        .unwrap();
    assert_eq!(data.headers, Some(vec!["keep".to_string()]));
    assert_eq!(
        data.rows,
        vec![vec![CellValue::Int(10)], vec![CellValue::Int(20)]]
    );
    assert_eq!(data.column_count, 1);
    assert_eq!(data.cell_range, Some(CellRange::parse("B1:B3").unwrap()));
}

/// Ranges beyond the sheet's extent are rejected, never clamped
#[test]
fn test_range_out_of_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "small.xlsx");
    service()
        .write(&WriteRequest::new(&path, vec![vec![CellValue::Int(1)]]))
        .unwrap();

    let err = service()
        .read(&ReadRequest::new(&path).range("A1:Z99"))
        .unwrap_err();
    assert!(matches!(err, Error::RangeOutOfBounds { rows: 1, cols: 1, .. }));
}

/// Malformed and reversed ranges fail before the file's contents matter
#[test]
fn test_invalid_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "any.xlsx");
    service()
        .write(&WriteRequest::new(&path, vec![vec![CellValue::Int(1)]]))
        .unwrap();

    let err = service()
        .read(&ReadRequest::new(&path).range("1A:B2"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRangeFormat { .. }));

    let err = service()
        .read(&ReadRequest::new(&path).range("C10:A1"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRangeOrder { .. }));
}

/// All-empty rows are dropped before the cap is applied
#[test]
fn test_skip_empty_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "gaps.xlsx");
    service()
        .write(&WriteRequest::new(
            &path,
            vec![
                vec!["a".into()],
                vec![CellValue::Empty],
                vec!["b".into()],
            ],
        ))
        .unwrap();

    let data = service()
        .read(&ReadRequest::new(&path).skip_empty_rows())
        .unwrap();
    assert_eq!(data.rows, vec![vec!["a".into()], vec!["b".into()]]);
}

/// Sheet names come back in stored order, and index selection follows it
#[test]
fn test_multi_sheet_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_fixture(&dir);

    assert_eq!(
        service().list_sheets(&path).unwrap(),
        vec!["Summary".to_string(), "Detail".to_string()]
    );

    let data = service()
        .read(&ReadRequest::new(&path).sheet_index(1))
        .unwrap();
    assert_eq!(data.sheet_name, "Detail");
    assert_eq!(data.rows[1][0], CellValue::String("widgets".into()));

    let err = service()
        .read(&ReadRequest::new(&path).sheet("Missing"))
        .unwrap_err();
    match err {
        Error::SheetNotFound { name, available } => {
            assert_eq!(name, "Missing");
            assert_eq!(available, vec!["Summary".to_string(), "Detail".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

/// Single-cell lookup returns the typed value
#[test]
fn test_cell_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_fixture(&dir);

    let value = service().cell_value(&path, "A2", Some("Summary")).unwrap();
    assert_eq!(value, CellValue::Int(99));

    let value = service().cell_value(&path, "B2", Some("Detail")).unwrap();
    assert_eq!(value, CellValue::Int(7));
}

/// Workbook metadata snapshot covers every sheet
#[test]
fn test_info() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_sheet_fixture(&dir);

    let info = service().info(&path).unwrap();
    assert_eq!(info.file_format, FileFormat::Xlsx);
    assert_eq!(info.sheet_names, vec!["Summary", "Detail"]);
    assert_eq!(info.sheets.len(), 2);
    assert_eq!(info.sheets[1].name, "Detail");
    assert_eq!(info.sheets[1].index, 1);
    assert_eq!(info.sheets[1].row_count, 2);
    assert_eq!(info.sheets[1].column_count, 2);
    assert!(info.file_size_bytes > 0);
    assert!(info.modified_at.is_some());
}

/// Open failures map to the taxonomy: missing file, wrong extension, garbage
#[test]
fn test_open_error_taxonomy() {
    let dir = tempfile::tempdir().unwrap();

    let err = service()
        .read(&ReadRequest::new(temp_path(&dir, "missing.xlsx")))
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));

    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "hello").unwrap();
    let err = service()
        .read(&ReadRequest::new(txt.display().to_string()))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));

    let garbage = dir.path().join("broken.xlsx");
    std::fs::write(&garbage, b"not a zip archive").unwrap();
    let err = service()
        .read(&ReadRequest::new(garbage.display().to_string()))
        .unwrap_err();
    assert!(matches!(err, Error::CorruptFile { .. }));
}

/// Writes into a nonexistent directory fail before any rows are accepted
#[test]
fn test_path_not_writable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join("no_such_dir")
        .join("out.xlsx")
        .display()
        .to_string();

    let err = service()
        .write(&WriteRequest::new(&path, vec![vec![CellValue::Int(1)]]))
        .unwrap_err();
    assert!(matches!(err, Error::PathNotWritable { .. }));
}

/// A custom sheet name is honored on write and resolvable on read
#[test]
fn test_custom_sheet_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "named.xlsx");
    service()
        .write(
            &WriteRequest::new(&path, vec![vec![CellValue::Bool(true)]]).sheet("Results"),
        )
        .unwrap();

    let data = service()
        .read(&ReadRequest::new(&path).sheet("Results"))
        .unwrap();
    assert_eq!(data.sheet_name, "Results");
    assert_eq!(data.rows[0][0], CellValue::Bool(true));
}
