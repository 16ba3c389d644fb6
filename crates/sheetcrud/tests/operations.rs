//! End-to-end tests for the four document operations against files on disk.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use sheetcrud::prelude::*;
use sheetcrud::SpreadsheetDocument;

#[test]
fn test_create_then_read_is_empty() {
    let (_dir, path) = scratch("new.xlsx");
    let service = OpenXmlService::new();

    service.create(&path).unwrap();
    let table = service.read(&path).unwrap();

    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_count(), 0);

    let document = SpreadsheetDocument::open(&path).unwrap();
    let names: Vec<_> = document.catalog().names().collect();
    assert_eq!(names, vec!["Sheet1"]);
    assert_eq!(document.catalog().first().unwrap().sheet_id, 1);
}

#[test]
fn test_create_overwrites_existing_file() {
    let (_dir, path) = scratch("existing.xlsx");
    std::fs::write(&path, b"not a spreadsheet").unwrap();
    let service = OpenXmlService::new();

    service.create(&path).unwrap();
    assert!(service.read(&path).unwrap().is_empty());
}

#[test]
fn test_create_in_missing_directory_is_io_error() {
    let (dir, _) = scratch("unused.xlsx");
    let path = dir.path().join("no-such-dir").join("book.xlsx");

    let err = OpenXmlService::new().create(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!path.exists());
}

#[test]
fn test_update_then_read_end_to_end() {
    let (_dir, path) = scratch("t.xlsx");
    let service = OpenXmlService::new();

    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "A5", "hello").unwrap();
    let table = service.read(&path).unwrap();

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.row(0), Some(&["hello".to_string()][..]));
}

#[test]
fn test_update_writes_plain_string_into_row_one_by_default() {
    let (_dir, path) = scratch("t.xlsx");
    let service = OpenXmlService::new();

    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "A5", "hello").unwrap();

    let sheet = read_part(&path, "xl/worksheets/sheet1.xml");
    assert!(
        sheet.contains(r#"<row r="1"><c r="A5" t="str"><v>hello</v></c></row>"#),
        "unexpected sheet xml: {sheet}"
    );
}

#[test]
fn test_update_is_idempotent() {
    let (_dir, path) = scratch("t.xlsx");
    let service = OpenXmlService::new();
    service.create(&path).unwrap();

    service.update_cell(&path, "Sheet1", "B2", "same").unwrap();
    let first = service.read(&path).unwrap();
    service.update_cell(&path, "Sheet1", "B2", "same").unwrap();
    let second = service.read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.row_count(), 1);
    assert_eq!(second.column_count(), 1);
    assert_eq!(second.cell(0, 0), Some("same"));
}

#[test]
fn test_update_overwrites_value_of_any_type() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);
    let service = OpenXmlService::new();

    service.update_cell(&path, "Data", "A1", "replaced").unwrap();

    let table = service.read(&path).unwrap();
    assert_eq!(table.cell(0, 0), Some("replaced"));
    assert_eq!(table.cell(0, 1), Some("42"));

    let sheet = read_part(&path, "xl/worksheets/data.xml");
    assert!(sheet.contains(r#"<c r="A1" t="str"><v>replaced</v></c>"#));
    // the shared-string table is left alone
    assert!(read_part(&path, "xl/sharedStrings.xml").contains("<si><t>Beta</t></si>"));
}

#[test]
fn test_update_preserves_rest_of_document() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);
    let service = OpenXmlService::new();

    service.update_cell(&path, "Data", "D1", "new").unwrap();

    assert_eq!(read_part(&path, "xl/styles.xml"), STYLES_XML);
    let sheet = read_part(&path, "xl/worksheets/data.xml");
    assert!(sheet.contains(r#"<cols><col min="1" max="1" width="20" customWidth="1"/></cols>"#));
    assert!(sheet.contains(r#"<mergeCells count="1"><mergeCell ref="A5:B5"/></mergeCells>"#));
    assert!(sheet.contains(r#"<row r="1" spans="1:2">"#));
    assert!(sheet.contains(r#"<c r="B1" s="1"><v>42</v></c>"#));
    assert!(sheet.contains(r#"<c r="D1" t="str"><v>new</v></c></row>"#));

    let table = service.read(&path).unwrap();
    assert_eq!(table.row(0).map(<[String]>::len), Some(3));
    assert_eq!(table.cell(0, 2), Some("new"));
}

#[test]
fn test_read_resolves_shared_strings_from_first_sheet() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);

    let table = OpenXmlService::new().read(&path).unwrap();

    assert_eq!(table.columns(), ["0", "1", "2"]);
    let rows: Vec<_> = table.rows().collect();
    assert_eq!(
        rows,
        vec![
            vec![Some("Beta"), Some("42"), None],
            vec![Some("Alpha"), Some("plain"), Some("1")],
            vec![Some("two"), None, None],
        ]
    );
}

#[test]
fn test_read_shared_string_out_of_range_is_format_error() {
    let (_dir, path) = scratch("bad-index.xlsx");
    let sheet = DATA_SHEET_XML.replace(r#"<c r="A1" t="s"><v>1</v></c>"#, r#"<c r="A1" t="s"><v>7</v></c>"#);
    write_shared_string_workbook_with(&path, &sheet);

    let err = OpenXmlService::new().read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_read_missing_file_is_io_error() {
    let (_dir, path) = scratch("missing.xlsx");
    let err = OpenXmlService::new().read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_read_non_package_is_format_error() {
    let (_dir, path) = scratch("garbage.xlsx");
    std::fs::write(&path, b"plain text, not a zip archive").unwrap();

    let err = OpenXmlService::new().read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_read_package_without_workbook_is_format_error() {
    let (_dir, path) = scratch("empty.xlsx");
    write_package(
        &path,
        &[
            ("[Content_Types].xml", "<Types/>"),
            ("_rels/.rels", "<Relationships/>"),
        ],
    );

    let err = OpenXmlService::new().read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_read_workbook_without_sheets_is_format_error() {
    let (_dir, path) = scratch("no-sheets.xlsx");
    write_package(
        &path,
        &[
            ("[Content_Types].xml", "<Types/>"),
            (
                "_rels/.rels",
                r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
            ),
            ("xl/workbook.xml", "<workbook><sheets/></workbook>"),
        ],
    );

    let err = OpenXmlService::new().read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_delete_present_row() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);
    let service = OpenXmlService::new();

    assert!(service.delete_row(&path, "Data", 3).unwrap());

    let table = service.read(&path).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 0), Some("Beta"));
    assert_eq!(table.cell(1, 0), Some("two"));
    assert!(read_part(&path, "xl/worksheets/data.xml").contains("<mergeCells"));
}

#[test]
fn test_delete_absent_row_is_noop() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);
    let before = std::fs::read(&path).unwrap();
    let service = OpenXmlService::new();

    assert!(!service.delete_row(&path, "Data", 99).unwrap());

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(service.read(&path).unwrap().row_count(), 3);
}

#[test]
fn test_unknown_sheet_is_invalid_argument_without_mutation() {
    let (_dir, path) = scratch("shared.xlsx");
    write_shared_string_workbook(&path);
    let before = std::fs::read(&path).unwrap();
    let service = OpenXmlService::new();

    let err = service.update_cell(&path, "data", "A1", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = service.delete_row(&path, "Nope", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_parsed_row_numbers_address_the_named_row() {
    let (_dir, path) = scratch("rows.xlsx");
    let service = OpenXmlService::with_options(CodecOptions::new().parse_row_numbers());

    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "B5", "five").unwrap();
    service.update_cell(&path, "Sheet1", "A2", "two").unwrap();

    let sheet = read_part(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="5"><c r="B5" t="str"><v>five</v></c></row><row r="2">"#));

    assert!(service.delete_row(&path, "Sheet1", 5).unwrap());
    let table = service.read(&path).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.cell(0, 0), Some("two"));
}

#[test]
fn test_malformed_reference_is_format_error_without_mutation() {
    let (_dir, path) = scratch("rows.xlsx");
    let service = OpenXmlService::with_options(CodecOptions::new().parse_row_numbers());
    service.create(&path).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = service.update_cell(&path, "Sheet1", "R1C1", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_stored_compression_round_trips() {
    let (_dir, path) = scratch("stored.xlsx");
    let service =
        OpenXmlService::with_options(CodecOptions::new().with_compression(Compression::Stored));

    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "A1", "kept").unwrap();

    assert_eq!(service.read(&path).unwrap().cell(0, 0), Some("kept"));
}

#[test]
fn test_service_is_usable_as_trait_object() {
    let (_dir, path) = scratch("dyn.xlsx");
    let service: Box<dyn SheetService> = Box::new(OpenXmlService::new());

    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "R1C1", "Updated Value").unwrap();
    assert!(service.delete_row(&path, "Sheet1", 1).unwrap());
    assert!(service.read(&path).unwrap().is_empty());
}

/// Make `path` read-only. Returns `false` when the file is still writable
/// afterwards (e.g. running as root), in which case the caller skips.
#[cfg(unix)]
fn make_read_only(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o444)).unwrap();
    std::fs::OpenOptions::new().write(true).open(path).is_err()
}

#[cfg(unix)]
#[test]
fn test_create_over_read_only_file_is_io_error() {
    let (_dir, path) = scratch("locked.xlsx");
    let service = OpenXmlService::new();
    service.create(&path).unwrap();
    service.update_cell(&path, "Sheet1", "A1", "keep").unwrap();
    if !make_read_only(&path) {
        return;
    }
    let before = std::fs::read(&path).unwrap();

    let err = service.create(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[cfg(unix)]
#[test]
fn test_update_read_only_file_is_io_error() {
    let (_dir, path) = scratch("locked.xlsx");
    let service = OpenXmlService::new();
    service.create(&path).unwrap();
    if !make_read_only(&path) {
        return;
    }
    let before = std::fs::read(&path).unwrap();

    let err = service.update_cell(&path, "Sheet1", "A1", "sneaky").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert!(service.read(&path).unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_update_through_symlink_writes_real_file() {
    let (dir, real) = scratch("real.xlsx");
    let link = dir.path().join("link.xlsx");
    let service = OpenXmlService::new();
    service.create(&real).unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    service.update_cell(&link, "Sheet1", "A1", "via link").unwrap();

    let link_meta = std::fs::symlink_metadata(&link).unwrap();
    assert!(link_meta.file_type().is_symlink());
    assert_eq!(service.read(&real).unwrap().cell(0, 0), Some("via link"));
}

#[test]
fn test_update_keeps_untouched_cells_byte_for_byte() {
    let (_dir, path) = scratch("rich.xlsx");
    let sheet = DATA_SHEET_XML
        .replace(
            r#"<c r="C3" t="b"><v>1</v></c>"#,
            r#"<c r="C3" t="b"><v>true</v></c>"#,
        )
        .replace(
            r#"<is><t>two</t></is>"#,
            r#"<is><r><rPr><b/></rPr><t>t</t></r><r><t>wo</t></r></is>"#,
        );
    write_shared_string_workbook_with(&path, &sheet);
    let service = OpenXmlService::new();

    service.update_cell(&path, "Data", "D1", "new").unwrap();

    let saved = read_part(&path, "xl/worksheets/data.xml");
    assert!(saved.contains(r#"<c r="C3" t="b"><v>true</v></c>"#));
    assert!(saved.contains(
        r#"<c r="A2" t="inlineStr"><is><r><rPr><b/></rPr><t>t</t></r><r><t>wo</t></r></is></c>"#
    ));
    assert_eq!(service.read(&path).unwrap().cell(2, 0), Some("two"));
}
