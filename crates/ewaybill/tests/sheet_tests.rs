//! Loading records from a real workbook on disk

use ewaybill::record::fields;
use ewaybill::{load_records, run_batch, BatchConfig, BillError, IssuerConfig};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

/// Write a workbook with an `ACC` sheet: a header row and two shipments
fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("ACC").unwrap();

    let headers = [
        fields::EWB_NO,
        fields::EWB_DATE,
        fields::DOC_NO,
        fields::DOC_DATE,
        fields::VALID_TILL,
        fields::FROM_GSTIN_INFO,
        fields::TO_GSTIN_INFO,
        fields::ASSESSABLE_VALUE,
    ];
    for (col, name) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let date = |text: &str| ExcelDateTime::parse_from_str(text).unwrap();

    let rows = [(1u32, 123456789012.0, "INV-1"), (2, 210987654321.0, "INV-2")];
    for (row, number, doc_no) in rows {
        sheet.write_number(row, 0, number).unwrap();
        sheet
            .write_datetime_with_format(row, 1, &date("2024-03-15 10:30:00"), &date_format)
            .unwrap();
        sheet.write_string(row, 2, doc_no).unwrap();
        sheet
            .write_datetime_with_format(row, 3, &date("2024-03-14 00:00:00"), &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(row, 4, &date("2024-03-20 23:59:00"), &date_format)
            .unwrap();
        sheet.write_string(row, 5, "ACC Plant MainRoad 591108 KA").unwrap();
        sheet.write_string(row, 6, "Depot Hubli 580020 KA").unwrap();
        sheet.write_number(row, 7, 245000.5).unwrap();
    }

    workbook.save(path).unwrap();
}

#[test]
fn test_load_records_reads_typed_cells_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final_data.xlsx");
    write_workbook(&path);

    let records = load_records(&path, "ACC").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].index(), 1);
    assert_eq!(records[0].get(fields::EWB_NO), "123456789012");
    assert_eq!(records[0].get(fields::EWB_DATE), "2024-03-15 10:30:00");
    assert_eq!(records[0].get(fields::VALID_TILL), "2024-03-20 23:59:00");
    assert_eq!(records[0].get(fields::ASSESSABLE_VALUE), "245000.5");
    assert_eq!(records[1].index(), 2);
    assert_eq!(records[1].get(fields::DOC_NO), "INV-2");
    assert_eq!(records[1].get(fields::HSN_CODE), "");
}

#[test]
fn test_missing_worksheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final_data.xlsx");
    write_workbook(&path);

    let result = load_records(&path, "JAN");
    assert!(matches!(result, Err(BillError::Spreadsheet(_))));
}

#[test]
fn test_workbook_rows_become_pdfs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final_data.xlsx");
    write_workbook(&path);
    let output = dir.path().join("output");
    std::fs::create_dir(&output).unwrap();

    let records = load_records(&path, "ACC").unwrap();
    let config = BatchConfig {
        output_dir: output.clone(),
        ..BatchConfig::default()
    };
    let report = run_batch(&records, &config, &IssuerConfig::default());

    assert_eq!(report.written(), 2);
    assert!(output.join("1.123456789012.pdf").exists());
    assert!(output.join("2.210987654321.pdf").exists());
}
