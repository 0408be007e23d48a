//! Spreadsheet loading

use crate::record::ShipmentRecord;
use crate::{BillError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read every data row of `sheet` as text records
///
/// The first row is the header. Rows are numbered from 1 in sheet order.
pub fn load_records(path: &Path, sheet: &str) -> Result<Vec<ShipmentRecord>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BillError::Spreadsheet(format!("{}: {e}", path.display())))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| BillError::Spreadsheet(format!("worksheet {sheet:?}: {e}")))?;

    let records = records_from_range(&range);
    info!(path = %path.display(), sheet, rows = records.len(), "spreadsheet loaded");
    Ok(records)
}

/// Convert a cell range (header row first) into records
pub fn records_from_range(range: &Range<Data>) -> Vec<ShipmentRecord> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header = unique_headers(header.iter().map(cell_to_string).collect());
    debug!(columns = ?header, "header row");

    rows.enumerate()
        .map(|(i, row)| {
            let fields: Vec<(String, String)> = header
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(col, name)| {
                    let value = row.get(col).map(cell_to_string).unwrap_or_default();
                    (name.clone(), value)
                })
                .collect();
            ShipmentRecord::new(i + 1, fields)
        })
        .collect()
}

/// Rename repeated header names to `name.1`, `name.2`, ...
fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    names
        .into_iter()
        .map(|name| {
            if name.is_empty() {
                return name;
            }
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name.clone()
            } else {
                let renamed = format!("{name}.{count}");
                warn!(column = %name, renamed = %renamed, "duplicate column name");
                renamed
            };
            *count += 1;
            unique
        })
        .collect()
}

/// Render a cell as text the way it reads in the sheet
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| float_to_string(dt.as_f64())),
        Data::DateTimeIso(s) => s.replacen('T', " ", 1),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Whole numbers lose the ".0" so bill numbers stay digit strings
fn float_to_string(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::String("Road".to_string())), "Road");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Float(123456789012.0)), "123456789012");
        assert_eq!(cell_to_string(&Data::Float(1250.5)), "1250.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "True");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-03-15T10:30:00".to_string())),
            "2024-03-15 10:30:00"
        );
    }

    #[test]
    fn test_records_from_range() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("EWB No".to_string()));
        range.set_value((0, 1), Data::String("Doc.No".to_string()));
        range.set_value((0, 2), Data::String("Assessable Value".to_string()));
        range.set_value((1, 0), Data::Float(123456789012.0));
        range.set_value((1, 1), Data::String("INV-1".to_string()));
        range.set_value((1, 2), Data::Float(99.5));
        range.set_value((2, 0), Data::Int(111122223333));

        let records = records_from_range(&range);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index(), 1);
        assert_eq!(records[0].get("EWB No"), "123456789012");
        assert_eq!(records[0].get("Assessable Value"), "99.5");
        assert_eq!(records[1].index(), 2);
        assert_eq!(records[1].get("EWB No"), "111122223333");
        assert_eq!(records[1].get("Doc.No"), "");
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let mut range = Range::new((0, 0), (1, 3));
        range.set_value((0, 0), Data::String("EWB No".to_string()));
        range.set_value((0, 1), Data::String("Doc.No".to_string()));
        range.set_value((0, 2), Data::String("EWB No".to_string()));
        range.set_value((0, 3), Data::String("EWB No".to_string()));
        range.set_value((1, 0), Data::String("first".to_string()));
        range.set_value((1, 2), Data::String("second".to_string()));
        range.set_value((1, 3), Data::String("third".to_string()));

        let records = records_from_range(&range);

        assert_eq!(records[0].get("EWB No"), "first");
        assert_eq!(records[0].get("EWB No.1"), "second");
        assert_eq!(records[0].get("EWB No.2"), "third");
        assert_eq!(
            records[0].to_string(),
            r#"EWB No: "first", Doc.No: "", EWB No.1: "second", EWB No.2: "third""#
        );
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(records_from_range(&range).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = load_records(Path::new("no/such/book.xlsx"), "ACC");
        assert!(matches!(result, Err(BillError::Spreadsheet(_))));
    }
}
