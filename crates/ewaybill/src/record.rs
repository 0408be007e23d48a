//! Shipment rows and the bill parsed from them

use crate::{BillError, Result};
use chrono::NaiveDateTime;
use std::fmt;

/// Column names read from the worksheet
pub mod fields {
    pub const EWB_NO: &str = "EWB No";
    pub const EWB_DATE: &str = "EWB Date";
    pub const DOC_NO: &str = "Doc.No";
    pub const DOC_DATE: &str = "Doc.Date";
    pub const VALID_TILL: &str = "Valid Till Date";
    pub const OTHER_PARTY_GSTIN: &str = "Other Party GSTIN";
    pub const FROM_GSTIN_INFO: &str = "From GSTIN Info";
    pub const TO_GSTIN_INFO: &str = "TO GSTIN Info";
    pub const HSN_CODE: &str = "Main HSN Code";
    pub const HSN_DESC: &str = "Main HSN Desc";
    pub const ASSESSABLE_VALUE: &str = "Assessable Value";
    pub const SUPPLY_TYPE: &str = "Supply Type";
}

/// Timestamp format of the date columns
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spreadsheet row with every cell as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentRecord {
    /// 1-based position in the batch
    index: usize,
    /// (column, value) in sheet column order
    fields: Vec<(String, String)>,
}

impl ShipmentRecord {
    pub fn new(index: usize, fields: Vec<(String, String)>) -> Self {
        Self { index, fields }
    }

    pub fn from_pairs<K, V>(index: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            index,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of a column; absent columns read as empty
    pub fn get(&self, field: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

impl fmt::Display for ShipmentRecord {
    /// Raw row content for diagnostics
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.fields {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value:?}")?;
            first = false;
        }
        Ok(())
    }
}

/// Place parsed from the tail of an address field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub locality: String,
    pub pin: String,
    pub state: String,
}

impl fmt::Display for Place {
    /// "<locality>,<state>-<pin>"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}-{}", self.locality, self.state, self.pin)
    }
}

/// Parse the last three whitespace-separated tokens of an address
///
/// The tokens are taken as `<locality> <pin> <state>`, so
/// `"... MainRoad 591108 KA"` yields locality `MainRoad`, pin `591108` and
/// state `KA`. Anything before them is ignored.
pub fn parse_place(field: &str, value: &str) -> Result<Place> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    match tokens.as_slice() {
        [.., locality, pin, state] => Ok(Place {
            locality: locality.to_string(),
            pin: pin.to_string(),
            state: state.to_string(),
        }),
        _ => Err(BillError::MalformedRecord(format!(
            "{field} needs at least 3 tokens (locality pin state), got {value:?}"
        ))),
    }
}

/// Group a bill number as 4-4-rest (`123456789012` -> `1234 5678 9012`)
pub fn spaced_bill_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let mut groups: Vec<String> = Vec::with_capacity(3);
    let mut rest = chars.as_slice();

    for _ in 0..2 {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(rest.len().min(4));
        groups.push(head.iter().collect());
        rest = tail;
    }
    if !rest.is_empty() {
        groups.push(rest.iter().collect());
    }

    groups.join(" ")
}

fn parse_timestamp(record: &ShipmentRecord, field: &str) -> Result<NaiveDateTime> {
    let value = record.get(field).trim();
    if value.is_empty() {
        return Err(BillError::MalformedRecord(format!("{field} is empty")));
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        BillError::MalformedRecord(format!(
            "{field} {value:?} is not YYYY-MM-DD HH:MM:SS ({e})"
        ))
    })
}

/// A row with typed dates and derived display strings
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBill {
    /// Bill number as it appears in the sheet
    pub bill_number: String,
    pub spaced_bill_number: String,
    pub issued_at: NaiveDateTime,
    pub document_date: NaiveDateTime,
    pub valid_until: NaiveDateTime,
    pub other_party_gstin: String,
    pub dispatch: Place,
    pub delivery: Place,
    pub document_number: String,
    pub goods_value: String,
    /// "<code> - <description>"
    pub hsn: String,
    pub supply_type: String,
}

impl ParsedBill {
    /// Parse a record, failing on missing dates or short address fields
    pub fn parse(record: &ShipmentRecord) -> Result<Self> {
        use fields::*;

        let issued_at = parse_timestamp(record, EWB_DATE)?;
        let document_date = parse_timestamp(record, DOC_DATE)?;
        let valid_until = parse_timestamp(record, VALID_TILL)?;

        let dispatch = parse_place(FROM_GSTIN_INFO, record.get(FROM_GSTIN_INFO))?;
        let delivery = parse_place(TO_GSTIN_INFO, record.get(TO_GSTIN_INFO))?;

        let bill_number = record.get(EWB_NO).to_string();

        Ok(Self {
            spaced_bill_number: spaced_bill_number(&bill_number),
            bill_number,
            issued_at,
            document_date,
            valid_until,
            other_party_gstin: record.get(OTHER_PARTY_GSTIN).to_string(),
            dispatch,
            delivery,
            document_number: record.get(DOC_NO).to_string(),
            goods_value: record.get(ASSESSABLE_VALUE).to_string(),
            hsn: format!("{} - {}", record.get(HSN_CODE), record.get(HSN_DESC)),
            supply_type: record.get(SUPPLY_TYPE).to_string(),
        })
    }

    /// Issue date and time, e.g. "15/03/2024 10:30 AM"
    pub fn issued_display(&self) -> String {
        self.issued_at.format("%d/%m/%Y %I:%M %p").to_string()
    }

    pub fn document_date_display(&self) -> String {
        self.document_date.format("%d/%m/%Y").to_string()
    }

    pub fn valid_until_display(&self) -> String {
        self.valid_until.format("%d/%m/%Y").to_string()
    }
}
