//! e-Way Bill generation
//!
//! This crate provides:
//! - Loading shipment rows from a spreadsheet worksheet
//! - Parsing rows into typed bills (dates, places, spaced bill number)
//! - QR code and Code 128 barcode generation
//! - Laying out the bill tables and writing one PDF per row
//! - A batch driver that isolates per-row failures into a report
//!
//! # Example
//!
//! ```ignore
//! use ewaybill::{load_records, run_batch, BatchConfig, IssuerConfig};
//!
//! let config = BatchConfig::default();
//! let records = load_records(&config.input, &config.sheet)?;
//! let report = run_batch(&records, &config, &IssuerConfig::default());
//! println!("{} written, {} skipped", report.written(), report.skipped());
//! ```

pub mod batch;
pub mod config;
pub mod layout;
pub mod record;
pub mod sheet;
pub mod symbols;
pub mod writer;

pub use batch::{run_batch, BatchReport, RowOutcome};
pub use config::{BatchConfig, Config, IssuerConfig};
pub use layout::StyleSheet;
pub use record::{parse_place, spaced_bill_number, ParsedBill, Place, ShipmentRecord};
pub use sheet::load_records;
pub use writer::{output_path, DocumentWriter};

use thiserror::Error;

/// Errors that can occur while producing a bill
#[derive(Debug, Error)]
pub enum BillError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for bill operations
pub type Result<T> = std::result::Result<T, BillError>;
