//! Batch driver: one bill per row, failures isolated per row

use crate::config::{BatchConfig, IssuerConfig};
use crate::record::{ParsedBill, ShipmentRecord};
use crate::writer::DocumentWriter;
use crate::{BillError, Result};
use std::path::PathBuf;
use tracing::{error, info, instrument};

const ERROR_RULE: &str = "-------------------";

/// Result of one row
#[derive(Debug)]
pub struct RowOutcome {
    /// 1-based row index
    pub index: usize,
    /// Written file, or the error that skipped the row
    pub result: std::result::Result<PathBuf, BillError>,
}

impl RowOutcome {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-row outcomes of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    /// Number of rows that produced a file
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    /// Number of rows that failed and were skipped
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    /// Paths of all written files, in row order
    pub fn written_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }
}

/// Parse, render and write a single row
#[instrument(skip_all, fields(row = record.index()))]
pub fn process_row(record: &ShipmentRecord, writer: &DocumentWriter<'_>) -> Result<PathBuf> {
    let bill = ParsedBill::parse(record)?;
    writer.write(record.index(), &bill)
}

/// Process every record in order
///
/// A failing row is logged with its index and raw content and skipped;
/// the batch always runs over all rows.
pub fn run_batch(
    records: &[ShipmentRecord],
    config: &BatchConfig,
    issuer: &IssuerConfig,
) -> BatchReport {
    let writer = DocumentWriter::new(issuer, &config.output_dir, config.bill_number_length);
    let mut report = BatchReport::default();

    for record in records {
        info!("Processing row {}", record.index());

        let result = process_row(record, &writer);
        if let Err(err) = &result {
            error!(
                row = record.index(),
                "{ERROR_RULE}\nError\n{err}\n{} - {record}\n{ERROR_RULE}",
                record.index()
            );
        }

        report.outcomes.push(RowOutcome {
            index: record.index(),
            result,
        });
    }

    info!(
        written = report.written(),
        skipped = report.skipped(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fields;

    fn record(index: usize, ewb_no: &str, ewb_date: &str) -> ShipmentRecord {
        ShipmentRecord::from_pairs(
            index,
            [
                (fields::EWB_NO, ewb_no),
                (fields::EWB_DATE, ewb_date),
                (fields::DOC_DATE, "2024-03-14 00:00:00"),
                (fields::VALID_TILL, "2024-03-20 23:59:00"),
                (fields::FROM_GSTIN_INFO, "MainRoad 591108 KA"),
                (fields::TO_GSTIN_INFO, "Hubli 580020 KA"),
            ],
        )
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            outcomes: vec![
                RowOutcome {
                    index: 1,
                    result: Ok(PathBuf::from("output/1.1.pdf")),
                },
                RowOutcome {
                    index: 2,
                    result: Err(BillError::MalformedRecord("x".to_string())),
                },
            ],
        };
        assert_eq!(report.written(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.written_paths(), vec![&PathBuf::from("output/1.1.pdf")]);
    }

    #[test]
    fn test_empty_batch() {
        let report = run_batch(&[], &BatchConfig::default(), &IssuerConfig::default());
        assert_eq!(report.written(), 0);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_bad_row_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = BatchConfig {
            output_dir: dir.path().to_path_buf(),
            ..BatchConfig::default()
        };
        let records = vec![
            record(1, "111122223333", "2024-03-15 10:30:00"),
            record(2, "444455556666", ""),
            record(3, "ABC", "2024-03-15 10:30:00"),
            record(4, "777788889999", "2024-03-15 10:30:00"),
        ];

        let report = run_batch(&records, &config, &IssuerConfig::default());

        assert_eq!(report.written(), 2);
        assert_eq!(report.skipped(), 2);
        assert!(matches!(
            report.outcomes[1].result,
            Err(BillError::MalformedRecord(_))
        ));
        assert!(matches!(
            report.outcomes[2].result,
            Err(BillError::Encoding(_))
        ));
        assert!(dir.path().join("1.111122223333.pdf").exists());
        assert!(!dir.path().join("2.444455556666.pdf").exists());
        assert!(dir.path().join("4.777788889999.pdf").exists());
    }
}
