//! Page composition and PDF output

use crate::config::IssuerConfig;
use crate::layout::{bill_page, StyleSheet};
use crate::record::ParsedBill;
use crate::symbols::{barcode_image, qr_image, qr_payload};
use crate::Result;
use pdf_core::{Frame, PageSize, PdfDocument, INCH};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Left and right page margin
const SIDE_MARGIN: f64 = 0.25 * INCH;
const TOP_MARGIN: f64 = 0.45 * INCH;
const BOTTOM_MARGIN: f64 = 0.0;

/// `<dir>/<index>.<bill number>.pdf`
pub fn output_path(dir: &Path, index: usize, bill_number: &str) -> PathBuf {
    dir.join(format!("{index}.{bill_number}.pdf"))
}

/// Renders parsed bills and writes them into an output directory
pub struct DocumentWriter<'a> {
    styles: StyleSheet,
    issuer: &'a IssuerConfig,
    output_dir: &'a Path,
    bill_number_length: usize,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(issuer: &'a IssuerConfig, output_dir: &'a Path, bill_number_length: usize) -> Self {
        Self {
            styles: StyleSheet::default(),
            issuer,
            output_dir,
            bill_number_length,
        }
    }

    /// Render a bill to PDF bytes
    pub fn render(&self, bill: &ParsedBill) -> Result<Vec<u8>> {
        let qr = qr_image(&qr_payload(bill))?;
        let barcode = barcode_image(&bill.bill_number, self.bill_number_length)?;
        let page = bill_page(&self.styles, bill, self.issuer, qr, barcode);

        let mut doc = PdfDocument::new(PageSize::A4);
        let frame = Frame::with_margins(
            doc.page_size(),
            SIDE_MARGIN,
            SIDE_MARGIN,
            TOP_MARGIN,
            BOTTOM_MARGIN,
        );
        frame.render(&mut doc, &[page.into()])?;

        Ok(doc.to_bytes()?)
    }

    /// Render a bill and write it as `<index>.<bill number>.pdf`
    ///
    /// The output directory must already exist. An existing file with the
    /// same name is overwritten.
    pub fn write(&self, index: usize, bill: &ParsedBill) -> Result<PathBuf> {
        let bytes = self.render(bill)?;
        let path = output_path(self.output_dir, index, &bill.bill_number);
        std::fs::write(&path, &bytes)?;

        debug!(path = %path.display(), bytes = bytes.len(), "bill written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{fields, ShipmentRecord};
    use crate::BillError;
    use pretty_assertions::assert_eq;

    fn bill(ewb_no: &str) -> ParsedBill {
        let record = ShipmentRecord::from_pairs(
            1,
            [
                (fields::EWB_NO, ewb_no),
                (fields::EWB_DATE, "2024-03-15 10:30:00"),
                (fields::DOC_DATE, "2024-03-14 00:00:00"),
                (fields::VALID_TILL, "2024-03-20 23:59:00"),
                (fields::OTHER_PARTY_GSTIN, "29AAACT1507C1ZT"),
                (fields::FROM_GSTIN_INFO, "MainRoad 591108 KA"),
                (fields::TO_GSTIN_INFO, "Hubli 580020 KA"),
            ],
        );
        ParsedBill::parse(&record).unwrap()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("output"), 3, "123456789012"),
            PathBuf::from("output/3.123456789012.pdf")
        );
    }

    #[test]
    fn test_render_single_page() {
        let issuer = IssuerConfig::default();
        let writer = DocumentWriter::new(&issuer, Path::new("unused"), 12);
        let bytes = writer.render(&bill("123456789012")).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_render_rejects_bad_bill_number() {
        let issuer = IssuerConfig::default();
        let writer = DocumentWriter::new(&issuer, Path::new("unused"), 12);
        let result = writer.render(&bill("12345"));
        assert!(matches!(result, Err(BillError::Encoding(_))));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("output");
        let issuer = IssuerConfig::default();
        let writer = DocumentWriter::new(&issuer, &missing, 12);

        let result = writer.write(1, &bill("123456789012"));
        assert!(matches!(result, Err(BillError::Io(_))));
    }

    #[test]
    fn test_write_overwrites_with_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let issuer = IssuerConfig::default();
        let writer = DocumentWriter::new(&issuer, dir.path(), 12);
        let bill = bill("123456789012");

        let path = writer.write(7, &bill).unwrap();
        let first = std::fs::read(&path).unwrap();
        let again = writer.write(7, &bill).unwrap();
        let second = std::fs::read(&again).unwrap();

        assert_eq!(path, dir.path().join("7.123456789012.pdf"));
        assert_eq!(first, second);
    }
}
