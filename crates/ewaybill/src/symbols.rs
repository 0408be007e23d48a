//! QR code and barcode generation

use crate::record::ParsedBill;
use crate::{BillError, Result};
use barcoders::sym::code128::Code128;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Width of one barcode module in pixels
const BAR_MODULE_PX: u32 = 2;

/// Barcode raster height in pixels
const BAR_HEIGHT_PX: u32 = 60;

/// QR payload: "<bill number>/<other party GSTIN>/<MM/DD/YYYY hh:mm:ss AM|PM>"
///
/// Spaces are removed from the bill number and the GSTIN.
pub fn qr_payload(bill: &ParsedBill) -> String {
    format!(
        "{}/{}/{}",
        bill.bill_number.replace(' ', ""),
        bill.other_party_gstin.replace(' ', ""),
        bill.issued_at.format("%m/%d/%Y %I:%M:%S %p")
    )
}

/// Render a QR code as PNG bytes
pub fn qr_image(payload: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| BillError::Encoding(format!("QR payload {payload:?}: {e}")))?;

    let image = code.render::<Luma<u8>>().min_dimensions(200, 200).build();
    encode_png(image)
}

/// Check that a bill number is `expected_len` ASCII digits
fn validate_bill_number(number: &str, expected_len: usize) -> Result<()> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BillError::Encoding(format!(
            "bill number {number:?} is not numeric"
        )));
    }
    if number.len() != expected_len {
        return Err(BillError::Encoding(format!(
            "bill number {number:?} has {} digits, expected {expected_len}",
            number.len()
        )));
    }
    Ok(())
}

/// Code 128 modules for a digit string (1 = bar)
pub fn barcode_modules(number: &str, expected_len: usize) -> Result<Vec<u8>> {
    validate_bill_number(number, expected_len)?;

    // Charset C packs digit pairs; odd lengths fall back to charset B
    let data = if number.len() % 2 == 0 {
        format!("Ć{number}")
    } else {
        format!("Ɓ{number}")
    };

    let barcode = Code128::new(data)
        .map_err(|e| BillError::Encoding(format!("bill number {number:?}: {e}")))?;
    Ok(barcode.encode())
}

/// Render the bill number as a Code 128 PNG without a text line
pub fn barcode_image(number: &str, expected_len: usize) -> Result<Vec<u8>> {
    let modules = barcode_modules(number, expected_len)?;

    let width = modules.len() as u32 * BAR_MODULE_PX;
    let image = GrayImage::from_fn(width, BAR_HEIGHT_PX, |x, _| {
        if modules[(x / BAR_MODULE_PX) as usize] == 1 {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    encode_png(image)
}

fn encode_png(image: GrayImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| BillError::Encoding(e.to_string()))?;
    Ok(bytes)
}
