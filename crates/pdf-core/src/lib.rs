//! PDF Core - Low-level PDF page composition
//!
//! This crate provides functionality for:
//! - Creating blank PDF documents with fixed page sizes
//! - Writing text with the standard Helvetica fonts
//! - Inserting images (JPEG, PNG)
//! - Drawing lines and rectangles
//! - Laying out paragraphs, rules, images and tables onto a page
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PageSize, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::new(PageSize::A4);
//! doc.set_font(StandardFont::HelveticaBold, 12.0);
//! doc.insert_text("Hello, World!", 1, 100.0, 100.0, Align::Left)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod image;
pub mod layout;
mod text;

pub use document::{Color, LineCap, PageSize, PdfDocument, Stroke};
pub use font::StandardFont;
pub use image::{calculate_scaled_dimensions, ImageScaleMode};
pub use layout::{
    ColumnWidths, Flowable, Frame, HorizontalRule, ImageBlock, Padding, Paragraph, Table,
    TableStyle, TextStyle, VAlign,
};
pub use text::{generate_text_operators, wrap_text, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Layout error: {0}")]
    LayoutError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Points per inch
pub const INCH: f64 = 72.0;

/// Points per millimetre
pub const MM: f64 = INCH / 25.4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_units() {
        assert_eq!(0.25 * INCH, 18.0);
        assert!((25.4 * MM - 72.0).abs() < 1e-9);
    }
}
