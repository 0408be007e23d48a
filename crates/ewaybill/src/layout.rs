//! Bill layout: QR block, Part-B table and the main bill table

use crate::config::IssuerConfig;
use crate::record::ParsedBill;
use pdf_core::{
    Align, Color, ColumnWidths, Flowable, HorizontalRule, ImageBlock, ImageScaleMode, Padding,
    Paragraph, StandardFont, Stroke, Table, TableStyle, TextStyle, VAlign, INCH,
};

/// Displayed QR size in points
pub const QR_SIZE: f64 = 90.0;

/// Displayed barcode size in points
pub const BARCODE_SIZE: (f64, f64) = (50.0, 50.0);

/// Rows of the bill table that span both columns
pub const SPANNED_ROWS: [usize; 5] = [5, 17, 18, 19, 20];

/// Row of the bill table holding the barcode
const BARCODE_ROW: usize = 19;

/// Text styles used on the bill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSheet {
    /// Helvetica 8pt
    pub label: TextStyle,
    /// Helvetica-Bold 8pt
    pub bold: TextStyle,
    /// Helvetica-Bold 10pt
    pub big_bold: TextStyle,
    /// Helvetica 6pt
    pub mini: TextStyle,
    /// Centred Helvetica-Bold 18pt
    pub title: TextStyle,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            label: TextStyle::new(StandardFont::Helvetica, 8.0).with_leading(12.0),
            bold: TextStyle::new(StandardFont::HelveticaBold, 8.0).with_leading(12.0),
            big_bold: TextStyle::new(StandardFont::HelveticaBold, 10.0).with_leading(12.0),
            mini: TextStyle::new(StandardFont::Helvetica, 6.0).with_leading(12.0),
            title: TextStyle::new(StandardFont::HelveticaBold, 18.0)
                .with_leading(22.0)
                .with_align(Align::Center)
                .with_space_after(6.0),
        }
    }
}

impl StyleSheet {
    pub fn label(&self, text: &str) -> Flowable {
        Paragraph::new(text, self.label).into()
    }

    pub fn bold(&self, text: &str) -> Flowable {
        Paragraph::new(text, self.bold).into()
    }

    pub fn big_bold(&self, text: &str) -> Flowable {
        Paragraph::new(text, self.big_bold).into()
    }

    pub fn mini(&self, text: &str) -> Flowable {
        Paragraph::new(text, self.mini).into()
    }
}

/// Title, divider and QR code in a thin box
pub fn qr_block(styles: &StyleSheet, qr_png: Vec<u8>) -> Table {
    let divider = HorizontalRule::new(0.2, 1.0, Color::light_grey());
    let qr = ImageBlock::new(qr_png, QR_SIZE, QR_SIZE, ImageScaleMode::FitBox);

    Table::new(
        vec![
            vec![Paragraph::new("e-Way Bill", styles.title).into()],
            vec![divider.into()],
            vec![qr.into()],
        ],
        ColumnWidths::Equal,
    )
    .with_style(
        TableStyle::default()
            .with_outline(Stroke::new(0.1, Color::black()))
            .with_align(Align::Center),
    )
}

/// Transport details: one header row and one value row
pub fn part_b_table(styles: &StyleSheet, bill: &ParsedBill, issuer: &IssuerConfig) -> Table {
    let headers = [
        "Mode",
        "Vehicle / Trans\nDoc No & Dt.",
        "From",
        "Entered Date",
        "Entered By",
        "CEWB No.\n(If any)",
        "Multi Veh.Info\n(If any)",
    ];
    let issued = bill.issued_display();
    let values = [
        issuer.transport_mode.as_str(),
        "-",
        bill.dispatch.locality.as_str(),
        issued.as_str(),
        issuer.registration.as_str(),
        "-",
        "-",
    ];

    Table::new(
        vec![
            headers.iter().map(|h| styles.bold(h)).collect(),
            values.iter().map(|v| styles.label(v)).collect(),
        ],
        ColumnWidths::Equal,
    )
    .with_style(
        TableStyle::default()
            .with_grid(Stroke::new(0.01 * INCH, Color::black()))
            .with_align(Align::Left)
            .with_valign(VAlign::Middle),
    )
}

/// The two-column bill with Part-A and Part-B
pub fn bill_table(
    styles: &StyleSheet,
    bill: &ParsedBill,
    issuer: &IssuerConfig,
    barcode_png: Vec<u8>,
) -> Table {
    let issued = bill.issued_display();
    let row = |label: &str, value: Flowable| vec![styles.label(label), value];
    let barcode = ImageBlock::new(
        barcode_png,
        BARCODE_SIZE.0,
        BARCODE_SIZE.1,
        ImageScaleMode::Stretch,
    );

    let rows = vec![
        row("E-Way Bill No:", styles.big_bold(&bill.spaced_bill_number)),
        row("E-Way Bill Date:", styles.bold(&issued)),
        row("Generated By:", styles.bold(&issuer.generated_by)),
        row("Valid From:", styles.bold(&issued)),
        row("Valid Until:", styles.bold(&bill.valid_until_display())),
        vec![styles.bold("Part - A")],
        row("GSTIN of Supplier", styles.bold(&issuer.supplier)),
        row("Place of Dispatch", styles.bold(&bill.dispatch.to_string())),
        row("GSTIN of Recipient", styles.bold(&issuer.recipient)),
        row("Place of Delivery", styles.bold(&bill.delivery.to_string())),
        row("Document No.", styles.bold(&bill.document_number)),
        row("Document Date", styles.bold(&bill.document_date_display())),
        row("Transaction Type:", styles.bold(&issuer.transaction_type)),
        row("Value of Goods", styles.bold(&bill.goods_value)),
        row("HSN Code", styles.bold(&bill.hsn)),
        row("Reason for Transportation", styles.bold(&bill.supply_type)),
        row("Transporter", Flowable::empty()),
        vec![styles.bold("Part - B")],
        vec![part_b_table(styles, bill, issuer).into()],
        vec![barcode.into()],
        vec![styles.mini(&issuer.footnote)],
    ];

    let style = SPANNED_ROWS.iter().fold(
        TableStyle::default()
            .with_grid(Stroke::new(0.01, Color::black()))
            .with_padding(Padding::new(7.0, 6.0, 7.0, 6.0))
            .with_align(Align::Left)
            .with_valign(VAlign::Middle)
            .align_row(BARCODE_ROW, Align::Center),
        |style, &row| style.span_row(row),
    );

    Table::new(rows, ColumnWidths::Fractions(vec![0.33, 0.67])).with_style(style)
}

/// QR block above the bill table inside a light outer box
pub fn bill_page(
    styles: &StyleSheet,
    bill: &ParsedBill,
    issuer: &IssuerConfig,
    qr_png: Vec<u8>,
    barcode_png: Vec<u8>,
) -> Table {
    Table::new(
        vec![
            vec![qr_block(styles, qr_png).into()],
            vec![bill_table(styles, bill, issuer, barcode_png).into()],
        ],
        ColumnWidths::Equal,
    )
    .with_style(TableStyle::default().with_outline(Stroke::new(
        0.1 * pdf_core::MM,
        Color::from_rgb(222, 226, 230),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{fields, ShipmentRecord};
    use pretty_assertions::assert_eq;

    fn bill() -> ParsedBill {
        let record = ShipmentRecord::from_pairs(
            1,
            [
                (fields::EWB_NO, "123456789012"),
                (fields::EWB_DATE, "2024-03-15 10:30:00"),
                (fields::DOC_NO, "INV-001"),
                (fields::DOC_DATE, "2024-03-14 00:00:00"),
                (fields::VALID_TILL, "2024-03-20 23:59:00"),
                (fields::FROM_GSTIN_INFO, "ACC Plant MainRoad 591108 KA"),
                (fields::TO_GSTIN_INFO, "Depot Hubli 580020 KA"),
                (fields::SUPPLY_TYPE, "Outward Supply"),
            ],
        );
        ParsedBill::parse(&record).unwrap()
    }

    fn text_of(cell: &Flowable) -> &str {
        match cell {
            Flowable::Paragraph(p) => p.text.as_str(),
            _ => "",
        }
    }

    #[test]
    fn test_bill_table_shape() {
        let styles = StyleSheet::default();
        let table = bill_table(&styles, &bill(), &IssuerConfig::default(), Vec::new());

        assert_eq!(table.rows.len(), 21);
        assert_eq!(table.column_count(), 2);
        for (i, row) in table.rows.iter().enumerate() {
            let expected = if SPANNED_ROWS.contains(&i) { 1 } else { 2 };
            assert_eq!(row.len(), expected, "row {i}");
        }
        assert_eq!(table.style.spanned_rows, SPANNED_ROWS.to_vec());
    }

    #[test]
    fn test_bill_table_values() {
        let styles = StyleSheet::default();
        let table = bill_table(&styles, &bill(), &IssuerConfig::default(), Vec::new());

        assert_eq!(text_of(&table.rows[0][0]), "E-Way Bill No:");
        assert_eq!(text_of(&table.rows[0][1]), "1234 5678 9012");
        assert_eq!(text_of(&table.rows[1][1]), "15/03/2024 10:30 AM");
        assert_eq!(text_of(&table.rows[4][1]), "20/03/2024");
        assert_eq!(text_of(&table.rows[5][0]), "Part - A");
        assert_eq!(text_of(&table.rows[7][1]), "MainRoad,KA-591108");
        assert_eq!(text_of(&table.rows[9][1]), "Hubli,KA-580020");
        assert_eq!(text_of(&table.rows[11][1]), "14/03/2024");
        assert_eq!(text_of(&table.rows[12][1]), "- NA -");
        assert_eq!(text_of(&table.rows[17][0]), "Part - B");
        assert!(matches!(table.rows[18][0], Flowable::Table(_)));
        assert!(matches!(table.rows[19][0], Flowable::Image(_)));
    }

    #[test]
    fn test_bill_number_uses_big_bold() {
        let styles = StyleSheet::default();
        let table = bill_table(&styles, &bill(), &IssuerConfig::default(), Vec::new());
        match &table.rows[0][1] {
            Flowable::Paragraph(p) => assert_eq!(p.style, styles.big_bold),
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_part_b_values() {
        let styles = StyleSheet::default();
        let issuer = IssuerConfig {
            registration: "27ABCDE1234F1Z5".to_string(),
            ..IssuerConfig::default()
        };
        let table = part_b_table(&styles, &bill(), &issuer);

        let values: Vec<&str> = table.rows[1].iter().map(text_of).collect();
        assert_eq!(
            values,
            vec![
                "Road",
                "-",
                "MainRoad",
                "15/03/2024 10:30 AM",
                "27ABCDE1234F1Z5",
                "-",
                "-"
            ]
        );
        assert_eq!(table.column_widths(700.0), vec![100.0; 7]);
    }

    #[test]
    fn test_qr_block_rows() {
        let table = qr_block(&StyleSheet::default(), Vec::new());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(text_of(&table.rows[0][0]), "e-Way Bill");
        assert!(matches!(table.rows[1][0], Flowable::Rule(_)));
        match &table.rows[2][0] {
            Flowable::Image(img) => {
                assert_eq!((img.width, img.height), (QR_SIZE, QR_SIZE));
                assert_eq!(img.mode, ImageScaleMode::FitBox);
            }
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_bill_page_fits_on_a4() {
        let page = bill_page(
            &StyleSheet::default(),
            &bill(),
            &IssuerConfig::default(),
            Vec::new(),
            Vec::new(),
        );
        let frame_height = pdf_core::PageSize::A4.height - 0.45 * INCH;
        let height: f64 = page.row_heights(pdf_core::PageSize::A4.width - 0.5 * INCH).iter().sum();
        assert!(height < frame_height, "{height} >= {frame_height}");
    }
}
