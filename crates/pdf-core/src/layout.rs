//! Flowable layout: paragraphs, rules, images and tables
//!
//! Flowables are measured against an available width and then drawn
//! top-down. Coordinates are points from the top-left of the page, the same
//! convention `PdfDocument` uses.
//!
//! Only what a single-page form needs is supported: tables do not split
//! across pages, and spans always cover a whole row.

use crate::document::{Color, LineCap, PageSize, PdfDocument, Stroke};
use crate::font::StandardFont;
use crate::image::ImageScaleMode;
use crate::text::{calculate_x_offset, wrap_text};
use crate::{Align, PdfError, Result};
use tracing::debug;

/// Font, size and paragraph settings for a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f32,
    /// Distance between baselines in points
    pub leading: f64,
    pub color: Color,
    pub align: Align,
    /// Extra space below the paragraph
    pub space_after: f64,
}

impl TextStyle {
    /// Style with leading of 1.2 × size, left aligned, black
    pub fn new(font: StandardFont, size: f32) -> Self {
        Self {
            font,
            size,
            leading: size as f64 * 1.2,
            color: Color::black(),
            align: Align::Left,
            space_after: 0.0,
        }
    }

    pub fn with_leading(mut self, leading: f64) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_space_after(mut self, space_after: f64) -> Self {
        self.space_after = space_after;
        self
    }
}

/// Word-wrapped text in one style
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Lines after wrapping to `width`
    pub fn lines(&self, width: f64) -> Vec<String> {
        wrap_text(&self.text, self.style.font, self.style.size, width)
    }

    fn height(&self, width: f64) -> f64 {
        self.lines(width).len() as f64 * self.style.leading + self.style.space_after
    }

    fn draw(&self, doc: &mut PdfDocument, page: usize, x: f64, y: f64, width: f64) -> Result<f64> {
        let style = &self.style;
        let lines = self.lines(width);

        doc.set_font(style.font, style.size);
        doc.set_text_color(style.color);

        // Centre the glyph box inside the leading
        let size = style.size as f64;
        let first_baseline = y + (style.leading - size) / 2.0 + style.font.ascent() as f64 * size / 1000.0;
        let anchor = match style.align {
            Align::Left => x,
            Align::Center => x + width / 2.0,
            Align::Right => x + width,
        };

        for (i, line) in lines.iter().enumerate() {
            let baseline = first_baseline + i as f64 * style.leading;
            doc.insert_text(line, page, anchor, baseline, style.align)?;
        }

        Ok(lines.len() as f64 * style.leading + style.space_after)
    }
}

/// An image drawn inside a fixed box
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    /// PNG or JPEG bytes
    pub data: Vec<u8>,
    pub width: f64,
    pub height: f64,
    pub mode: ImageScaleMode,
}

impl ImageBlock {
    pub fn new(data: Vec<u8>, width: f64, height: f64, mode: ImageScaleMode) -> Self {
        Self {
            data,
            width,
            height,
            mode,
        }
    }
}

/// A horizontal line, centred in the available width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalRule {
    /// Share of the available width (0.0 - 1.0)
    pub width_fraction: f64,
    pub thickness: f64,
    pub color: Color,
    pub space_before: f64,
    pub space_after: f64,
}

impl HorizontalRule {
    pub fn new(width_fraction: f64, thickness: f64, color: Color) -> Self {
        Self {
            width_fraction,
            thickness,
            color,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    fn height(&self) -> f64 {
        self.space_before + self.thickness + self.space_after
    }

    fn draw(&self, doc: &mut PdfDocument, page: usize, x: f64, y: f64, width: f64) -> Result<f64> {
        let length = width * self.width_fraction.clamp(0.0, 1.0);
        let start = x + (width - length) / 2.0;
        let line_y = y + self.space_before + self.thickness / 2.0;
        let stroke = Stroke::new(self.thickness, self.color).with_cap(LineCap::Round);

        doc.draw_line(page, (start, line_y), (start + length, line_y), stroke)?;
        Ok(self.height())
    }
}

/// How table column widths are derived from the available width
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnWidths {
    /// Every column gets the same share
    Equal,
    /// Share of the available width per column (e.g. `[0.33, 0.67]`)
    Fractions(Vec<f64>),
}

/// Cell padding in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    /// 3pt above and below, 6pt at the sides
    fn default() -> Self {
        Self::new(3.0, 6.0, 3.0, 6.0)
    }
}

/// Vertical alignment of cell content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Borders, padding, alignment and spans of a table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableStyle {
    /// Lines around every cell (inner grid plus outline)
    pub grid: Option<Stroke>,
    /// Line around the whole table
    pub outline: Option<Stroke>,
    pub padding: Padding,
    /// Horizontal alignment of non-paragraph content
    pub align: Align,
    pub valign: VAlign,
    /// Rows whose first cell spans every column
    pub spanned_rows: Vec<usize>,
    /// Per-row overrides of `align`
    pub row_align: Vec<(usize, Align)>,
}

impl TableStyle {
    pub fn with_grid(mut self, stroke: Stroke) -> Self {
        self.grid = Some(stroke);
        self
    }

    pub fn with_outline(mut self, stroke: Stroke) -> Self {
        self.outline = Some(stroke);
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    /// Merge all columns of `row` into its first cell
    pub fn span_row(mut self, row: usize) -> Self {
        self.spanned_rows.push(row);
        self
    }

    pub fn align_row(mut self, row: usize, align: Align) -> Self {
        self.row_align.push((row, align));
        self
    }

    fn is_spanned(&self, row: usize) -> bool {
        self.spanned_rows.contains(&row)
    }

    fn align_for(&self, row: usize) -> Align {
        self.row_align
            .iter()
            .rev()
            .find(|(r, _)| *r == row)
            .map(|(_, align)| *align)
            .unwrap_or(self.align)
    }
}

/// A grid of flowables
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<Flowable>>,
    pub widths: ColumnWidths,
    pub style: TableStyle,
}

impl Table {
    pub fn new(rows: Vec<Vec<Flowable>>, widths: ColumnWidths) -> Self {
        Self {
            rows,
            widths,
            style: TableStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        match &self.widths {
            ColumnWidths::Equal => widest_row,
            ColumnWidths::Fractions(f) => f.len().max(widest_row),
        }
    }

    /// Column widths in points for the available width
    pub fn column_widths(&self, available: f64) -> Vec<f64> {
        let count = self.column_count();
        match &self.widths {
            ColumnWidths::Equal if count > 0 => vec![available / count as f64; count],
            ColumnWidths::Equal => Vec::new(),
            ColumnWidths::Fractions(fractions) => {
                let mut widths: Vec<f64> = fractions.iter().map(|f| f * available).collect();
                // Columns without a fraction share whatever is left
                let used: f64 = widths.iter().sum();
                let missing = count - widths.len();
                if missing > 0 {
                    let rest = ((available - used) / missing as f64).max(0.0);
                    widths.extend(std::iter::repeat(rest).take(missing));
                }
                widths
            }
        }
    }

    /// Width of each cell in a row, honouring spans
    fn cell_widths(&self, row: usize, columns: &[f64]) -> Vec<f64> {
        if self.style.is_spanned(row) {
            vec![columns.iter().sum()]
        } else {
            columns.to_vec()
        }
    }

    /// Height of every row in points
    pub fn row_heights(&self, available: f64) -> Vec<f64> {
        let columns = self.column_widths(available);
        let padding = self.style.padding;

        self.rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                let widths = self.cell_widths(r, &columns);
                let content = cells
                    .iter()
                    .zip(widths)
                    .map(|(cell, w)| cell.height((w - padding.horizontal()).max(0.0)))
                    .fold(0.0, f64::max);
                content + padding.vertical()
            })
            .collect()
    }

    fn height(&self, available: f64) -> f64 {
        self.row_heights(available).iter().sum()
    }

    fn draw(&self, doc: &mut PdfDocument, page: usize, x: f64, y: f64, width: f64) -> Result<f64> {
        let columns = self.column_widths(width);
        let heights = self.row_heights(width);
        let padding = self.style.padding;

        let mut row_y = y;
        for (r, (cells, row_height)) in self.rows.iter().zip(&heights).enumerate() {
            let widths = self.cell_widths(r, &columns);
            let align = self.style.align_for(r);

            let mut cell_x = x;
            for (cell, cell_width) in cells.iter().zip(widths) {
                let inner_width = (cell_width - padding.horizontal()).max(0.0);
                let content_height = cell.height(inner_width);
                let slack = row_height - padding.vertical() - content_height;
                let dy = match self.style.valign {
                    VAlign::Top => 0.0,
                    VAlign::Middle => slack / 2.0,
                    VAlign::Bottom => slack,
                };

                let content_width = cell.natural_width(inner_width).min(inner_width);
                let dx = calculate_x_offset(content_width, inner_width, align);

                cell.draw(
                    doc,
                    page,
                    cell_x + padding.left + dx,
                    row_y + padding.top + dy,
                    content_width,
                )?;
                cell_x += cell_width;
            }

            row_y += row_height;
        }

        let total = row_y - y;
        if let Some(stroke) = self.style.grid {
            self.draw_grid(doc, page, (x, y), &columns, &heights, stroke)?;
        }
        if let Some(stroke) = self.style.outline {
            doc.draw_rect(page, x, y, width, total, stroke)?;
        }

        Ok(total)
    }

    fn draw_grid(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        (x, y): (f64, f64),
        columns: &[f64],
        heights: &[f64],
        stroke: Stroke,
    ) -> Result<()> {
        let width: f64 = columns.iter().sum();
        let total: f64 = heights.iter().sum();

        // Horizontal rules at every row boundary
        let mut row_y = y;
        doc.draw_line(page, (x, row_y), (x + width, row_y), stroke)?;
        for h in heights {
            row_y += h;
            doc.draw_line(page, (x, row_y), (x + width, row_y), stroke)?;
        }

        // Outer verticals
        doc.draw_line(page, (x, y), (x, y + total), stroke)?;
        doc.draw_line(page, (x + width, y), (x + width, y + total), stroke)?;

        // Inner verticals, skipped across spanned rows
        let mut row_y = y;
        for (r, h) in heights.iter().enumerate() {
            if !self.style.is_spanned(r) {
                let mut col_x = x;
                for w in &columns[..columns.len().saturating_sub(1)] {
                    col_x += w;
                    doc.draw_line(page, (col_x, row_y), (col_x, row_y + h), stroke)?;
                }
            }
            row_y += h;
        }

        Ok(())
    }
}

/// Anything that can be placed in a frame or a table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph(Paragraph),
    Image(ImageBlock),
    Rule(HorizontalRule),
    Table(Table),
    /// Blank vertical space
    Spacer(f64),
}

impl Flowable {
    /// An empty cell
    pub fn empty() -> Self {
        Flowable::Spacer(0.0)
    }

    /// Height in points when laid out in `width`
    pub fn height(&self, width: f64) -> f64 {
        match self {
            Flowable::Paragraph(p) => p.height(width),
            Flowable::Image(img) => img.height,
            Flowable::Rule(rule) => rule.height(),
            Flowable::Table(table) => table.height(width),
            Flowable::Spacer(h) => *h,
        }
    }

    /// Width actually occupied when given `available` points
    pub fn natural_width(&self, available: f64) -> f64 {
        match self {
            Flowable::Image(img) => img.width,
            Flowable::Spacer(_) => 0.0,
            _ => available,
        }
    }

    /// Draw with the top-left corner at (`x`, `y`); returns the height used
    pub fn draw(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
    ) -> Result<f64> {
        match self {
            Flowable::Paragraph(p) => p.draw(doc, page, x, y, width),
            Flowable::Image(img) => {
                doc.insert_image_scaled(&img.data, page, x, y, img.width, img.height, img.mode)?;
                Ok(img.height)
            }
            Flowable::Rule(rule) => rule.draw(doc, page, x, y, width),
            Flowable::Table(table) => table.draw(doc, page, x, y, width),
            Flowable::Spacer(h) => Ok(*h),
        }
    }
}

impl From<Paragraph> for Flowable {
    fn from(p: Paragraph) -> Self {
        Flowable::Paragraph(p)
    }
}

impl From<Table> for Flowable {
    fn from(t: Table) -> Self {
        Flowable::Table(t)
    }
}

impl From<ImageBlock> for Flowable {
    fn from(img: ImageBlock) -> Self {
        Flowable::Image(img)
    }
}

impl From<HorizontalRule> for Flowable {
    fn from(rule: HorizontalRule) -> Self {
        Flowable::Rule(rule)
    }
}

/// The printable area of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Frame inside the given margins (points)
    pub fn with_margins(page: PageSize, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            x: left,
            y: top,
            width: page.width - left - right,
            height: page.height - top - bottom,
        }
    }

    /// Draw flowables top-down, starting new pages as needed
    ///
    /// A flowable taller than the whole frame cannot be placed and is an
    /// error. Returns the number of pages used.
    pub fn render(&self, doc: &mut PdfDocument, flowables: &[Flowable]) -> Result<usize> {
        let mut page = doc.add_page();
        let mut pages_used = 1;
        let mut cursor = self.y;

        for flowable in flowables {
            let height = flowable.height(self.width);
            if height > self.height {
                return Err(PdfError::LayoutError(format!(
                    "flowable is {height:.1}pt tall but the frame holds {:.1}pt",
                    self.height
                )));
            }

            if cursor + height > self.y + self.height {
                page = doc.add_page();
                pages_used += 1;
                cursor = self.y;
            }

            cursor += flowable.draw(doc, page, self.x, cursor, self.width)?;
        }

        debug!(pages = pages_used, used = cursor - self.y, "frame rendered");
        Ok(pages_used)
    }
}
