//! PDF Document builder

use crate::font::StandardFont;
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{generate_text_operators, pdf_number, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::debug;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    /// Light grey (211, 211, 211)
    pub fn light_grey() -> Self {
        Self::from_rgb(211, 211, 211)
    }

    fn operands(&self) -> String {
        format!(
            "{} {} {}",
            pdf_number(self.r as f64),
            pdf_number(self.g as f64),
            pdf_number(self.b as f64)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// Line cap style for strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Stroke parameters for lines and rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line width in points
    pub width: f64,
    pub color: Color,
    pub cap: LineCap,
}

impl Stroke {
    pub fn new(width: f64, color: Color) -> Self {
        Self {
            width,
            color,
            cap: LineCap::Butt,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    fn operators(&self) -> String {
        let cap = match self.cap {
            LineCap::Butt => 0,
            LineCap::Round => 1,
        };
        format!(
            "{} w\n{cap} J\n{} RG\n",
            pdf_number(self.width),
            self.color.operands()
        )
    }
}

/// A new PDF document built page by page
///
/// All public coordinates are in points measured from the top-left corner
/// of the page; conversion to PDF bottom-up space happens here.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Page tree root
    pages_id: ObjectId,
    /// Page objects in order
    page_ids: Vec<ObjectId>,
    page_size: PageSize,
    current_font: StandardFont,
    current_font_size: f32,
    current_text_color: Color,
    /// Page font resources (page number -> font -> resource name)
    page_font_resources: BTreeMap<usize, BTreeMap<StandardFont, String>>,
    next_font_resource: u32,
    /// Embedded images (data hash -> (object ID, width, height))
    embedded_images: BTreeMap<u64, (ObjectId, u32, u32)>,
    /// Page image resources (page number -> resource name -> object ID)
    page_image_resources: BTreeMap<usize, BTreeMap<String, ObjectId>>,
    next_image_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
    /// Font dictionaries already added to the object table
    font_ids: BTreeMap<StandardFont, ObjectId>,
    /// Content stream of each page once written (page number -> stream)
    page_content_ids: BTreeMap<usize, ObjectId>,
}

impl PdfDocument {
    /// Create an empty document; pages are added with `add_page`
    pub fn new(page_size: PageSize) -> Self {
        let mut inner = Document::with_version("1.4");

        let pages_id = inner.new_object_id();
        let catalog_id = inner.add_object(lopdf::dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        let mut doc = Self {
            inner,
            pages_id,
            page_ids: Vec::new(),
            page_size,
            current_font: StandardFont::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            page_font_resources: BTreeMap::new(),
            next_font_resource: 1,
            embedded_images: BTreeMap::new(),
            page_image_resources: BTreeMap::new(),
            next_image_resource: 1,
            page_content_buffer: BTreeMap::new(),
            font_ids: BTreeMap::new(),
            page_content_ids: BTreeMap::new(),
        };
        doc.write_page_tree();
        doc
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Append a blank page and return its number (1-indexed)
    pub fn add_page(&mut self) -> usize {
        let page_id = self.inner.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.page_size.width.into(),
                self.page_size.height.into(),
            ],
            "Resources" => Dictionary::new(),
        });
        self.page_ids.push(page_id);
        self.write_page_tree();
        self.page_ids.len()
    }

    /// Rewrite the /Pages node after the page list changed
    fn write_page_tree(&mut self) {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = lopdf::dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.inner.objects.insert(self.pages_id, Object::Dictionary(pages));
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page, self.page_count()));
        }
        Ok(())
    }

    /// Set the current font and size
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in the current font, in points
    pub fn get_text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size) as f64
    }

    /// Insert a line of text
    ///
    /// # Arguments
    /// * `text` - Text to insert (single line)
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `baseline` - Baseline Y coordinate in points (from top)
    /// * `align` - Alignment of the text relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        baseline: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let font_resource_name = self.get_or_create_font_ref(self.current_font, page);
        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: self.current_font_size,
            text_width: self.get_text_width(text),
            color: self.current_text_color,
        };

        let text_hex = self.current_font.encode_text_hex(text);
        let pdf_y = self.page_size.height - baseline;
        let operators = generate_text_operators(&text_hex, x, pdf_y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Stroke a straight line between two points
    pub fn draw_line(
        &mut self,
        page: usize,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        stroke: Stroke,
    ) -> Result<()> {
        self.check_page(page)?;

        let h = self.page_size.height;
        let ops = format!(
            "q\n{}{} {} m\n{} {} l\nS\nQ\n",
            stroke.operators(),
            pdf_number(x1),
            pdf_number(h - y1),
            pdf_number(x2),
            pdf_number(h - y2)
        );
        self.buffer_content(page, ops.as_bytes());
        Ok(())
    }

    /// Stroke a rectangle whose top-left corner is at (`x`, `y`)
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke: Stroke,
    ) -> Result<()> {
        self.check_page(page)?;

        let pdf_y = self.page_size.height - y - height;
        let ops = format!(
            "q\n{}{} {} {} {} re\nS\nQ\n",
            stroke.operators(),
            pdf_number(x),
            pdf_number(pdf_y),
            pdf_number(width),
            pdf_number(height)
        );
        self.buffer_content(page, ops.as_bytes());
        Ok(())
    }

    /// Insert an image, stretched to the given box
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.insert_image_scaled(data, page, x, y, width, height, ImageScaleMode::Stretch)
            .map(|_| ())
    }

    /// Insert an image with scaling mode
    ///
    /// The image's top-left corner is placed at (`x`, `y`). Returns the
    /// drawn size in points.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image_scaled(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        self.check_page(page)?;

        let (image_resource_name, orig_width, orig_height) =
            self.get_or_create_image_ref(data, page)?;

        let (actual_width, actual_height) =
            calculate_scaled_dimensions(orig_width, orig_height, width, height, mode);

        let pdf_y = self.page_size.height - y - actual_height;
        let operators =
            generate_image_operators(&image_resource_name, x, pdf_y, actual_width, actual_height);
        self.buffer_content(page, &operators);

        Ok((actual_width, actual_height))
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Write fonts, resources and content streams into the object table
    ///
    /// Safe to call again after more drawing: fonts are added once and new
    /// operators are appended to each page's existing content stream.
    fn finalize(&mut self) -> Result<()> {
        if self.page_ids.is_empty() {
            return Err(PdfError::SaveError("Document has no pages".to_string()));
        }

        self.embed_fonts();
        self.finalize_page_resources()?;
        self.flush_content_buffers()?;

        debug!(
            pages = self.page_count(),
            objects = self.inner.objects.len(),
            "PDF finalized"
        );
        Ok(())
    }

    /// Add one font dictionary per standard font in use
    fn embed_fonts(&mut self) {
        let mut used: Vec<StandardFont> = self
            .page_font_resources
            .values()
            .flat_map(|fonts| fonts.keys().copied())
            .collect();
        used.sort();
        used.dedup();

        for font in used {
            if !self.font_ids.contains_key(&font) {
                let font_id = self.inner.add_object(font.to_pdf_dictionary());
                self.font_ids.insert(font, font_id);
            }
        }
    }

    /// Get or create a font resource name for a page (e.g. "F1")
    fn get_or_create_font_ref(&mut self, font: StandardFont, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(&font) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font, resource_name.clone());
        resource_name
    }

    /// Set /Font and /XObject resources on every page
    fn finalize_page_resources(&mut self) -> Result<()> {
        let font_ids = self.font_ids.clone();
        for (index, page_id) in self.page_ids.clone().into_iter().enumerate() {
            let page = index + 1;
            let mut resources = Dictionary::new();

            if let Some(fonts) = self.page_font_resources.get(&page) {
                let mut font_dict = Dictionary::new();
                for (font, resource_name) in fonts {
                    let font_id = font_ids
                        .get(font)
                        .ok_or_else(|| PdfError::SaveError(format!("Font not embedded: {font:?}")))?;
                    font_dict.set(resource_name.as_bytes(), Object::Reference(*font_id));
                }
                resources.set("Font", Object::Dictionary(font_dict));
            }

            if let Some(images) = self.page_image_resources.get(&page) {
                let mut xobject_dict = Dictionary::new();
                for (resource_name, object_id) in images {
                    xobject_dict.set(resource_name.as_bytes(), Object::Reference(*object_id));
                }
                resources.set("XObject", Object::Dictionary(xobject_dict));
            }

            self.page_dict_mut(page_id)?
                .set("Resources", Object::Dictionary(resources));
        }

        Ok(())
    }

    fn page_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        self.inner
            .get_object_mut(page_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Move buffered operators into each page's content stream
    ///
    /// The first flush creates the stream; later flushes append to it.
    fn flush_content_buffers(&mut self) -> Result<()> {
        let mut buffers = std::mem::take(&mut self.page_content_buffer);

        for (index, page_id) in self.page_ids.clone().into_iter().enumerate() {
            let page = index + 1;
            let content = buffers.remove(&page).unwrap_or_default();

            match self.page_content_ids.get(&page) {
                Some(&stream_id) => self.append_to_content_stream(stream_id, &content)?,
                None => {
                    let stream_id = self
                        .inner
                        .add_object(Stream::new(Dictionary::new(), content));
                    self.page_content_ids.insert(page, stream_id);
                    self.page_dict_mut(page_id)?
                        .set("Contents", Object::Reference(stream_id));
                }
            }
        }

        Ok(())
    }

    fn append_to_content_stream(&mut self, stream_id: ObjectId, content: &[u8]) -> Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        let stream = self
            .inner
            .get_object_mut(stream_id)?
            .as_stream_mut()
            .map_err(|_| PdfError::ParseError("Contents is not a stream".to_string()))?;
        stream.content.extend_from_slice(content);
        Ok(())
    }

    /// Get or create an image resource for a page
    ///
    /// Returns the resource name (e.g., "Im1") and pixel dimensions.
    /// Images are deduplicated by a hash of their bytes.
    fn get_or_create_image_ref(&mut self, data: &[u8], page: usize) -> Result<(String, u32, u32)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        let (object_id, width, height) = match self.embedded_images.get(&data_hash) {
            Some(entry) => *entry,
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                let object_id = self.inner.add_object(xobject.to_pdf_stream());
                let entry = (object_id, xobject.width, xobject.height);
                self.embedded_images.insert(data_hash, entry);
                entry
            }
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| **id == object_id) {
            return Ok((name.clone(), width, height));
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        Ok((resource_name, width, height))
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}
