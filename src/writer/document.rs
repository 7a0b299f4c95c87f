//! Document orchestration.
//!
//! [`Document::publish`] runs four phases in a fixed order:
//!
//! 1. **embed**: load image and font file bytes, resolve font metrics
//! 2. **prepare**: compute every content stream, compress if configured
//! 3. **position**: sort content into paint order, then assign ids and
//!    object numbers in the traversal order below
//! 4. **write**: header, every object in numbering order, xref, trailer
//!
//! Every fallible step except writer I/O happens before the first byte is
//! written. Offsets are read from the writer while writing and never
//! computed ahead of time.
//!
//! ## Object numbering
//!
//! ```text
//! 1           Catalog
//! fonts       one object each
//! font files  descriptor, then program
//! images      image, then mask if one is declared
//! page root
//! header/footer content, in declaration order
//! page content, page by page
//! pages
//! info        only if any property is set
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::{PublishConfig, BINARY_MARKER, PDF_VERSION};
use crate::elements::sort_by_z_index;
use crate::error::{Error, Result};
use crate::geometry::{page_dimensions, Orientation, PageSize};
use crate::layout::LayoutContext;
use crate::object::PdfObject;
use crate::writer::font_manager::{font_resource_id, Font, FontFile};
use crate::writer::image_handler::{image_resource_id, mask_resource_id, ImageResource};
use crate::writer::object_serializer::CountingWriter;
use crate::writer::page::{Catalog, HeaderFooter, Page, PageRoot};
use crate::writer::properties::Properties;

fn default_fonts() -> Vec<Font> {
    Font::standard_family("Helvetica").unwrap_or_default()
}

/// Hands out object numbers in sequence.
#[derive(Debug, Default)]
struct Numbering {
    last: u32,
}

impl Numbering {
    fn assign(&mut self, object: &mut PdfObject, id: impl Into<String>, comment: &str) -> u32 {
        self.last += 1;
        object.assign(id, self.last);
        object.comment = Some(comment.to_string());
        self.last
    }
}

/// State of one publish: numbers resolved during positioning and the offsets
/// recorded while writing.
#[derive(Debug, Default)]
struct PublishSession {
    object_count: u32,
    page_root: u32,
    info: Option<u32>,
    /// Descriptor object number per font, for embedded faces
    font_descriptors: Vec<Option<u32>>,
    /// Byte offset per object, in numbering order
    offsets: Vec<u64>,
}

impl PublishSession {
    fn record(&mut self, object: &PdfObject) {
        debug_assert_eq!(
            object.object_number as usize,
            self.offsets.len() + 1,
            "objects must be written in numbering order"
        );
        log::trace!("object {} at {}", object.object_number, object.byte_position);
        self.offsets.push(object.byte_position);
    }
}

/// A document: pages, shared headers/footers, and the resources they use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Publish options
    #[serde(default)]
    pub config: PublishConfig,
    /// Information dictionary
    #[serde(default)]
    pub properties: Properties,
    /// Font faces; the Helvetica family unless given
    #[serde(default = "default_fonts")]
    pub fonts: Vec<Font>,
    /// Embedded TrueType programs
    #[serde(default)]
    pub font_files: Vec<FontFile>,
    /// Images
    #[serde(default)]
    pub images: Vec<ImageResource>,
    /// Headers and footers
    #[serde(default)]
    pub headers: Vec<HeaderFooter>,
    /// Pages
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(skip)]
    catalog: Catalog,
    #[serde(skip)]
    page_root: PageRoot,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            config: PublishConfig::default(),
            properties: Properties::default(),
            fonts: default_fonts(),
            font_files: Vec::new(),
            images: Vec::new(),
            headers: Vec::new(),
            pages: Vec::new(),
            catalog: Catalog::default(),
            page_root: PageRoot::default(),
        }
    }
}

impl Document {
    /// Empty document with the Helvetica family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document without any font.
    pub fn without_fonts() -> Self {
        Self {
            fonts: Vec::new(),
            ..Self::default()
        }
    }

    /// Read a document description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the publish options.
    pub fn with_config(mut self, config: PublishConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a page and return it for filling.
    pub fn add_page(&mut self, size: PageSize, orientation: Orientation) -> &mut Page {
        self.pages.push(Page::new(size, orientation));
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Add a standard font family (`Helvetica`, `Times` or `Courier`).
    pub fn add_standard_family(&mut self, family: &str) -> Result<()> {
        self.fonts.extend(Font::standard_family(family)?);
        Ok(())
    }

    /// Add a font face.
    pub fn add_font(&mut self, font: Font) {
        self.fonts.push(font);
    }

    /// Add a TrueType program.
    pub fn add_font_file(&mut self, file: FontFile) {
        self.font_files.push(file);
    }

    /// Add an image.
    pub fn add_image(&mut self, image: ImageResource) {
        self.images.push(image);
    }

    /// Add a header or footer block and return it for filling.
    pub fn add_header_footer(&mut self, name: impl Into<String>) -> &mut HeaderFooter {
        self.headers.push(HeaderFooter::new(name));
        let last = self.headers.len() - 1;
        &mut self.headers[last]
    }

    /// Publish into a byte vector.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.publish(Vec::new())
    }

    /// Publish the document and return the writer.
    ///
    /// Consumes the document: object numbers and offsets belong to exactly
    /// one output.
    pub fn publish<W: Write>(mut self, writer: W) -> Result<W> {
        let compress = self.config.compress;
        self.embed_files()?;
        self.prepare_streams(compress)?;
        let mut session = self.position_objects()?;

        let mut w = CountingWriter::new(writer);
        writeln!(w, "%PDF-{}", PDF_VERSION)?;
        w.write_all(BINARY_MARKER)?;

        self.write_objects(&mut w, &mut session)?;
        self.write_trailer(&mut w, &session)?;
        w.flush()?;

        log::debug!(
            "published {} objects, {} bytes",
            session.object_count,
            w.position()
        );
        Ok(w.into_inner())
    }

    /// Load external bytes of every font file and image.
    pub fn embed_files(&mut self) -> Result<()> {
        for file in &mut self.font_files {
            file.embed()?;
            if let Some(font) = self.fonts.iter().find(|f| f.file.as_ref() == Some(&file.name)) {
                file.set_base_font(font.base_font.clone());
            }
        }
        for font in &mut self.fonts {
            font.resolve_metrics(&self.font_files)?;
        }
        for image in &mut self.images {
            image.embed()?;
        }
        log::debug!(
            "embedded {} font files and {} images",
            self.font_files.len(),
            self.images.len()
        );
        Ok(())
    }

    /// Compute every stream payload.
    ///
    /// A header or footer is laid out against the first page that shows it,
    /// or against A4 portrait when no page does.
    pub fn prepare_streams(&mut self, compress: bool) -> Result<()> {
        for image in &mut self.images {
            image.prepare()?;
        }
        for file in &mut self.font_files {
            file.prepare(compress)?;
        }

        for block in &mut self.headers {
            let (width, height) = self
                .pages
                .iter()
                .find(|p| p.uses(&block.name))
                .map(Page::dimensions)
                .unwrap_or_else(|| page_dimensions(PageSize::A4, Orientation::Portrait));
            let ctx = LayoutContext::new(width, height, &self.fonts, &self.images);
            block.prepare(&ctx, compress)?;
        }

        for page in &mut self.pages {
            page.blocks(&self.headers)?;
            let (width, height) = page.dimensions();
            let ctx = LayoutContext::new(width, height, &self.fonts, &self.images);
            page.prepare(&ctx, compress)?;
        }
        log::debug!("prepared streams for {} pages", self.pages.len());
        Ok(())
    }

    /// Sort content into paint order and number every object.
    fn position_objects(&mut self) -> Result<PublishSession> {
        for block in &mut self.headers {
            sort_by_z_index(&mut block.contents);
        }
        for page in &mut self.pages {
            sort_by_z_index(&mut page.contents);
        }

        let mut numbering = Numbering::default();
        numbering.assign(&mut self.catalog.object, "Catalog", "Catalog");

        for (i, font) in self.fonts.iter_mut().enumerate() {
            numbering.assign(&mut font.object, font_resource_id(i), "Font");
        }
        for (i, file) in self.font_files.iter_mut().enumerate() {
            numbering.assign(&mut file.descriptor, format!("FD{}", i + 1), "FontDescriptor");
            numbering.assign(&mut file.program, format!("FF{}", i + 1), "FontFile2");
        }
        for (i, image) in self.images.iter_mut().enumerate() {
            numbering.assign(&mut image.object, image_resource_id(i), "Image");
            if image.has_mask() {
                numbering.assign(&mut image.mask_object, mask_resource_id(i), "SoftMask");
            }
        }
        let page_root = numbering.assign(&mut self.page_root.object, "Pages", "Pages");

        let mut content_index = 0;
        let contents = self
            .headers
            .iter_mut()
            .flat_map(|b| b.contents.iter_mut())
            .chain(self.pages.iter_mut().flat_map(|p| p.contents.iter_mut()));
        for content in contents {
            content_index += 1;
            let kind = content.kind();
            numbering.assign(content.object_mut(), format!("C{}", content_index), kind);
        }

        for (i, page) in self.pages.iter_mut().enumerate() {
            numbering.assign(&mut page.object, format!("P{}", i + 1), "Page");
        }

        let info = if self.properties.is_set() {
            Some(numbering.assign(&mut self.properties.object, "Info", "Info"))
        } else {
            None
        };

        let font_descriptors = self
            .fonts
            .iter()
            .map(|font| self.font_descriptor(font))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("numbered {} objects", numbering.last);
        Ok(PublishSession {
            object_count: numbering.last,
            page_root,
            info,
            font_descriptors,
            offsets: Vec::with_capacity(numbering.last as usize),
        })
    }

    /// Descriptor object number of an embedded face.
    fn font_descriptor(&self, font: &Font) -> Result<Option<u32>> {
        match &font.file {
            Some(name) => self
                .font_files
                .iter()
                .find(|f| &f.name == name)
                .map(|f| Some(f.descriptor.object_number))
                .ok_or_else(|| Error::FontNotFound(format!("font file '{}'", name))),
            None => Ok(None),
        }
    }

    /// Write every object in numbering order.
    fn write_objects<W: Write>(
        &mut self,
        w: &mut CountingWriter<W>,
        session: &mut PublishSession,
    ) -> Result<()> {
        self.catalog.publish(w, session.page_root)?;
        session.record(&self.catalog.object);

        let descriptors = std::mem::take(&mut session.font_descriptors);
        for (font, descriptor) in self.fonts.iter_mut().zip(&descriptors) {
            font.publish(w, *descriptor)?;
            session.record(&font.object);
        }
        for file in &mut self.font_files {
            file.publish(w)?;
            session.record(&file.descriptor);
            session.record(&file.program);
        }
        for image in &mut self.images {
            image.publish(w)?;
            session.record(&image.object);
            if image.has_mask() {
                session.record(&image.mask_object);
            }
        }

        let kids: Vec<u32> = self.pages.iter().map(|p| p.object.object_number).collect();
        self.page_root.publish(w, &kids)?;
        session.record(&self.page_root.object);

        for block in &mut self.headers {
            block.publish(w)?;
            for content in &block.contents {
                session.record(content.object());
            }
        }
        for page in &mut self.pages {
            page.publish_contents(w)?;
            for content in &page.contents {
                session.record(content.object());
            }
        }

        for page in &mut self.pages {
            let blocks = page.blocks(&self.headers)?;
            page.publish(w, session.page_root, &self.fonts, &self.images, &blocks)?;
            session.record(&page.object);
        }

        if session.info.is_some() {
            self.properties.publish(w)?;
            session.record(&self.properties.object);
        }

        debug_assert_eq!(session.offsets.len(), session.object_count as usize);
        Ok(())
    }

    /// Write the cross-reference table and trailer.
    fn write_trailer<W: Write>(
        &self,
        w: &mut CountingWriter<W>,
        session: &PublishSession,
    ) -> Result<()> {
        let startxref = w.position();
        let size = session.object_count + 1;

        writeln!(w, "xref\n0 {}", size)?;
        w.write_all(b"0000000000 65535 f \n")?;
        for offset in &session.offsets {
            writeln!(w, "{:010} 00000 n ", offset)?;
        }

        let root = self.catalog.object.object_number;
        writeln!(w, "trailer\n<</Size {}\n/Root {} 0 R", size, root)?;
        if let Some(info) = session.info {
            writeln!(w, "/Info {} 0 R", info)?;
        }
        write!(w, ">>\nstartxref\n{}\n%%EOF", startxref)?;
        Ok(())
    }
}
