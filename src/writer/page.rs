//! Page tree objects.
//!
//! A [`Page`] owns its content items and references up to two shared
//! [`HeaderFooter`] blocks by name. Its `/Contents` array lists the header
//! items, then the footer items, then its own, each in paint order. Its
//! `/Resources` carry every document font and the images drawn by any of
//! those items.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::elements::Content;
use crate::error::{Error, Result};
use crate::geometry::{page_dimensions, Orientation, PageSize};
use crate::layout::LayoutContext;
use crate::object::{Dictionary, PdfObject, PdfValue};
use crate::writer::font_manager::Font;
use crate::writer::image_handler::ImageResource;
use crate::writer::object_serializer::CountingWriter;

/// Content shared by every page that names it as header or footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Name pages refer to
    pub name: String,
    /// Content items
    #[serde(default)]
    pub contents: Vec<Content>,
}

impl HeaderFooter {
    /// Empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Vec::new(),
        }
    }

    /// Append a content item.
    pub fn add(&mut self, content: impl Into<Content>) -> &mut Self {
        self.contents.push(content.into());
        self
    }

    /// Compute every content stream.
    pub fn prepare(&mut self, ctx: &LayoutContext<'_>, compress: bool) -> Result<()> {
        for content in &mut self.contents {
            content.prepare(ctx, compress)?;
        }
        Ok(())
    }

    /// Write every content stream object.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        for content in &mut self.contents {
            content.publish(w)?;
        }
        Ok(())
    }
}

/// Look up a header or footer by name.
pub fn find_header_footer<'a>(blocks: &'a [HeaderFooter], name: &str) -> Result<&'a HeaderFooter> {
    blocks
        .iter()
        .find(|b| b.name == name)
        .ok_or_else(|| Error::HeaderFooterNotFound(name.to_string()))
}

/// One page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Paper size
    #[serde(default)]
    pub size: PageSize,
    /// Orientation
    #[serde(default)]
    pub orientation: Orientation,
    /// Header block name
    #[serde(default)]
    pub header: Option<String>,
    /// Footer block name
    #[serde(default)]
    pub footer: Option<String>,
    /// Content items
    #[serde(default)]
    pub contents: Vec<Content>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Page {
    /// Empty page.
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        Self {
            size,
            orientation,
            ..Default::default()
        }
    }

    /// Set the header block.
    pub fn with_header(mut self, name: impl Into<String>) -> Self {
        self.header = Some(name.into());
        self
    }

    /// Set the footer block.
    pub fn with_footer(mut self, name: impl Into<String>) -> Self {
        self.footer = Some(name.into());
        self
    }

    /// Append a content item.
    pub fn add(&mut self, content: impl Into<Content>) -> &mut Self {
        self.contents.push(content.into());
        self
    }

    /// Oriented `(width, height)`; also the content area.
    pub fn dimensions(&self) -> (i32, i32) {
        page_dimensions(self.size, self.orientation)
    }

    /// Whether this page shows the named block.
    pub fn uses(&self, block: &str) -> bool {
        self.header.as_deref() == Some(block) || self.footer.as_deref() == Some(block)
    }

    /// Header and footer, in that order.
    pub fn blocks<'a>(&self, blocks: &'a [HeaderFooter]) -> Result<Vec<&'a HeaderFooter>> {
        self.header
            .iter()
            .chain(self.footer.iter())
            .map(|name| find_header_footer(blocks, name))
            .collect()
    }

    /// Compute every content stream.
    pub fn prepare(&mut self, ctx: &LayoutContext<'_>, compress: bool) -> Result<()> {
        for content in &mut self.contents {
            content.prepare(ctx, compress)?;
        }
        Ok(())
    }

    /// Write the content stream objects of this page.
    pub fn publish_contents<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        for content in &mut self.contents {
            content.publish(w)?;
        }
        Ok(())
    }

    /// Page dictionary. Numbers must be assigned.
    pub fn dictionary(
        &self,
        parent: u32,
        fonts: &[Font],
        images: &[ImageResource],
        blocks: &[&HeaderFooter],
    ) -> Result<Dictionary> {
        let items: Vec<&Content> = blocks
            .iter()
            .flat_map(|b| b.contents.iter())
            .chain(self.contents.iter())
            .collect();

        let contents = items.iter().map(|c| c.object().reference()).collect();

        let mut font_resources = Dictionary::new();
        for font in fonts {
            font_resources.insert(font.object.id.as_str(), font.object.reference());
        }

        let mut xobjects = Dictionary::new();
        for name in items.iter().flat_map(|c| c.image_names()) {
            let image = images
                .iter()
                .find(|i| i.name == name)
                .ok_or_else(|| Error::ImageNotFound(name.to_string()))?;
            xobjects.insert(image.object.id.as_str(), image.object.reference());
        }

        let mut resources = Dictionary::new();
        if !font_resources.is_empty() {
            resources.insert("Font", font_resources);
        }
        if !xobjects.is_empty() {
            resources.insert("XObject", xobjects);
        }

        let (width, height) = self.dimensions();
        let mut dict = Dictionary::new();
        dict.insert("Type", PdfValue::name("Page"))
            .insert("Parent", PdfValue::Reference(parent))
            .insert("MediaBox", PdfValue::rect(0, 0, width as i64, height as i64))
            .insert("Contents", PdfValue::Array(contents))
            .insert("Resources", resources);
        Ok(dict)
    }

    /// Write the page object.
    pub fn publish<W: Write>(
        &mut self,
        w: &mut CountingWriter<W>,
        parent: u32,
        fonts: &[Font],
        images: &[ImageResource],
        blocks: &[&HeaderFooter],
    ) -> Result<()> {
        let dict = self.dictionary(parent, fonts, images, blocks)?;
        self.object.publish(w, dict)
    }
}

/// Root of the page tree.
#[derive(Debug, Clone, Default)]
pub struct PageRoot {
    /// PDF object state
    pub object: PdfObject,
}

impl PageRoot {
    /// `/Pages` dictionary over the given page object numbers.
    pub fn dictionary(&self, kids: &[u32]) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type", PdfValue::name("Pages"))
            .insert(
                "Kids",
                PdfValue::Array(kids.iter().map(|&n| PdfValue::Reference(n)).collect()),
            )
            .insert("Count", PdfValue::Integer(kids.len() as i64));
        dict
    }

    /// Write the page tree root.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>, kids: &[u32]) -> Result<()> {
        let dict = self.dictionary(kids);
        self.object.publish(w, dict)
    }
}

/// Document catalog, always object 1.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// PDF object state
    pub object: PdfObject,
}

impl Catalog {
    /// Write the catalog.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>, page_root: u32) -> Result<()> {
        let dict = Dictionary::new()
            .with("Type", PdfValue::name("Catalog"))
            .with("Pages", PdfValue::Reference(page_root));
        self.object.publish(w, dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Image, Shape};
    use crate::writer::object_serializer::ObjectSerializer;
    use crate::writer::resource::ResourceSource;

    fn numbered(mut content: Content, n: u32) -> Content {
        content.object_mut().assign(format!("C{}", n), n);
        content
    }

    fn render(dict: &Dictionary) -> String {
        ObjectSerializer::to_string(&PdfValue::Dictionary(dict.clone()))
    }

    #[test]
    fn test_contents_order_header_footer_page() {
        let mut header = HeaderFooter::new("head");
        header.contents.push(numbered(Shape::rectangle(0, 0, 1, 1).into(), 5));
        let mut footer = HeaderFooter::new("foot");
        footer.contents.push(numbered(Shape::rectangle(0, 0, 1, 1).into(), 6));
        let mut page = Page::default().with_header("head").with_footer("foot");
        page.contents.push(numbered(Shape::rectangle(0, 0, 1, 1).into(), 7));

        let blocks = vec![footer, header];
        let refs = page.blocks(&blocks).unwrap();
        assert_eq!(refs[0].name, "head");

        let dict = page.dictionary(2, &[], &[], &refs).unwrap();
        let text = render(&dict);
        assert!(text.contains("/Contents [5 0 R 6 0 R 7 0 R]"));
        assert!(text.contains("/MediaBox [0 0 595 842]"));
        assert!(!text.contains("/Font"));
        assert!(!text.contains("/XObject"));
    }

    #[test]
    fn test_resources_list_used_images_only() {
        let mut images = vec![
            ImageResource::new("unused", ResourceSource::bytes(Vec::<u8>::new())),
            ImageResource::new("logo", ResourceSource::bytes(Vec::<u8>::new())),
        ];
        images[0].object.assign("I1", 3);
        images[1].object.assign("I2", 4);
        let mut fonts = Font::standard_family("Helvetica").unwrap();
        fonts.truncate(1);
        fonts[0].object.assign("F1", 2);

        let mut page = Page::default();
        page.contents.push(numbered(Image::new("logo", 0, 0).into(), 8));
        let dict = page.dictionary(5, &fonts, &images, &[]).unwrap();
        let text = render(&dict);
        assert!(text.contains("/F1 2 0 R"));
        assert!(text.contains("/I2 4 0 R"));
        assert!(!text.contains("/I1"));
    }

    #[test]
    fn test_missing_header_is_error() {
        let page = Page::default().with_header("nope");
        assert!(matches!(page.blocks(&[]), Err(Error::HeaderFooterNotFound(_))));
    }

    #[test]
    fn test_landscape_dimensions() {
        let page = Page::new(PageSize::Letter, Orientation::Landscape);
        assert_eq!(page.dimensions(), (792, 612));
    }

    #[test]
    fn test_page_root_dictionary() {
        let root = PageRoot::default();
        let text = render(&root.dictionary(&[9, 10]));
        assert!(text.contains("/Type /Pages"));
        assert!(text.contains("/Kids [9 0 R 10 0 R]"));
        assert!(text.contains("/Count 2"));
    }
}
