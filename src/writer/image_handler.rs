//! Image handling for PDF generation.
//!
//! Images are embedded as Image XObjects without decoding the raster.
//!
//! # Supported Formats
//!
//! - **JPEG**: pass-through with the `DCTDecode` filter; gray and RGB
//! - **PNG**: the IDAT stream is passed through with the `FlateDecode` filter
//!   and PNG predictors; gray, RGB and palette images without alpha
//!
//! An optional grayscale mask image becomes the `/SMask` of the image and
//! takes the object slot right after it.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::object::{Dictionary, PdfObject, PdfValue};
use crate::writer::object_serializer::CountingWriter;
use crate::writer::resource::ResourceSource;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Resource id of the image at `index` in the document image table.
pub fn image_resource_id(index: usize) -> String {
    format!("I{}", index + 1)
}

/// Resource id of the mask of the image at `index`.
pub fn mask_resource_id(index: usize) -> String {
    format!("M{}", index + 1)
}

/// Color space of an embedded raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// Palette of RGB triples, one index per pixel
    Indexed(Vec<u8>),
}

impl ColorSpace {
    /// Get the number of color components per pixel.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray | ColorSpace::Indexed(_) => 1,
            ColorSpace::DeviceRGB => 3,
        }
    }

    fn to_pdf(&self) -> PdfValue {
        match self {
            ColorSpace::DeviceGray => PdfValue::name("DeviceGray"),
            ColorSpace::DeviceRGB => PdfValue::name("DeviceRGB"),
            ColorSpace::Indexed(palette) => {
                let hex: String = palette.iter().map(|b| format!("{:02X}", b)).collect();
                let hival = (palette.len() / 3).saturating_sub(1);
                PdfValue::Raw(format!("[/Indexed /DeviceRGB {} <{}>]", hival, hex))
            },
        }
    }
}

/// Encoding of the embedded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterEncoding {
    /// Baseline or progressive JPEG
    Jpeg,
    /// Zlib stream with PNG row predictors
    Png,
}

/// Header information and encoded bytes of a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per component
    pub bits_per_component: u8,
    /// Color space
    pub color_space: ColorSpace,
    /// Encoding of `data`
    pub encoding: RasterEncoding,
    /// Encoded raster bytes as they go into the stream
    pub data: Vec<u8>,
}

impl RasterInfo {
    /// Inspect JPEG or PNG bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            Self::from_jpeg(data)
        } else if data.starts_with(PNG_SIGNATURE) {
            Self::from_png(&data)
        } else {
            Err(Error::Unsupported("image format (expected JPEG or PNG)".to_string()))
        }
    }

    /// Inspect a JPEG; the file is embedded unchanged.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self> {
        let (width, height, components) = parse_jpeg_header(&data)?;
        let color_space = match components {
            1 => ColorSpace::DeviceGray,
            3 => ColorSpace::DeviceRGB,
            4 => return Err(Error::Unsupported("CMYK JPEG images".to_string())),
            n => return Err(Error::Image(format!("JPEG with {} components", n))),
        };
        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            encoding: RasterEncoding::Jpeg,
            data,
        })
    }

    /// Inspect a PNG and collect its compressed image data.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        if !data.starts_with(PNG_SIGNATURE) {
            return Err(Error::Image("Not a valid PNG".to_string()));
        }
        let truncated = |_| Error::Image("Truncated PNG chunk".to_string());

        let mut cursor = Cursor::new(&data[PNG_SIGNATURE.len()..]);
        let mut header: Option<(u32, u32, u8, u8)> = None;
        let mut palette = Vec::new();
        let mut idat = Vec::new();

        loop {
            let length = cursor.read_u32::<BigEndian>().map_err(truncated)? as usize;
            let mut kind = [0u8; 4];
            cursor.read_exact(&mut kind).map_err(truncated)?;
            let mut chunk = vec![0u8; length];
            cursor.read_exact(&mut chunk).map_err(truncated)?;
            let _crc = cursor.read_u32::<BigEndian>().map_err(truncated)?;

            match &kind {
                b"IHDR" => {
                    let mut ihdr = Cursor::new(&chunk);
                    let width = ihdr.read_u32::<BigEndian>().map_err(truncated)?;
                    let height = ihdr.read_u32::<BigEndian>().map_err(truncated)?;
                    let bit_depth = ihdr.read_u8().map_err(truncated)?;
                    let color_type = ihdr.read_u8().map_err(truncated)?;
                    let _compression = ihdr.read_u8().map_err(truncated)?;
                    let _filter = ihdr.read_u8().map_err(truncated)?;
                    let interlace = ihdr.read_u8().map_err(truncated)?;
                    if interlace != 0 {
                        return Err(Error::Unsupported("interlaced PNG images".to_string()));
                    }
                    header = Some((width, height, bit_depth, color_type));
                },
                b"PLTE" => palette = chunk,
                b"IDAT" => idat.extend_from_slice(&chunk),
                b"IEND" => break,
                _ => {},
            }
        }

        let (width, height, bit_depth, color_type) =
            header.ok_or_else(|| Error::Image("PNG without IHDR".to_string()))?;
        let color_space = match color_type {
            0 => ColorSpace::DeviceGray,
            2 => ColorSpace::DeviceRGB,
            3 if !palette.is_empty() => ColorSpace::Indexed(palette),
            3 => return Err(Error::Image("palette PNG without PLTE".to_string())),
            4 | 6 => return Err(Error::Unsupported("PNG images with an alpha channel".to_string())),
            n => return Err(Error::Image(format!("PNG color type {}", n))),
        };
        if idat.is_empty() {
            return Err(Error::Image("PNG without image data".to_string()));
        }

        Ok(Self {
            width,
            height,
            bits_per_component: bit_depth,
            color_space,
            encoding: RasterEncoding::Png,
            data: idat,
        })
    }

    /// XObject dictionary without `/Length`, which the object adds.
    pub fn xobject_dict(&self, soft_mask: Option<u32>) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type", PdfValue::name("XObject"))
            .insert("Subtype", PdfValue::name("Image"))
            .insert("Width", PdfValue::Integer(self.width as i64))
            .insert("Height", PdfValue::Integer(self.height as i64))
            .insert("ColorSpace", self.color_space.to_pdf())
            .insert("BitsPerComponent", PdfValue::Integer(self.bits_per_component as i64));

        match self.encoding {
            RasterEncoding::Jpeg => {
                dict.insert("Filter", PdfValue::name("DCTDecode"));
            },
            RasterEncoding::Png => {
                let decode_parms = Dictionary::new()
                    .with("Predictor", PdfValue::Integer(15))
                    .with("Colors", PdfValue::Integer(self.color_space.components() as i64))
                    .with("BitsPerComponent", PdfValue::Integer(self.bits_per_component as i64))
                    .with("Columns", PdfValue::Integer(self.width as i64));
                dict.insert("Filter", PdfValue::name("FlateDecode"))
                    .insert("DecodeParms", decode_parms);
            },
        }

        if let Some(mask) = soft_mask {
            dict.insert("SMask", PdfValue::Reference(mask));
        }
        dict
    }
}

/// Read width, height and component count from the SOF marker.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, u8)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::Image("Not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Fill bytes and stuffed zeros
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        if matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE | 0xCF
        ) {
            if pos + 8 > data.len() {
                return Err(Error::Image("Truncated JPEG header".to_string()));
            }
            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            return Ok((width, height, data[pos + 7]));
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += length;
    }

    Err(Error::Image("No SOF marker found in JPEG".to_string()))
}

/// Named image available to content on any page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResource {
    /// Name referenced by image content and table cells
    pub name: String,
    /// Where the image bytes are read from
    pub source: ResourceSource,
    /// Optional grayscale image used as soft mask
    #[serde(default)]
    pub mask: Option<ResourceSource>,
    /// Image object state
    #[serde(skip)]
    pub object: PdfObject,
    /// Mask object state
    #[serde(skip)]
    pub mask_object: PdfObject,
    #[serde(skip)]
    info: Option<RasterInfo>,
    #[serde(skip)]
    mask_info: Option<RasterInfo>,
}

impl ImageResource {
    /// Create an image resource.
    pub fn new(name: impl Into<String>, source: ResourceSource) -> Self {
        Self {
            name: name.into(),
            source,
            mask: None,
            object: PdfObject::default(),
            mask_object: PdfObject::default(),
            info: None,
            mask_info: None,
        }
    }

    /// Attach a soft mask.
    pub fn with_mask(mut self, mask: ResourceSource) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Whether a mask was declared; a masked image takes two object slots.
    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Raster header read during embedding.
    pub fn info(&self) -> Option<&RasterInfo> {
        self.info.as_ref()
    }

    /// Pixel size, once embedded.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        self.info.as_ref().map(|i| (i.width, i.height))
    }

    /// Load and inspect the image and its mask.
    pub fn embed(&mut self) -> Result<()> {
        let info = RasterInfo::from_bytes(self.source.load()?)?;
        log::debug!(
            "embedded image '{}' {}x{} ({} bytes)",
            self.name,
            info.width,
            info.height,
            info.data.len()
        );
        self.object.set_payload(info.data.clone());
        self.info = Some(info);

        if let Some(mask) = &self.mask {
            let mask_info = RasterInfo::from_bytes(mask.load()?)?;
            if mask_info.color_space != ColorSpace::DeviceGray {
                return Err(Error::Unsupported(format!(
                    "mask of image '{}' is not grayscale",
                    self.name
                )));
            }
            self.mask_object.set_payload(mask_info.data.clone());
            self.mask_info = Some(mask_info);
        }
        Ok(())
    }

    /// Finalize the streams. Image data keeps its own encoding.
    pub fn prepare(&mut self) -> Result<()> {
        self.object.prepare(false)?;
        self.mask_object.prepare(false)
    }

    /// Write the image and, if present, its mask.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        let info = self
            .info
            .as_ref()
            .ok_or_else(|| Error::Image(format!("image '{}' was not embedded", self.name)))?;
        let soft_mask = self.mask_info.as_ref().map(|_| self.mask_object.object_number);
        let dict = info.xobject_dict(soft_mask);
        self.object.publish(w, dict)?;

        if let Some(mask_info) = &self.mask_info {
            let dict = mask_info.xobject_dict(None);
            self.mask_object.publish(w, dict)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::ObjectSerializer;

    /// SOI plus a baseline SOF0 segment.
    fn jpeg_header(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 0x08];
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        data.extend_from_slice(&[0x01, 0x11, 0x00, 0xFF, 0xD9]);
        data
    }

    fn png(width: u32, height: u32, color_type: u8, extra: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(kind);
            out.extend_from_slice(data);
            let mut crc_data = kind.to_vec();
            crc_data.extend_from_slice(data);
            out.extend_from_slice(&crc32fast::hash(&crc_data).to_be_bytes());
        }

        let mut out = PNG_SIGNATURE.to_vec();
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
        chunk(&mut out, b"IHDR", &ihdr);
        for (kind, data) in extra {
            chunk(&mut out, kind, data);
        }
        chunk(&mut out, b"IEND", &[]);
        out
    }

    #[test]
    fn test_jpeg_header() {
        let info = RasterInfo::from_bytes(jpeg_header(640, 480, 3)).unwrap();
        assert_eq!((info.width, info.height), (640, 480));
        assert_eq!(info.color_space, ColorSpace::DeviceRGB);
        assert_eq!(info.encoding, RasterEncoding::Jpeg);
    }

    #[test]
    fn test_cmyk_jpeg_is_unsupported() {
        let result = RasterInfo::from_jpeg(jpeg_header(10, 10, 4));
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_invalid_jpeg() {
        assert!(matches!(
            RasterInfo::from_jpeg(vec![0xFF, 0xD8, 0x00]),
            Err(Error::Image(_))
        ));
        assert!(RasterInfo::from_bytes(b"GIF89a".to_vec()).is_err());
    }

    #[test]
    fn test_png_idat_concatenated() {
        let data = png(4, 2, 2, &[(b"IDAT", vec![1, 2, 3]), (b"IDAT", vec![4, 5])]);
        let info = RasterInfo::from_png(&data).unwrap();
        assert_eq!((info.width, info.height), (4, 2));
        assert_eq!(info.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(info.color_space, ColorSpace::DeviceRGB);
    }

    #[test]
    fn test_png_alpha_is_unsupported() {
        for color_type in [4, 6] {
            let data = png(1, 1, color_type, &[(b"IDAT", vec![0])]);
            assert!(matches!(RasterInfo::from_png(&data), Err(Error::Unsupported(_))));
        }
    }

    #[test]
    fn test_png_palette() {
        let data = png(1, 1, 3, &[(b"PLTE", vec![255, 0, 0, 0, 0, 255]), (b"IDAT", vec![9])]);
        let info = RasterInfo::from_png(&data).unwrap();
        let dict = info.xobject_dict(None);
        assert_eq!(
            dict.get("ColorSpace"),
            Some(&PdfValue::Raw("[/Indexed /DeviceRGB 1 <FF00000000FF>]".to_string()))
        );
    }

    #[test]
    fn test_png_xobject_dict() {
        let data = png(7, 3, 0, &[(b"IDAT", vec![0, 1])]);
        let info = RasterInfo::from_png(&data).unwrap();
        let text = ObjectSerializer::to_string(&PdfValue::Dictionary(info.xobject_dict(Some(9))));
        assert!(text.contains("/ColorSpace /DeviceGray"));
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(text.contains("/Predictor 15"));
        assert!(text.contains("/Colors 1"));
        assert!(text.contains("/Columns 7"));
        assert!(text.contains("/SMask 9 0 R"));
    }

    #[test]
    fn test_embed_with_mask() {
        let mut image = ImageResource::new("photo", ResourceSource::bytes(jpeg_header(2, 2, 3)))
            .with_mask(ResourceSource::bytes(jpeg_header(2, 2, 1)));
        image.embed().unwrap();
        image.prepare().unwrap();
        assert!(image.has_mask());
        assert_eq!(image.pixel_size(), Some((2, 2)));
        assert!(!image.object.is_compressed());
    }

    #[test]
    fn test_color_mask_rejected() {
        let mut image = ImageResource::new("photo", ResourceSource::bytes(jpeg_header(2, 2, 3)))
            .with_mask(ResourceSource::bytes(jpeg_header(2, 2, 3)));
        assert!(matches!(image.embed(), Err(Error::Unsupported(_))));
    }
}
