//! PDF object types.
//!
//! [`PdfValue`] and [`Dictionary`] describe the body of an indirect object.
//! [`PdfObject`] is the state every serializable entity carries: its
//! document-unique id, the object number assigned for the current publish,
//! the byte offset recorded while writing, and an optional stream payload.

use std::io::Write;

use indexmap::IndexMap;

use crate::error::Result;
use crate::writer::object_serializer::{compress_data, CountingWriter, ObjectSerializer};

/// Value inside a PDF dictionary or array.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// Name (written with a leading `/`)
    Name(String),
    /// Literal string, escaped on output
    Text(String),
    /// Pre-formatted PDF syntax written verbatim
    Raw(String),
    /// Indirect reference to an object number (generation 0)
    Reference(u32),
    /// Array of values
    Array(Vec<PdfValue>),
    /// Nested dictionary
    Dictionary(Dictionary),
}

impl PdfValue {
    /// Create a Name value.
    pub fn name(s: impl Into<String>) -> Self {
        PdfValue::Name(s.into())
    }

    /// Create a literal string value.
    pub fn text(s: impl Into<String>) -> Self {
        PdfValue::Text(s.into())
    }

    /// Create an integer rectangle array `[llx lly urx ury]`.
    pub fn rect(llx: i64, lly: i64, urx: i64, ury: i64) -> Self {
        PdfValue::Array(vec![
            PdfValue::Integer(llx),
            PdfValue::Integer(lly),
            PdfValue::Integer(urx),
            PdfValue::Integer(ury),
        ])
    }
}

impl From<Dictionary> for PdfValue {
    fn from(dict: Dictionary) -> Self {
        PdfValue::Dictionary(dict)
    }
}

/// Ordered dictionary of PDF key/value pairs.
///
/// Entries are written in insertion order. The order has no meaning to a PDF
/// reader but it changes the bytes written, and with them every later offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, PdfValue>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&PdfValue> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Serializable unit of a PDF file.
///
/// The payload must be final before [`PdfObject::publish`] runs: `/Length`
/// is taken from it and the offsets of every later object depend on it.
#[derive(Debug, Clone, Default)]
pub struct PdfObject {
    /// Short document-unique id used inside content streams (`F1`, `I2`, ...)
    pub id: String,
    /// 1-based object number, assigned once per publish
    pub object_number: u32,
    /// Absolute offset of the `N 0 obj` token, recorded while writing
    pub byte_position: u64,
    /// Comment written after the `obj` keyword
    pub comment: Option<String>,
    payload: Option<Vec<u8>>,
    compressed: bool,
}

impl PdfObject {
    /// Create an object with a comment.
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// Assign the id and object number for this publish.
    pub fn assign(&mut self, id: impl Into<String>, object_number: u32) {
        self.id = id.into();
        self.object_number = object_number;
    }

    /// Indirect reference to this object.
    pub fn reference(&self) -> PdfValue {
        PdfValue::Reference(self.object_number)
    }

    /// Replace the raw stream payload.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = Some(payload);
        self.compressed = false;
    }

    /// Stream payload as it will be written.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Whether the payload was deflated by [`PdfObject::prepare`].
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Finalize the payload, deflating it when `compress` is set.
    pub fn prepare(&mut self, compress: bool) -> Result<()> {
        if !compress || self.compressed {
            return Ok(());
        }
        if let Some(raw) = self.payload.take() {
            self.payload = Some(compress_data(&raw)?);
            self.compressed = true;
        }
        Ok(())
    }

    /// Write this object.
    ///
    /// Records the writer position as `byte_position` before any byte is
    /// written, then emits `N 0 obj`, the dictionary (with `/Length` and
    /// `/Filter` added for stream payloads), the stream and `endobj`.
    pub fn publish<W: Write>(
        &mut self,
        w: &mut CountingWriter<W>,
        mut dict: Dictionary,
    ) -> Result<()> {
        self.byte_position = w.position();

        write!(w, "{} 0 obj", self.object_number)?;
        if let Some(comment) = &self.comment {
            write!(w, " % {}", comment)?;
        }
        w.write_all(b"\n")?;

        if let Some(payload) = &self.payload {
            dict.insert("Length", PdfValue::Integer(payload.len() as i64));
            if self.compressed {
                dict.insert("Filter", PdfValue::name("FlateDecode"));
            }
        }
        ObjectSerializer::write_dictionary(w, &dict, 0)?;
        w.write_all(b"\n")?;

        if let Some(payload) = &self.payload {
            w.write_all(b"stream\n")?;
            w.write_all(payload)?;
            w.write_all(b"\nendstream\n")?;
        }
        w.write_all(b"endobj\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publish_to_string(obj: &mut PdfObject, dict: Dictionary, preamble: &[u8]) -> String {
        let mut w = CountingWriter::new(Vec::new());
        w.write_all(preamble).unwrap();
        obj.publish(&mut w, dict).unwrap();
        String::from_utf8_lossy(&w.into_inner()).to_string()
    }

    #[test]
    fn test_dictionary_keeps_insertion_order() {
        let dict = Dictionary::new()
            .with("Type", PdfValue::name("Page"))
            .with("Count", PdfValue::Integer(1))
            .with("Alpha", PdfValue::Integer(2));
        let keys: Vec<_> = dict.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Type", "Count", "Alpha"]);
    }

    #[test]
    fn test_publish_records_offset_before_writing() {
        let mut obj = PdfObject::default();
        obj.assign("Catalog", 1);
        let text = publish_to_string(
            &mut obj,
            Dictionary::new().with("Type", PdfValue::name("Catalog")),
            b"0123456789",
        );
        assert_eq!(obj.byte_position, 10);
        assert!(text[10..].starts_with("1 0 obj\n"));
        assert!(text.ends_with("endobj\n"));
    }

    #[test]
    fn test_publish_stream_adds_length() {
        let mut obj = PdfObject::with_comment("Shape");
        obj.assign("C1", 4);
        obj.set_payload(b"0 0 m\n".to_vec());
        let text = publish_to_string(&mut obj, Dictionary::new(), b"");
        assert_eq!(
            text,
            "4 0 obj % Shape\n<<\n/Length 6\n>>\nstream\n0 0 m\n\nendstream\nendobj\n"
        );
    }

    #[test]
    fn test_prepare_compresses_once() {
        let mut obj = PdfObject::default();
        obj.set_payload(vec![b'a'; 200]);
        obj.prepare(true).unwrap();
        assert!(obj.is_compressed());
        let first = obj.payload().unwrap().to_vec();
        assert!(first.len() < 200);
        obj.prepare(true).unwrap();
        assert_eq!(obj.payload().unwrap(), first.as_slice());

        let text = publish_to_string(&mut obj, Dictionary::new(), b"");
        assert!(text.contains(&format!("/Length {}\n/Filter /FlateDecode\n", first.len())));
    }

    #[test]
    fn test_prepare_without_compress_keeps_payload() {
        let mut obj = PdfObject::default();
        obj.set_payload(b"BT ET".to_vec());
        obj.prepare(false).unwrap();
        assert!(!obj.is_compressed());
        assert_eq!(obj.payload().unwrap(), b"BT ET");
    }
}
