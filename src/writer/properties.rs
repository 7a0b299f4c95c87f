//! Document information dictionary.

use std::io::Write;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::object::{Dictionary, PdfObject, PdfValue};
use crate::writer::object_serializer::CountingWriter;

/// Format a timestamp as a PDF date: `D:YYYYMMDDHHmmSS+HH'mm'`.
///
/// The zone part is the timestamp's own offset from UTC; it is not
/// recomputed against the current UTC time.
pub fn format_pdf_date(timestamp: &DateTime<FixedOffset>) -> String {
    let offset = timestamp.offset().local_minus_utc() / 60;
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "D:{}{}{:02}'{:02}'",
        timestamp.format("%Y%m%d%H%M%S"),
        sign,
        offset / 60,
        offset % 60
    )
}

/// Metadata written to the `/Info` dictionary.
///
/// The dictionary is emitted only when at least one field is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Properties {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    /// Author
    #[serde(default)]
    pub author: Option<String>,
    /// Subject
    #[serde(default)]
    pub subject: Option<String>,
    /// Keywords
    #[serde(default)]
    pub keywords: Option<String>,
    /// Application that produced the description
    #[serde(default)]
    pub creator: Option<String>,
    /// Application that wrote the PDF
    #[serde(default)]
    pub producer: Option<String>,
    /// Creation time
    #[serde(default)]
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Last modification time
    #[serde(default)]
    pub mod_date: Option<DateTime<FixedOffset>>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Properties {
    /// Empty properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Stamp creation and modification time with the local clock.
    pub fn stamped_now(mut self) -> Self {
        let now: DateTime<FixedOffset> = Local::now().into();
        self.creation_date = Some(now);
        self.mod_date = Some(now);
        self
    }

    /// Whether any field is set.
    pub fn is_set(&self) -> bool {
        self.title.is_some()
            || self.author.is_some()
            || self.subject.is_some()
            || self.keywords.is_some()
            || self.creator.is_some()
            || self.producer.is_some()
            || self.creation_date.is_some()
            || self.mod_date.is_some()
    }

    /// `/Info` dictionary with the set fields.
    pub fn dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let strings = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                dict.insert(key, PdfValue::text(value.as_str()));
            }
        }
        if let Some(date) = &self.creation_date {
            dict.insert("CreationDate", PdfValue::text(format_pdf_date(date)));
        }
        if let Some(date) = &self.mod_date {
            dict.insert("ModDate", PdfValue::text(format_pdf_date(date)));
        }
        dict
    }

    /// Write the information dictionary.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        let dict = self.dictionary();
        self.object.publish(w, dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::ObjectSerializer;
    use chrono::TimeZone;

    #[test]
    fn test_format_pdf_date_offsets() {
        let east = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let ts = east.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_pdf_date(&ts), "D:20240309140507+05'30'");

        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        let ts = west.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_pdf_date(&ts), "D:20231231235959-08'00'");

        let utc = FixedOffset::east_opt(0).unwrap();
        let ts = utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_pdf_date(&ts), "D:20200101000000+00'00'");
    }

    #[test]
    fn test_empty_properties_are_not_set() {
        assert!(!Properties::new().is_set());
        assert!(Properties::new().with_title("T").is_set());
        assert!(Properties::new().stamped_now().is_set());
    }

    #[test]
    fn test_dictionary_contains_only_set_fields() {
        let mut props = Properties::new().with_title("Quarterly (Q3)").with_author("Finance");
        let utc = FixedOffset::east_opt(0).unwrap();
        props.creation_date = Some(utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let text = ObjectSerializer::to_string(&PdfValue::Dictionary(props.dictionary()));
        assert!(text.contains("/Title (Quarterly \\(Q3\\))"));
        assert!(text.contains("/Author (Finance)"));
        assert!(text.contains("/CreationDate (D:20240102030405+00'00')"));
        assert!(!text.contains("/Subject"));
        assert!(!text.contains("/ModDate"));
    }

    #[test]
    fn test_properties_from_json() {
        let props: Properties = serde_json::from_str(
            r#"{"title": "Report", "creation_date": "2024-05-01T10:00:00+02:00"}"#,
        )
        .unwrap();
        let text = ObjectSerializer::to_string(&PdfValue::Dictionary(props.dictionary()));
        assert!(text.contains("/CreationDate (D:20240501100000+02'00')"));
    }
}
