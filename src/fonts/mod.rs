//! Typeface data: standard font metrics, WinAnsi encoding, barcode
//! typefaces and TrueType inspection.

pub mod barcode;
pub mod encoding;
pub mod metrics;
pub mod truetype;

pub use barcode::BarcodeTypeface;
pub use encoding::{encode_winansi, unicode_to_winansi, winansi_to_char};
pub use metrics::{is_standard_font, standard_metrics, StandardMetrics};
pub use truetype::TrueTypeMetrics;
