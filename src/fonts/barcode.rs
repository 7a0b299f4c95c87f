//! Barcode typefaces.
//!
//! A barcode typeface maps each character of its alphabet to a pattern of
//! `0`/`1` modules. A `1` is drawn as a bar one module wide, a `0` leaves a
//! gap of the same width.

use crate::error::{Error, Result};

/// Code 39 alphabet, positionally aligned with [`CODE39_DEFINITIONS`].
const CODE39_CHARACTERS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

/// Code 39 patterns: nine elements (three wide) as twelve modules plus the
/// inter-character gap.
#[rustfmt::skip]
const CODE39_DEFINITIONS: [&str; 44] = [
    "1010011011010", "1101001010110", "1011001010110", "1101100101010", // 0-3
    "1010011010110", "1101001101010", "1011001101010", "1010010110110", // 4-7
    "1101001011010", "1011001011010",                                   // 8-9
    "1101010010110", "1011010010110", "1101101001010", "1010110010110", // A-D
    "1101011001010", "1011011001010", "1010100110110", "1101010011010", // E-H
    "1011010011010", "1010110011010", "1101010100110", "1011010100110", // I-L
    "1101101010010", "1010110100110", "1101011010010", "1011011010010", // M-P
    "1010101100110", "1101010110010", "1011010110010", "1010110110010", // Q-T
    "1100101010110", "1001101010110", "1100110101010", "1001011010110", // U-X
    "1100101101010", "1001101101010",                                   // Y-Z
    "1001010110110", "1100101011010", "1001101011010", "1001001001010", // - . space $
    "1001001010010", "1001010010010", "1010010010010", "1001011011010", // / + % *
];

/// Width of one Code 39 character in thousandths of the font size.
const CODE39_WIDTH: u16 = 1300;

/// Barcode alphabet with its stroke patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeTypeface {
    /// Typeface name
    pub name: String,
    /// Valid symbols, in definition order
    pub character_set: Vec<char>,
    /// Character that opens a symbol
    pub start_character: char,
    /// Character that closes a symbol
    pub stop_character: char,
    /// One pattern per character of `character_set`
    pub definitions: Vec<&'static str>,
    /// Width per character, thousandths of the font size
    pub metrics: Vec<u16>,
}

impl BarcodeTypeface {
    /// The Code 39 typeface.
    pub fn code39() -> Self {
        let character_set: Vec<char> = CODE39_CHARACTERS.chars().collect();
        let metrics = vec![CODE39_WIDTH; character_set.len()];
        Self {
            name: "Code39".to_string(),
            character_set,
            start_character: '*',
            stop_character: '*',
            definitions: CODE39_DEFINITIONS.to_vec(),
            metrics,
        }
    }

    /// Look up a built-in typeface by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "code39" | "code 39" | "code-39" => Ok(Self::code39()),
            _ => Err(Error::UnknownTypeface(name.to_string())),
        }
    }

    /// Pattern and width of one character.
    pub fn symbol(&self, ch: char) -> Result<(&'static str, u16)> {
        self.character_set
            .iter()
            .position(|&c| c == ch)
            .map(|i| (self.definitions[i], self.metrics[i]))
            .ok_or_else(|| Error::BarcodeCharacter {
                character: ch,
                typeface: self.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code39_table_is_aligned() {
        let face = BarcodeTypeface::code39();
        assert_eq!(face.character_set.len(), face.definitions.len());
        for pattern in &face.definitions {
            assert_eq!(pattern.len(), 13, "{}", pattern);
            assert!(pattern.starts_with('1'));
            assert!(pattern.ends_with("10"));
        }
    }

    #[test]
    fn test_code39_patterns_are_unique() {
        let face = BarcodeTypeface::code39();
        let mut seen = face.definitions.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), face.definitions.len());
    }

    #[test]
    fn test_symbol_lookup() {
        let face = BarcodeTypeface::code39();
        let (pattern, width) = face.symbol('A').unwrap();
        assert_eq!(pattern, "1101010010110");
        assert_eq!(width, 1300);
        assert_eq!(face.symbol('*').unwrap().0, "1001011011010");
    }

    #[test]
    fn test_unknown_character() {
        let face = BarcodeTypeface::code39();
        let err = face.symbol('#').unwrap_err();
        assert!(matches!(err, Error::BarcodeCharacter { character: '#', .. }));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(BarcodeTypeface::by_name("CODE39").unwrap().name, "Code39");
        assert!(matches!(
            BarcodeTypeface::by_name("EAN13"),
            Err(Error::UnknownTypeface(_))
        ));
    }
}
