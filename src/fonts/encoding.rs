//! WinAnsi (Windows-1252) text encoding.
//!
//! All fonts are written with `/Encoding /WinAnsiEncoding`, so text is turned
//! into WinAnsi bytes before it is measured or placed in a content stream.

/// Code points of WinAnsi bytes 0x80..=0x9F; zero marks an unassigned byte.
const WINANSI_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0, 0x017D, 0, // 0x88
    0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178, // 0x98
];

/// Map a Unicode code point to its WinAnsi byte.
pub fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }
    WINANSI_HIGH
        .iter()
        .position(|&cp| cp != 0 && cp == codepoint)
        .map(|i| 0x80 + i as u8)
}

/// Map a WinAnsi byte back to its character.
pub fn winansi_to_char(code: u8) -> Option<char> {
    match code {
        0x80..=0x9F => match WINANSI_HIGH[(code - 0x80) as usize] {
            0 => None,
            cp => char::from_u32(cp),
        },
        _ => Some(code as char),
    }
}

/// Encode text as WinAnsi bytes; unencodable characters become `?`.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| unicode_to_winansi(ch as u32).unwrap_or(b'?'))
        .collect()
}
