//! Standard (non-embedded) PDF fonts
//!
//! The bill only needs Latin text, so the base-14 Helvetica faces are used
//! instead of embedding TrueType data. Widths come from the Adobe AFM files
//! and are needed for wrapping and alignment.

use lopdf::{Dictionary, Object};

/// First character covered by the width tables
const FIRST_CHAR: u32 = 32;

/// Helvetica advance widths for characters 32..=126 (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

/// Helvetica-Bold advance widths for characters 32..=126 (1/1000 em)
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :;<=>?@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [\]^_`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {|}~
];

/// Width used for Latin-1 characters outside the table
const DEFAULT_WIDTH: u16 = 556;

/// Base-14 font faces used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written as /BaseFont
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Ascender in 1/1000 em
    pub fn ascent(self) -> i16 {
        718
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of a single WinAnsi byte
    fn byte_width(self, byte: u8) -> u16 {
        let code = byte as u32;
        if (FIRST_CHAR..FIRST_CHAR + 95).contains(&code) {
            self.widths()[(code - FIRST_CHAR) as usize]
        } else {
            DEFAULT_WIDTH
        }
    }

    /// Text width in font units (1/1000 em)
    pub fn text_width(self, text: &str) -> u32 {
        encode_win_ansi(text)
            .into_iter()
            .map(|b| self.byte_width(b) as u32)
            .sum()
    }

    /// Text width in points at the given size
    pub fn text_width_points(self, text: &str, font_size: f32) -> f32 {
        self.text_width(text) as f32 * font_size / 1000.0
    }

    /// Encode text as a PDF hex string (e.g. "<48656C6C6F>")
    pub fn encode_text_hex(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2 + 2);
        out.push('<');
        for byte in encode_win_ansi(text) {
            out.push_str(&format!("{byte:02X}"));
        }
        out.push('>');
        out
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dictionary(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(self.base_font().as_bytes().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        dict
    }
}

/// Map text to WinAnsi bytes
///
/// Control characters become spaces; anything outside Latin-1 becomes '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0..=31 => b' ',
            code @ 32..=126 => code as u8,
            code @ 160..=255 => code as u8,
            _ => b'?',
        })
        .collect()
}
