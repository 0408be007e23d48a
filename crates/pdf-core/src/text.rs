//! Text rendering utilities

use crate::document::Color;
use crate::font::StandardFont;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Format a number for a content stream (at most 3 decimals, no "-0")
pub(crate) fn pdf_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in points
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render text
/// at a specific position with alignment support.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Baseline Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to `x`
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = String::new();

    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let final_x = x + x_offset;

    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        pdf_number(ctx.color.r as f64),
        pdf_number(ctx.color.g as f64),
        pdf_number(ctx.color.b as f64)
    ));
    ops.push_str(&format!(
        "/{} {} Tf\n",
        ctx.font_name,
        pdf_number(ctx.font_size as f64)
    ));
    ops.push_str(&format!("{} {} Td\n", pdf_number(final_x), pdf_number(y)));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Split text into lines that fit `max_width` points
///
/// Breaks on whitespace only. A word wider than the line is kept whole on
/// its own line. Empty input yields a single empty line.
pub fn wrap_text(text: &str, font: StandardFont, font_size: f32, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
            continue;
        }

        let candidate = format!("{current_line} {word}");
        if font.text_width_points(&candidate, font_size) as f64 <= max_width {
            current_line = candidate;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_offset_left() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Left), 0.0);
    }

    #[test]
    fn test_x_offset_center() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Center), 200.0);
    }

    #[test]
    fn test_x_offset_right() {
        assert_eq!(calculate_x_offset(100.0, 500.0, Align::Right), 400.0);
    }

    #[test]
    fn test_pdf_number() {
        assert_eq!(pdf_number(150.0), "150");
        assert_eq!(pdf_number(0.1), "0.1");
        assert_eq!(pdf_number(1.0 / 3.0), "0.333");
        assert_eq!(pdf_number(-0.0001), "0");
    }

    #[test]
    fn test_generate_text_operators_left() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<48656C6C6F>", 100.0, 700.0, Align::Left, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("BT"));
        assert!(ops_str.contains("0 0 0 rg"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("<48656C6C6F> Tj"));
        assert!(ops_str.contains("ET"));
    }

    #[test]
    fn test_generate_text_operators_center() {
        let ctx = TextRenderContext {
            font_name: "F2".to_string(),
            font_size: 14.0,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<54657374>", 200.0, 600.0, Align::Center, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("/F2 14 Tf"));
        assert!(ops_str.contains("150 600 Td"));
    }

    #[test]
    fn test_generate_text_operators_right() {
        let ctx = TextRenderContext {
            font_name: "F3".to_string(),
            font_size: 16.0,
            text_width: 80.0,
            color: Color::red(),
        };

        let ops = generate_text_operators("<5269676874>", 300.0, 500.0, Align::Right, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("220 500 Td"));
        assert!(ops_str.contains("1 0 0 rg"));
    }

    #[test]
    fn test_wrap_text_fits_on_one_line() {
        let lines = wrap_text("Place of Dispatch", StandardFont::Helvetica, 8.0, 500.0);
        assert_eq!(lines, vec!["Place of Dispatch".to_string()]);
    }

    #[test]
    fn test_wrap_text_breaks_on_width() {
        // "Hello" is 22.78pt at 10pt; "Hello world" is 49.45pt
        let lines = wrap_text("Hello world", StandardFont::Helvetica, 10.0, 30.0);
        assert_eq!(lines, vec!["Hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_wrap_text_long_word_kept_whole() {
        let lines = wrap_text("29AAACT1507C1ZT", StandardFont::HelveticaBold, 8.0, 10.0);
        assert_eq!(lines, vec!["29AAACT1507C1ZT".to_string()]);
    }

    #[test]
    fn test_wrap_text_collapses_whitespace() {
        let lines = wrap_text("Vehicle / Trans\nDoc", StandardFont::Helvetica, 8.0, 500.0);
        assert_eq!(lines, vec!["Vehicle / Trans Doc".to_string()]);
    }

    #[test]
    fn test_wrap_text_empty() {
        let lines = wrap_text("", StandardFont::Helvetica, 8.0, 100.0);
        assert_eq!(lines, vec![String::new()]);

        let lines = wrap_text("   ", StandardFont::Helvetica, 8.0, 100.0);
        assert_eq!(lines, vec![String::new()]);
    }
}
