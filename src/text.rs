//! Paragraph styles and the measurement pre-pass used to size header blocks
//! before their frames are drawn.

use crate::fonts::{wrap_text, FontManager};
use crate::layout_config::Alignment;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Smallest height a measured value block may have.
pub const MIN_BLOCK_HEIGHT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    /// Distance between baselines.
    pub leading: f32,
    pub bold: bool,
    pub align: Alignment,
    pub color: [f32; 3],
}

impl ParagraphStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            leading: font_size * LINE_HEIGHT_FACTOR,
            bold: false,
            align: Alignment::Left,
            color: [0.0, 0.0, 0.0],
        }
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    /// Small captions above values and in the table.
    pub fn description() -> Self {
        Self::new(8.0)
    }

    /// Header values.
    pub fn value() -> Self {
        Self::new(11.0)
    }

    pub fn title() -> Self {
        Self::new(14.0).with_leading(14.0).aligned(Alignment::Center).bold()
    }
}

/// Number of lines `text` occupies when wrapped to `width`.
pub fn lines_necessary(text: &str, style: &ParagraphStyle, width: f32, fonts: &FontManager) -> usize {
    wrap_text(text, style.font_size, style.bold, width, fonts).len()
}

/// Height needed for `line_count` lines, never below [`MIN_BLOCK_HEIGHT`].
pub fn height_for_lines(line_count: usize, style: &ParagraphStyle) -> f32 {
    let measured = LINE_HEIGHT_FACTOR * style.font_size * line_count as f32;
    measured.max(MIN_BLOCK_HEIGHT)
}

/// Minimum block height for `text` at `width`.
pub fn block_height(text: &str, style: &ParagraphStyle, width: f32, fonts: &FontManager) -> f32 {
    height_for_lines(lines_necessary(text, style, width, fonts), style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_get_minimum_height() {
        let fonts = FontManager::default();
        let h = block_height("AT", &ParagraphStyle::value(), 150.0, &fonts);
        assert_eq!(h, MIN_BLOCK_HEIGHT);
    }

    #[test]
    fn line_breaks_count_as_lines() {
        let fonts = FontManager::default();
        let style = ParagraphStyle::value();
        assert_eq!(lines_necessary("a<br/>b<br/>c", &style, 500.0, &fonts), 3);
        let h = block_height("a<br/>b<br/>c", &style, 500.0, &fonts);
        assert!((h - 3.0 * 1.2 * 11.0).abs() < 1e-3, "got {h}");
    }

    #[test]
    fn block_height_is_monotone_in_line_count() {
        let fonts = FontManager::default();
        let style = ParagraphStyle::value();
        let mut text = String::from("line");
        let mut previous = 0.0;
        for _ in 0..8 {
            let h = block_height(&text, &style, 500.0, &fonts);
            assert!(h >= previous, "{h} < {previous}");
            previous = h;
            text.push_str("<br/>line");
        }
    }

    #[test]
    fn narrow_width_wraps_into_more_lines() {
        let fonts = FontManager::default();
        let style = ParagraphStyle::description();
        let text = "Salzburg Hauptbahnhof Verschiebebahnhof";
        let wide = lines_necessary(text, &style, 400.0, &fonts);
        let narrow = lines_necessary(text, &style, 60.0, &fonts);
        assert_eq!(wide, 1);
        assert!(narrow > wide);
    }
}
