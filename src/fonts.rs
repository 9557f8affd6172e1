//! Font metrics and line wrapping using `ttf-parser`.
//!
//! Output text is set in the builtin Helvetica faces, so by default widths
//! come from a Helvetica-like average advance. Loading a real TTF makes the
//! wrapping simulation use its glyph advances instead; a Helvetica-metric
//! face such as Liberation Sans or Nimbus Sans matches the output exactly.

use std::fs;
use std::path::Path;

use crate::error::{ReportError, Result};
use crate::model::LINE_BREAK;

/// Metrics for one loaded face.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
}

impl FontData {
    fn synthetic() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
        }
    }

    fn is_loaded(&self) -> bool {
        !self.bytes.is_empty()
    }
}

/// Regular and bold faces used for measurement.
pub struct FontManager {
    regular: FontData,
    bold: FontData,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            regular: FontData::synthetic(),
            bold: FontData::synthetic(),
        }
    }

    /// Manager with the given font files loaded. `None` keeps the heuristic
    /// for that weight.
    pub fn with_files(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self> {
        let mut fonts = Self::new();
        if let Some(path) = regular {
            fonts.load_font_file(false, path)?;
        }
        if let Some(path) = bold {
            fonts.load_font_file(true, path)?;
        }
        Ok(fonts)
    }

    /// Load a TTF/OTF face for measuring regular (`bold == false`) or bold text.
    pub fn load_font(&mut self, bold: bool, bytes: Vec<u8>) -> Result<()> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| ReportError::Font(format!("failed to parse font: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            bytes,
        };
        if bold {
            self.bold = data;
        } else {
            self.regular = data;
        }
        Ok(())
    }

    pub fn load_font_file(&mut self, bold: bool, path: &Path) -> Result<()> {
        let bytes = fs::read(path)?;
        self.load_font(bold, bytes)?;
        log::info!(
            "Measuring {} text with '{}'",
            if bold { "bold" } else { "regular" },
            path.display()
        );
        Ok(())
    }

    /// Face for `bold`; bold text falls back to a loaded regular face.
    fn face_data(&self, bold: bool) -> Option<&FontData> {
        if bold && self.bold.is_loaded() {
            return Some(&self.bold);
        }
        Some(&self.regular).filter(|d| d.is_loaded())
    }

    /// Width of `text` at `font_size`, in points.
    ///
    /// Without real font bytes an average advance of 0.5 × font size is
    /// used (bold is ~10 % wider).
    pub fn measure_text_width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        let heuristic = || {
            let avg = if bold { 0.55 } else { 0.5 };
            text.chars().count() as f32 * font_size * avg
        };

        let Some(data) = self.face_data(bold) else {
            return heuristic();
        };

        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => font_size * 0.5,
                    })
                    .sum()
            }
            Err(_) => heuristic(),
        }
    }

    /// Check if real font bytes are loaded for regular text.
    pub fn has_real_fonts(&self) -> bool {
        self.regular.is_loaded()
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on explicit breaks: the `<br/>` marker and newlines.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAK).flat_map(|part| part.split('\n'))
}

/// Word-wrap text to fit within `max_width` points. Returns the lines.
///
/// Explicit breaks always start a new line, so `"a<br/>b"` yields two lines
/// even when both fit side by side. Empty text yields a single empty line.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    bold: bool,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in split_paragraphs(text) {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }
        if max_width <= 0.0 {
            lines.push(words.join(" "));
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = fonts.measure_text_width(&candidate, font_size, bold);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
