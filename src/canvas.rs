//! Canvas – the drawing surface frames and the composer draw on.
//!
//! Nothing is rasterized here: every call is recorded into a
//! [`DocumentLayout`], page by page, in draw order. The PDF renderer and the
//! form-field pass turn that record into bytes afterwards.

use crate::fonts::{wrap_text, FontManager};
use crate::frame::Frame;
use crate::layout_config::*;
use crate::text::ParagraphStyle;

pub struct Canvas {
    layout: DocumentLayout,
    current: PageLayout,
}

impl Canvas {
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Self {
        Self {
            layout: DocumentLayout {
                title: title.to_string(),
                page_width_pt: page_width,
                page_height_pt: page_height,
                pages: Vec::new(),
            },
            current: PageLayout::new(0),
        }
    }

    /// Index of the page currently being drawn.
    pub fn page_index(&self) -> usize {
        self.current.page_index
    }

    pub fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: Option<Stroke>,
        fill: Option<[f32; 3]>,
    ) {
        self.current.shapes.push(Shape::Rect {
            x,
            y,
            width,
            height,
            stroke,
            fill,
        });
    }

    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.current.shapes.push(Shape::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke,
        });
    }

    /// Flow paragraphs top-down into `frame`.
    ///
    /// Each paragraph starts on a new line and is wrapped to the frame
    /// width. Lines that would extend below the frame are dropped. Returns
    /// the number of lines placed.
    pub fn draw_paragraphs(
        &mut self,
        frame: &Frame,
        paragraphs: &[&str],
        style: &ParagraphStyle,
        fonts: &FontManager,
    ) -> usize {
        let width = frame.width();
        let mut lines = Vec::new();
        let mut y_offset = 0.0f32;

        'flow: for paragraph in paragraphs {
            for line in wrap_text(paragraph, style.font_size, style.bold, width, fonts) {
                if y_offset + style.font_size > frame.height() + 0.01 {
                    log::debug!(
                        "Dropping overflowing text in {:.1}x{:.1} frame: {:?}",
                        width,
                        frame.height(),
                        line
                    );
                    break 'flow;
                }
                let line_width = fonts.measure_text_width(&line, style.font_size, style.bold);
                let x_offset = match style.align {
                    Alignment::Left => 0.0,
                    Alignment::Center => ((width - line_width) / 2.0).max(0.0),
                    Alignment::Right => (width - line_width).max(0.0),
                };
                lines.push(TextLine {
                    text: line,
                    x_offset,
                    y_offset,
                });
                y_offset += style.leading;
            }
        }

        let placed = lines.len();
        if placed > 0 {
            self.current.texts.push(TextBlock {
                x: frame.start_x(),
                y: frame.start_y(),
                width,
                height: frame.height(),
                lines,
                font_size: style.font_size,
                bold: style.bold,
                color: style.color,
            });
        }
        placed
    }

    /// Place a fillable text field covering `frame`.
    pub fn add_text_field(
        &mut self,
        frame: &Frame,
        name: String,
        role: FieldRole,
        value: &str,
        font_size: f32,
        multiline: bool,
    ) {
        self.current.fields.push(FormField {
            name,
            role,
            x: frame.start_x(),
            y: frame.start_y(),
            width: frame.width(),
            height: frame.height(),
            value: value.to_string(),
            font_size,
            multiline,
            align: Alignment::Center,
        });
    }

    /// End the current page and start a fresh one.
    pub fn show_page(&mut self) {
        let next = PageLayout::new(self.current.page_index + 1);
        let done = std::mem::replace(&mut self.current, next);
        self.layout.pages.push(done);
    }

    /// Stop recording. A page with pending content is ended first.
    pub fn finish(mut self) -> DocumentLayout {
        let pending = &self.current;
        if !pending.shapes.is_empty() || !pending.texts.is_empty() || !pending.fields.is_empty() {
            self.show_page();
        }
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameStyle;

    #[test]
    fn show_page_numbers_pages() {
        let mut canvas = Canvas::new("t", 595.28, 841.89);
        canvas.draw_rect(0.0, 0.0, 10.0, 10.0, None, Some([0.0, 0.0, 0.0]));
        canvas.show_page();
        canvas.draw_rect(0.0, 0.0, 10.0, 10.0, None, Some([0.0, 0.0, 0.0]));
        let layout = canvas.finish();
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.pages[1].page_index, 1);
    }

    #[test]
    fn finish_skips_empty_trailing_page() {
        let mut canvas = Canvas::new("t", 595.28, 841.89);
        canvas.draw_rect(0.0, 0.0, 10.0, 10.0, None, Some([0.0, 0.0, 0.0]));
        canvas.show_page();
        assert_eq!(canvas.finish().pages.len(), 1);
    }

    #[test]
    fn paragraphs_are_centered_and_clipped() {
        let fonts = FontManager::default();
        let mut canvas = Canvas::new("t", 595.28, 841.89);
        let frame = Frame::new(&mut canvas, 0.0, 100.0, 0.0, 20.0, &FrameStyle::TRANSPARENT).unwrap();
        let style = ParagraphStyle::description().aligned(Alignment::Center);
        let placed = canvas.draw_paragraphs(&frame, &["ab", "cd", "ef"], &style, &fonts);
        // 8pt text with 9.6pt leading: two lines fit in 20pt.
        assert_eq!(placed, 2);
        let layout = canvas.finish();
        let line = &layout.pages[0].texts[0].lines[0];
        assert!((line.x_offset - (100.0 - 8.0) / 2.0).abs() < 1e-3);
    }
}
