//! Coordinate frames – absolute page rectangles that can spawn children
//! declared in their own local space.
//!
//! A frame stores its rectangle in page-absolute points, top-down. A child
//! created with [`Frame::add_frame`] receives offsets relative to the
//! parent's top-left corner; adding the parent's absolute origin is all the
//! translation needed, however deep the nesting goes.

use crate::canvas::Canvas;
use crate::error::{ReportError, Result};
use crate::layout_config::Stroke;

pub const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
pub const DARK_GREEN: [f32; 3] = [4.0 / 255.0, 145.0 / 255.0, 103.0 / 255.0];

/// How a frame draws itself when created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub stroke_color: [f32; 3],
    pub stroke_width: f32,
    pub fill: Option<[f32; 3]>,
}

impl FrameStyle {
    pub const SOLID_BLACK: FrameStyle = FrameStyle {
        stroke_color: BLACK,
        stroke_width: 1.0,
        fill: None,
    };

    pub const SOLID_GREEN: FrameStyle = FrameStyle {
        stroke_color: DARK_GREEN,
        stroke_width: 1.0,
        fill: None,
    };

    /// Layout-only frame: draws nothing.
    pub const TRANSPARENT: FrameStyle = FrameStyle {
        stroke_color: [1.0, 1.0, 1.0],
        stroke_width: 0.0,
        fill: None,
    };

    /// Whether creating a frame with this style produces a drawing.
    pub fn draws(&self) -> bool {
        self.fill.is_some() || self.stroke_width > 0.0
    }

    pub fn stroke(&self) -> Option<Stroke> {
        (self.stroke_width > 0.0).then_some(Stroke {
            width: self.stroke_width,
            color: self.stroke_color,
            dash: None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    start_x: f32,
    end_x: f32,
    start_y: f32,
    end_y: f32,
}

impl Frame {
    /// Create a frame at absolute coordinates and draw it if the style asks
    /// for a border or fill.
    pub fn new(
        canvas: &mut Canvas,
        start_x: f32,
        end_x: f32,
        start_y: f32,
        end_y: f32,
        style: &FrameStyle,
    ) -> Result<Self> {
        if !(end_x > start_x && end_y > start_y) {
            return Err(ReportError::InvalidFrame {
                start_x,
                end_x,
                start_y,
                end_y,
            });
        }
        let frame = Self {
            start_x,
            end_x,
            start_y,
            end_y,
        };
        if style.draws() {
            canvas.draw_rect(
                start_x,
                start_y,
                frame.width(),
                frame.height(),
                style.stroke(),
                style.fill,
            );
        }
        Ok(frame)
    }

    /// Create a child from offsets in this frame's local space.
    pub fn add_frame(
        &self,
        canvas: &mut Canvas,
        relative_start_x: f32,
        relative_end_x: f32,
        relative_start_y: f32,
        relative_end_y: f32,
        style: &FrameStyle,
    ) -> Result<Frame> {
        Frame::new(
            canvas,
            self.start_x + relative_start_x,
            self.start_x + relative_end_x,
            self.start_y + relative_start_y,
            self.start_y + relative_end_y,
            style,
        )
    }

    pub fn start_x(&self) -> f32 {
        self.start_x
    }

    pub fn end_x(&self) -> f32 {
        self.end_x
    }

    pub fn start_y(&self) -> f32 {
        self.start_y
    }

    pub fn end_y(&self) -> f32 {
        self.end_y
    }

    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> f32 {
        self.end_y - self.start_y
    }

    /// Lower edge in bottom-up PDF coordinates.
    pub fn pdf_bottom(&self, page_height: f32) -> f32 {
        page_height - self.end_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::Shape;

    fn canvas() -> Canvas {
        Canvas::new("frames", 595.28, 841.89)
    }

    #[test]
    fn nested_offsets_accumulate() {
        let mut c = canvas();
        let root = Frame::new(&mut c, 20.0, 575.0, 50.0, 790.0, &FrameStyle::TRANSPARENT).unwrap();
        let child = root.add_frame(&mut c, 10.0, 110.0, 5.0, 55.0, &FrameStyle::TRANSPARENT).unwrap();
        let grandchild = child.add_frame(&mut c, 1.0, 2.0, 3.0, 4.0, &FrameStyle::TRANSPARENT).unwrap();
        assert_eq!(child.start_x(), 30.0);
        assert_eq!(child.start_y(), 55.0);
        assert_eq!(grandchild.start_x(), 31.0);
        assert_eq!(grandchild.end_y(), 59.0);
        assert_eq!(grandchild.pdf_bottom(841.89), 841.89 - 59.0);
    }

    #[test]
    fn stroked_frames_draw_themselves() {
        let mut c = canvas();
        Frame::new(&mut c, 0.0, 10.0, 0.0, 10.0, &FrameStyle::SOLID_BLACK).unwrap();
        Frame::new(&mut c, 0.0, 10.0, 0.0, 10.0, &FrameStyle::TRANSPARENT).unwrap();
        let filled = FrameStyle {
            fill: Some(BLACK),
            ..FrameStyle::TRANSPARENT
        };
        Frame::new(&mut c, 0.0, 10.0, 0.0, 10.0, &filled).unwrap();
        let layout = c.finish();
        let rects = &layout.pages[0].shapes;
        assert_eq!(rects.len(), 2);
        assert!(matches!(rects[1], Shape::Rect { stroke: None, fill: Some(_), .. }));
    }

    #[test]
    fn inverted_ranges_fail_fast() {
        let mut c = canvas();
        let err = Frame::new(&mut c, 10.0, 0.0, 0.0, 10.0, &FrameStyle::SOLID_BLACK).unwrap_err();
        assert!(matches!(err, ReportError::InvalidFrame { .. }));
        let root = Frame::new(&mut c, 0.0, 10.0, 0.0, 10.0, &FrameStyle::TRANSPARENT).unwrap();
        assert!(root.add_frame(&mut c, 0.0, 5.0, 3.0, 3.0, &FrameStyle::TRANSPARENT).is_err());
    }
}
