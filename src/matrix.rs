//! Matrix layout – split one frame into sibling frames from percentage
//! regions.

use crate::canvas::Canvas;
use crate::error::{ReportError, Result};
use crate::frame::{Frame, FrameStyle};

/// A rectangle in a parent's percentage space, `[0, 100]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: (f32, f32),
    pub y: (f32, f32),
}

impl Region {
    pub const FULL: Region = Region {
        x: (0.0, 100.0),
        y: (0.0, 100.0),
    };

    pub const fn new(x: (f32, f32), y: (f32, f32)) -> Self {
        Self { x, y }
    }

    /// Full height, `x` percent slice of the width.
    pub const fn columns(start: f32, end: f32) -> Self {
        Self::new((start, end), (0.0, 100.0))
    }

    /// Full width, `y` percent slice of the height.
    pub const fn rows(start: f32, end: f32) -> Self {
        Self::new((0.0, 100.0), (start, end))
    }

    fn check(&self) -> Result<()> {
        for (start, end) in [self.x, self.y] {
            let in_range = |v: f32| (0.0..=100.0).contains(&v);
            if !in_range(start) || !in_range(end) {
                return Err(ReportError::InvalidRegion { start, end });
            }
        }
        Ok(())
    }
}

/// Create one child of `parent` per region, in input order.
///
/// Regions may leave gaps or overlap; each call site owns its percentages.
pub fn create_matrix(
    canvas: &mut Canvas,
    parent: &Frame,
    regions: &[Region],
    style: &FrameStyle,
) -> Result<Vec<Frame>> {
    regions
        .iter()
        .map(|region| create_region(canvas, parent, *region, style))
        .collect()
}

/// Create a single child from one region.
pub fn create_region(
    canvas: &mut Canvas,
    parent: &Frame,
    region: Region,
    style: &FrameStyle,
) -> Result<Frame> {
    region.check()?;
    parent.add_frame(
        canvas,
        region.x.0 * parent.width() / 100.0,
        region.x.1 * parent.width() / 100.0,
        region.y.0 * parent.height() / 100.0,
        region.y.1 * parent.height() / 100.0,
        style,
    )
}

/// Horizontal positions of `n` equal divisions of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Divisions {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub center: Vec<f32>,
}

pub fn divide(frame: &Frame, n: usize) -> Divisions {
    let step = frame.width() / n.max(1) as f32;
    let left: Vec<f32> = (0..n).map(|i| frame.start_x() + i as f32 * step).collect();
    let right: Vec<f32> = (0..n).map(|i| frame.start_x() + (i + 1) as f32 * step).collect();
    let center = left.iter().zip(&right).map(|(l, r)| (l + r) / 2.0).collect();
    Divisions { left, right, center }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(canvas: &mut Canvas) -> Frame {
        Frame::new(canvas, 100.0, 300.0, 50.0, 150.0, &FrameStyle::TRANSPARENT).unwrap()
    }

    #[test]
    fn regions_scale_against_parent() {
        let mut c = Canvas::new("m", 595.28, 841.89);
        let p = parent(&mut c);
        let frames = create_matrix(
            &mut c,
            &p,
            &[Region::new((0.0, 50.0), (0.0, 24.0)), Region::rows(95.0, 100.0)],
            &FrameStyle::TRANSPARENT,
        )
        .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].start_x(), 100.0);
        assert_eq!(frames[0].end_x(), 200.0);
        assert_eq!(frames[0].end_y(), 74.0);
        assert_eq!(frames[1].start_y(), 145.0);
        assert_eq!(frames[1].width(), 200.0);
    }

    #[test]
    fn output_order_follows_input() {
        let mut c = Canvas::new("m", 595.28, 841.89);
        let p = parent(&mut c);
        let frames = create_matrix(
            &mut c,
            &p,
            &[Region::columns(50.0, 100.0), Region::columns(0.0, 50.0)],
            &FrameStyle::SOLID_BLACK,
        )
        .unwrap();
        assert!(frames[0].start_x() > frames[1].start_x());
        assert_eq!(c.finish().pages[0].shapes.len(), 2);
    }

    #[test]
    fn out_of_range_percentages_are_rejected() {
        let mut c = Canvas::new("m", 595.28, 841.89);
        let p = parent(&mut c);
        let err = create_region(&mut c, &p, Region::rows(90.0, 110.0), &FrameStyle::TRANSPARENT)
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidRegion { .. }));
    }

    #[test]
    fn divisions_are_equal() {
        let mut c = Canvas::new("m", 595.28, 841.89);
        let p = parent(&mut c);
        let d = divide(&p, 4);
        assert_eq!(d.left, vec![100.0, 150.0, 200.0, 250.0]);
        assert_eq!(d.center[0], 125.0);
        assert_eq!(d.right[3], 300.0);
    }
}
