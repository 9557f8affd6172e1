//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Only the static drawing is rendered here. Form fields are added to the
//! resulting document afterwards by [`crate::forms`].

use printpdf::*;

use crate::error::ReportError;
use crate::layout_config::*;

/// Baseline offset below the top of a line, as a fraction of the font size.
const ASCENDER_FACTOR: f32 = 0.75;

/// Render a DocumentLayout into PDF bytes.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ReportError> {
    if layout.page_width_pt <= 0.0 || layout.page_height_pt <= 0.0 {
        return Err(ReportError::Render(format!(
            "invalid page size {}x{}",
            layout.page_width_pt, layout.page_height_pt
        )));
    }
    let page_w = Mm(layout.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(layout.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&layout.title);
    let mut pages = Vec::with_capacity(layout.pages.len());

    for page_layout in &layout.pages {
        let mut ops = Vec::new();
        for shape in &page_layout.shapes {
            render_shape(&mut ops, shape, layout.page_height_pt);
        }
        for text in &page_layout.texts {
            render_text(&mut ops, text, layout.page_height_pt);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    log::debug!(
        "Rendered {} pages into {} bytes",
        layout.pages.len().max(1),
        bytes.len()
    );

    Ok(bytes)
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0xFF range; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn rgb(color: [f32; 3]) -> Color {
    Color::Rgb(Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn dash_pattern(dash: [f32; 2]) -> LineDashPattern {
    let length = |v: f32| Some((v.round() as i64).max(1));
    LineDashPattern {
        dash_1: length(dash[0]),
        gap_1: length(dash[1]),
        ..LineDashPattern::default()
    }
}

/// Stroke `points` with colour, width and dash pattern of `stroke`. A dash
/// pattern is reset to solid afterwards.
fn stroke_line(ops: &mut Vec<Op>, stroke: &Stroke, points: Vec<LinePoint>, is_closed: bool) {
    ops.push(Op::SetOutlineColor {
        col: rgb(stroke.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(stroke.width),
    });
    if let Some(dash) = stroke.dash {
        ops.push(Op::SetLineDashPattern {
            dash: dash_pattern(dash),
        });
    }
    ops.push(Op::DrawLine {
        line: Line { points, is_closed },
    });
    if stroke.dash.is_some() {
        ops.push(Op::SetLineDashPattern {
            dash: LineDashPattern::default(),
        });
    }
}

fn render_shape(ops: &mut Vec<Op>, shape: &Shape, page_height: f32) {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            stroke,
            fill,
        } => {
            // PDF coordinate system: origin at bottom-left.
            let x1 = *x;
            let x2 = x + width;
            let y2 = page_height - y;
            let y1 = y2 - height;

            if let Some(fill) = fill {
                ops.push(Op::SetFillColor { col: rgb(*fill) });
                ops.push(Op::DrawPolygon {
                    polygon: Polygon {
                        rings: vec![PolygonRing {
                            points: vec![
                                point(x1, y1),
                                point(x2, y1),
                                point(x2, y2),
                                point(x1, y2),
                            ],
                        }],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    },
                });
            }

            if let Some(stroke) = stroke {
                let corners = vec![point(x1, y2), point(x2, y2), point(x2, y1), point(x1, y1)];
                stroke_line(ops, stroke, corners, true);
            }
        }
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
        } => {
            let ends = vec![point(*x1, page_height - y1), point(*x2, page_height - y2)];
            stroke_line(ops, stroke, ends, false);
        }
    }
}

fn render_text(ops: &mut Vec<Op>, text: &TextBlock, page_height: f32) {
    let font = if text.bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    };
    let pdf_top = page_height - text.y;

    for tline in &text.lines {
        if tline.text.is_empty() {
            continue;
        }
        let text_x = text.x + tline.x_offset;
        let text_y = pdf_top - tline.y_offset - text.font_size * ASCENDER_FACTOR;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(text_x),
                y: Pt(text_y),
            },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(text.font_size),
            font,
        });
        ops.push(Op::SetFillColor {
            col: rgb(text.color),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_winlatin(&tline.text))],
            font,
        });
        ops.push(Op::EndTextSection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_empty_page() {
        let layout = DocumentLayout::a4();
        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn dashed_line_sets_and_resets_pattern() {
        let stroke = Stroke {
            width: 2.0,
            color: [0.0, 0.0, 0.0],
            dash: Some([1.0, 1.0]),
        };
        let dashed = Shape::Line {
            x1: 0.0,
            y1: 10.0,
            x2: 100.0,
            y2: 10.0,
            stroke,
        };
        let mut ops = Vec::new();
        render_shape(&mut ops, &dashed, 800.0);
        let patterns: Vec<&LineDashPattern> = ops
            .iter()
            .filter_map(|op| match op {
                Op::SetLineDashPattern { dash } => Some(dash),
                _ => None,
            })
            .collect();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].dash_1, Some(1));
        assert_eq!(patterns[0].gap_1, Some(1));
        assert_eq!(patterns[1].dash_1, None);
        assert_eq!(
            ops.iter().filter(|op| matches!(op, Op::DrawLine { .. })).count(),
            1
        );
        assert!(matches!(ops.last(), Some(Op::SetLineDashPattern { .. })));

        let solid = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            stroke: Some(Stroke { dash: None, ..stroke }),
            fill: None,
        };
        let mut ops = Vec::new();
        render_shape(&mut ops, &solid, 800.0);
        assert!(!ops.iter().any(|op| matches!(op, Op::SetLineDashPattern { .. })));
    }

    #[test]
    fn winlatin_maps_umlauts_to_single_bytes() {
        let s = to_winlatin("Empfänger");
        assert_eq!(s.len(), "Empfänger".chars().count());
    }

    #[test]
    fn invalid_page_size_is_an_error() {
        let mut layout = DocumentLayout::a4();
        layout.page_height_pt = 0.0;
        assert!(matches!(render_pdf(&layout), Err(ReportError::Render(_))));
    }
}
