//! Layout config – the frozen description of every page, produced by the
//! composer and consumed by the PDF renderer and the form-field pass.
//!
//! All coordinates are page-absolute points with the origin at the top-left
//! corner; renderers flip the y axis.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Column;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// Everything drawn on one page, in draw order per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextBlock>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f32,
    pub color: [f32; 3],
    /// `[dash, gap]` lengths in points; `None` draws a solid line.
    pub dash: Option<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: Option<Stroke>,
        fill: Option<[f32; 3]>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Static printed text, already wrapped into lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<TextLine>,
    pub font_size: f32,
    pub bold: bool,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the block (for alignment).
    pub x_offset: f32,
    /// Y offset of the line top from the block top.
    pub y_offset: f32,
}

/// What a form field holds, so tests and tools can find cells without
/// parsing field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldRole {
    Header(String),
    Cell { row: usize, column: Column },
    Summary(Column),
    Footer(String),
}

/// An interactive text field placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Unique fully-qualified field name.
    pub name: String,
    pub role: FieldRole,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: String,
    pub font_size: f32,
    pub multiline: bool,
    pub align: Alignment,
}

impl DocumentLayout {
    /// Create an empty A4 layout.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Wagenliste".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of form fields across all pages.
    pub fn field_count(&self) -> usize {
        self.pages.iter().map(|p| p.fields.len()).sum()
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }

    /// Fields holding table cells of `column`, in row order.
    pub fn cells(&self, column: Column) -> impl Iterator<Item = &FormField> {
        self.fields
            .iter()
            .filter(move |f| matches!(f.role, FieldRole::Cell { column: c, .. } if c == column))
    }

    pub fn summary(&self, column: Column) -> Option<&FormField> {
        self.fields
            .iter()
            .find(|f| f.role == FieldRole::Summary(column))
    }

    pub fn has_header_field(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(&f.role, FieldRole::Header(k) if k == key))
    }

    /// Concatenated static text of the page, one line per entry.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.texts
            .iter()
            .flat_map(|t| t.lines.iter().map(|l| l.text.as_str()))
    }

    /// Dashed horizontal lines drawn on the page.
    pub fn dashed_lines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| {
            matches!(s, Shape::Line { stroke, .. } if stroke.dash.is_some())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_keeps_fields() {
        let mut layout = DocumentLayout::a4();
        let mut page = PageLayout::new(0);
        page.fields.push(FormField {
            name: "r1_Wagen".to_string(),
            role: FieldRole::Cell {
                row: 1,
                column: Column::Wagen,
            },
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 12.0,
            value: "3180".to_string(),
            font_size: 10.0,
            multiline: false,
            align: Alignment::Center,
        });
        layout.pages.push(page);

        let back = DocumentLayout::from_json(&layout.to_json().unwrap()).unwrap();
        assert_eq!(back.field_count(), 1);
        assert_eq!(back.pages[0].cells(Column::Wagen).count(), 1);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = DocumentLayout::from_json("{\"pages\": 3}").unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Json(_)));
    }
}
