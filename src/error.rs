//! Error type shared by every stage of report generation.
//!
//! Validation problems in the caller's input, layout mistakes, and failures
//! of the PDF collaborators all end up here. [`ReportError::is_fatal`] tells
//! the handled conditions (an empty row set) apart from real failures.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug)]
pub enum ReportError {
    /// A header field or row input has the wrong shape.
    Validation { field: String, message: String },
    /// JSON input could not be parsed.
    Json(serde_json::Error),
    /// No rows to render. Reported, but not treated as a failure of the
    /// generator itself.
    EmptyInput,
    /// A frame was declared with `end <= start` on one of its axes.
    InvalidFrame {
        start_x: f32,
        end_x: f32,
        start_y: f32,
        end_y: f32,
    },
    /// A relative region used a percentage outside `[0, 100]`.
    InvalidRegion { start: f32, end: f32 },
    /// The table body is too small to hold even one row.
    NoRowCapacity { body_height: f32, row_height: f32 },
    /// The scratch file written by the drawing pass is gone before the
    /// form-field fixup pass could read it.
    MissingScratchFile(PathBuf),
    /// A measurement font could not be parsed.
    Font(String),
    /// `printpdf` rendering failed.
    Render(String),
    /// Reading or rewriting the PDF object graph failed.
    Pdf(lopdf::Error),
    Io(std::io::Error),
}

impl ReportError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// `false` only for conditions that are reported but expected, such as an
    /// empty row set.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReportError::EmptyInput)
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Validation { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
            ReportError::Json(e) => write!(f, "Failed to parse JSON input: {}", e),
            ReportError::EmptyInput => {
                write!(f, "Wagon values must have at least one element")
            }
            ReportError::InvalidFrame {
                start_x,
                end_x,
                start_y,
                end_y,
            } => write!(
                f,
                "Frame must satisfy end > start on both axes, got x {}..{} y {}..{}",
                start_x, end_x, start_y, end_y
            ),
            ReportError::InvalidRegion { start, end } => write!(
                f,
                "Region percentages must lie in [0, 100], got {}..{}",
                start, end
            ),
            ReportError::NoRowCapacity {
                body_height,
                row_height,
            } => write!(
                f,
                "Table body of height {:.1} cannot hold rows of height {:.1}",
                body_height, row_height
            ),
            ReportError::MissingScratchFile(path) => write!(
                f,
                "Intermediate file '{}' not found before form-field fixup",
                path.display()
            ),
            ReportError::Font(msg) => write!(f, "Font error: {}", msg),
            ReportError::Render(msg) => write!(f, "Render error: {}", msg),
            ReportError::Pdf(e) => write!(f, "PDF error: {}", e),
            ReportError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Json(e) => Some(e),
            ReportError::Pdf(e) => Some(e),
            ReportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Json(e)
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(e: lopdf::Error) -> Self {
        ReportError::Pdf(e)
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Io(e)
    }
}
