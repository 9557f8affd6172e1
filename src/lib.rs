//! # wagenliste – paginated wagon-list PDFs with fillable fields
//!
//! This crate turns a header field set and a list of wagon records into a
//! multi-page "Wagenliste zum Frachtbrief" form. The pipeline stages are:
//!
//! 1. **Validate** – header shapes and row records ([`model`])
//! 2. **Measure** – size header blocks from their wrapped text ([`text`],
//!    [`composer::HeaderPlan`])
//! 3. **Compose** – nested frames and matrix regions per page ([`frame`],
//!    [`matrix`], [`composer`]) drawn onto a recording [`canvas`]
//! 4. **Paginate** – rows per page, header repetition, summary ([`pagination`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//! 6. **Fields** – text widgets, AcroForm and display flags via lopdf
//!    ([`forms`])
//!
//! [`pipeline::generate_report`] runs all stages and writes the file.

pub mod canvas;
pub mod composer;
pub mod error;
pub mod fonts;
pub mod forms;
pub mod frame;
pub mod layout_config;
pub mod matrix;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod template;
pub mod text;

// Re-exports for convenience
pub use error::{ReportError, Result};
pub use model::{Column, FieldValue, HeaderField, HeaderFieldSet, RowInput, RowRecord};
pub use pipeline::{
    compute_layout, compute_layout_with_fonts, create_report, generate_pdf, generate_report,
    GeneratedReport, ReportConfig,
};
pub use template::{Labels, Margins, TemplateVariant};
