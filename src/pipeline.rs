//! Pipeline – ties together validation, measurement, pagination, rendering
//! and the two form-field passes into a single function call.

use std::io::Write;
use std::path::{Path, PathBuf};

use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::composer::{self, HeaderPlan, LayoutContext};
use crate::error::{ReportError, Result};
use crate::fonts::FontManager;
use crate::forms::{attach_form_fields, fix_field_display_flags};
use crate::layout_config::DocumentLayout;
use crate::model::{HeaderFieldSet, RowInput};
use crate::pagination::paginate;
use crate::render::render_pdf;
use crate::template::{Labels, Margins, TemplateVariant};

/// Configuration for report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Document title embedded in the PDF metadata (default: "Wagenliste").
    pub title: String,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    pub margins: Margins,
    pub variant: TemplateVariant,
    /// Draw the header band on every page instead of only the first.
    pub repeat_header: bool,
    pub labels: Labels,
    /// TTF/OTF face whose advances are used to wrap regular text.
    pub regular_font: Option<PathBuf>,
    /// Face for bold text; falls back to `regular_font`.
    pub bold_font: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Wagenliste".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            margins: Margins::default(),
            variant: TemplateVariant::Standard,
            repeat_header: false,
            labels: Labels::default(),
            regular_font: None,
            bold_font: None,
        }
    }
}

impl ReportConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_variant(mut self, variant: TemplateVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_repeated_header(mut self, repeat: bool) -> Self {
        self.repeat_header = repeat;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_regular_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.regular_font = Some(path.into());
        self
    }

    pub fn with_bold_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.bold_font = Some(path.into());
        self
    }

    /// Measurement fonts named by this configuration.
    pub fn font_manager(&self) -> Result<FontManager> {
        FontManager::with_files(self.regular_font.as_deref(), self.bold_font.as_deref())
    }

    /// Width of the bordered page frame inside the margins.
    pub fn frame_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Height of the bordered page frame inside the margins.
    pub fn frame_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }
}

/// What [`generate_report`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    /// Final output path, after suffix correction.
    pub path: PathBuf,
    pub pages: usize,
    pub rows: usize,
    pub fields: usize,
}

/// Force a `.pdf` extension, logging when the name had to change.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".pdf");
    let corrected = PathBuf::from(name);
    log::warn!(
        "Output file '{}' has no .pdf suffix, writing '{}' instead",
        path.display(),
        corrected.display()
    );
    corrected
}

/// Rows per page for this header and configuration.
pub fn rows_per_page(header: &HeaderFieldSet, config: &ReportConfig) -> Result<usize> {
    let resolved = header.resolve()?;
    let plan = HeaderPlan::measure(config, &resolved, &config.font_manager()?);
    composer::rows_per_page(config, &plan)
}

/// Generate only the layout (no PDF rendering) – useful for testing.
pub fn compute_layout(
    rows: impl Into<RowInput>,
    header: &HeaderFieldSet,
    config: &ReportConfig,
) -> Result<DocumentLayout> {
    let rows = rows.into();
    if rows.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    compute_layout_with_fonts(rows, header, config, &config.font_manager()?)
}

/// [`compute_layout`] with measurement fonts supplied by the caller, e.g.
/// faces loaded from memory with [`FontManager::load_font`].
pub fn compute_layout_with_fonts(
    rows: impl Into<RowInput>,
    header: &HeaderFieldSet,
    config: &ReportConfig,
    fonts: &FontManager,
) -> Result<DocumentLayout> {
    let rows = rows.into();
    if rows.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    let resolved = header.resolve()?;
    let plan = HeaderPlan::measure(config, &resolved, fonts);
    log::debug!(
        "Header band {:.1}pt, {} rows per page",
        plan.band_height(),
        composer::rows_per_page(config, &plan)?
    );

    let records = rows.into_records();
    let mut canvas = Canvas::new(&config.title, config.page_width, config.page_height);
    let mut ctx = LayoutContext {
        canvas: &mut canvas,
        fonts,
        config,
        header: &resolved,
        plan: &plan,
    };
    paginate(&mut ctx, &records, config.repeat_header)?;
    Ok(canvas.finish())
}

/// Full pipeline in memory: rows and header → PDF bytes with form fields.
///
/// Returns `(pdf_bytes, layout)`.
pub fn generate_pdf(
    rows: impl Into<RowInput>,
    header: &HeaderFieldSet,
    config: &ReportConfig,
) -> Result<(Vec<u8>, DocumentLayout)> {
    let layout = compute_layout(rows, header, config)?;
    let mut doc = Document::load_mem(&render_pdf(&layout)?)?;
    attach_form_fields(&mut doc, &layout)?;
    fix_field_display_flags(&mut doc)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok((bytes, layout))
}

/// Write the report to `path`.
///
/// The drawing pass and the field pass are written to a scratch file beside
/// the destination, which is re-read for the display-flag fixup. The final
/// document goes to a second temporary file that is renamed over `path`,
/// so the destination is either the complete report or untouched. Both
/// temporary files are removed on every path out of this function. Empty
/// input yields [`ReportError::EmptyInput`] and no file.
pub fn generate_report(
    path: impl AsRef<Path>,
    rows: impl Into<RowInput>,
    header: &HeaderFieldSet,
    config: &ReportConfig,
) -> Result<GeneratedReport> {
    let path = normalize_output_path(path.as_ref());
    let rows = rows.into();
    let row_count = rows.len();

    // 1. Layout
    let layout = compute_layout(rows, header, config)?;

    // 2. Draw and attach fields
    let mut doc = Document::load_mem(&render_pdf(&layout)?)?;
    let fields = attach_form_fields(&mut doc, &layout)?;

    // 3. Scratch file beside the destination
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut scratch = temp_pdf(&dir)?;
    doc.save_to(&mut scratch)?;
    scratch.flush()?;
    if !scratch.path().exists() {
        return Err(ReportError::MissingScratchFile(scratch.path().to_path_buf()));
    }

    // 4. Display-flag fixup on the re-read document
    let mut doc = Document::load(scratch.path())?;
    fix_field_display_flags(&mut doc)?;

    // 5. Destination, replaced in one rename
    let mut output = temp_pdf(&dir)?;
    doc.save_to(&mut output)?;
    output.flush()?;
    output.as_file().sync_all()?;
    output.persist(&path).map_err(|e| e.error)?;
    drop(scratch);

    log::info!(
        "Wrote '{}': {} pages, {} wagons",
        path.display(),
        layout.pages.len(),
        row_count
    );
    Ok(GeneratedReport {
        path,
        pages: layout.pages.len(),
        rows: row_count,
        fields,
    })
}

fn temp_pdf(dir: &Path) -> Result<tempfile::NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix(".wagenliste-")
        .suffix(".pdf")
        .tempfile_in(dir)?)
}

/// [`generate_report`] with a logged success flag instead of a `Result`.
pub fn create_report(
    path: impl AsRef<Path>,
    rows: impl Into<RowInput>,
    header: &HeaderFieldSet,
    config: &ReportConfig,
) -> bool {
    match generate_report(path, rows, header, config) {
        Ok(_) => true,
        Err(e) if !e.is_fatal() => {
            log::warn!("{e}");
            false
        }
        Err(e) => {
            log::error!("Report generation failed: {e}");
            false
        }
    }
}
