//! Page composer – builds one page's frame tree and fills it.
//!
//! The composer works in sub-steps (header, table, rows, summary, footer).
//! Each step receives the [`LayoutContext`] and returns the frames it
//! created, so later steps get their anchors from return values instead of
//! from shared state.

use crate::canvas::Canvas;
use crate::error::{ReportError, Result};
use crate::fonts::FontManager;
use crate::frame::{Frame, FrameStyle, BLACK};
use crate::layout_config::{Alignment, FieldRole, Stroke};
use crate::matrix::{create_matrix, create_region, divide, Region};
use crate::model::{Column, HeaderField, ResolvedHeader, RowRecord, LINE_BREAK};
use crate::pipeline::ReportConfig;
use crate::template::*;
use crate::text::{block_height, lines_necessary, ParagraphStyle, LINE_HEIGHT_FACTOR};

/// Everything a composer step needs, borrowed for one page.
pub struct LayoutContext<'a> {
    pub canvas: &'a mut Canvas,
    pub fonts: &'a FontManager,
    pub config: &'a ReportConfig,
    pub header: &'a ResolvedHeader,
    pub plan: &'a HeaderPlan,
}

// ---------------------------------------------------------------------------
// Measurement pre-pass
// ---------------------------------------------------------------------------

/// Header block heights, measured once per report before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPlan {
    /// Heights of [`LEFT_BLOCKS`], top to bottom.
    pub left: Vec<f32>,
    /// Heights of [`CENTER_BLOCKS`], top to bottom.
    pub center: Vec<f32>,
    /// Height of the top section (left stack, center stack, Wagenliste block).
    pub top_height: f32,
    /// Height of the parties strip; zero for the standard variant.
    pub parties_height: f32,
    /// Party fields with values that this variant has no strip for.
    pub ignored: Vec<HeaderField>,
}

impl HeaderPlan {
    pub fn measure(config: &ReportConfig, header: &ResolvedHeader, fonts: &FontManager) -> Self {
        let width = config.frame_width();
        let column_width = |region: &Region| width * (region.x.1 - region.x.0) / 100.0;
        let value_style = ParagraphStyle::value();
        let small_style = ParagraphStyle::description();

        let measure_block = |field: HeaderField, column: f32, style: &ParagraphStyle| {
            let text = match field {
                HeaderField::Date => header.handover_date(),
                other => header.text(other).to_string(),
            };
            LABEL_HEIGHT + block_height(&text, style, column - 2.0 * BLOCK_INSET, fonts)
        };

        let left_width = column_width(&HEADER_COLUMNS[0]);
        let center_width = column_width(&HEADER_COLUMNS[1]);
        let mut left: Vec<f32> = LEFT_BLOCKS
            .iter()
            .map(|f| measure_block(*f, left_width, &value_style))
            .collect();
        let mut center: Vec<f32> = CENTER_BLOCKS
            .iter()
            .map(|f| measure_block(*f, center_width, &value_style))
            .collect();

        // Wagenliste block: title over a 2 × 2 grid of equally tall rows.
        let cell_width = column_width(&HEADER_COLUMNS[2]) / 2.0;
        let grid_row = WAGENLISTE_FIELDS
            .iter()
            .map(|(f, _)| measure_block(*f, cell_width, &small_style))
            .fold(0.0f32, f32::max);
        let wagenliste = TITLE_HEIGHT + 2.0 * grid_row;

        let mut ignored = Vec::new();
        let parties_height = if config.variant.has_parties() {
            let strip = config.frame_width();
            PARTY_BLOCKS
                .iter()
                .map(|(f, r)| measure_block(*f, strip * (r.x.1 - r.x.0) / 100.0, &small_style))
                .fold(0.0f32, f32::max)
        } else {
            ignored.extend(
                PARTY_BLOCKS
                    .iter()
                    .map(|(f, _)| *f)
                    .filter(|f| !header.text(*f).is_empty()),
            );
            if !ignored.is_empty() {
                log::warn!(
                    "Variant {:?} has no parties strip, ignoring values for {:?}",
                    config.variant,
                    ignored.iter().map(|f| f.key()).collect::<Vec<_>>()
                );
            }
            0.0
        };

        let natural: f32 = [left.iter().sum::<f32>(), center.iter().sum(), wagenliste]
            .into_iter()
            .fold(0.0f32, f32::max);
        let min_top = config.variant.min_header_height() - parties_height;
        let top_height = natural.max(min_top);
        if natural > min_top {
            log::warn!(
                "Header content needs {:.1}pt, growing header band beyond {:.1}pt",
                natural + parties_height,
                config.variant.min_header_height()
            );
        }

        // The last block of each stack absorbs the remaining height.
        let center_sum: f32 = center.iter().sum();
        if let Some(last) = center.last_mut() {
            *last += top_height - center_sum;
        }
        let left_sum: f32 = left.iter().sum();
        if let Some(last) = left.last_mut() {
            *last += top_height - left_sum;
        }

        Self {
            left,
            center,
            top_height,
            parties_height,
            ignored,
        }
    }

    /// Height of the whole header band.
    pub fn band_height(&self) -> f32 {
        self.top_height + self.parties_height
    }
}

/// Height of the table frame. Identical on every page of a report, whether
/// or not the page repeats the header.
pub fn table_height(config: &ReportConfig, plan: &HeaderPlan) -> f32 {
    config.frame_height() - plan.band_height() - footer_height(config)
}

pub fn footer_height(config: &ReportConfig) -> f32 {
    config.frame_height() * FOOTER_PCT / 100.0
}

/// Rows that fit in a table body of `body_height`, keeping one row free for
/// the summary line.
pub fn rows_for_body(body_height: f32) -> Result<usize> {
    let slots = (body_height / ROW_HEIGHT).floor();
    if slots < 2.0 {
        return Err(ReportError::NoRowCapacity {
            body_height,
            row_height: ROW_HEIGHT,
        });
    }
    Ok(slots as usize - 1)
}

/// Rows per page for a configuration and measured header.
pub fn rows_per_page(config: &ReportConfig, plan: &HeaderPlan) -> Result<usize> {
    rows_for_body(table_height(config, plan) - TABLE_CAPTION_HEIGHT)
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The bordered page frame inside the margins.
pub fn page_frame(canvas: &mut Canvas, config: &ReportConfig) -> Result<Frame> {
    let m = &config.margins;
    Frame::new(
        canvas,
        m.left,
        config.page_width - m.right,
        m.top,
        config.page_height - m.bottom,
        &FrameStyle::SOLID_BLACK,
    )
}

/// Compose one page from the front of `rows` and end the page.
///
/// `absolute_offset` is the number of rows rendered on earlier pages.
/// Returns how many rows were consumed.
pub fn compose_page(
    ctx: &mut LayoutContext<'_>,
    page: &Frame,
    rows: &[RowRecord],
    must_add_header: bool,
    absolute_offset: usize,
) -> Result<usize> {
    let table_top = if must_add_header {
        build_header(ctx, page)?;
        ctx.plan.band_height()
    } else {
        0.0
    };

    let table = build_table(ctx, page, table_top)?;
    let capacity = rows_for_body(table.body_height())?;
    let consumed = rows.len().min(capacity);

    fill_rows(ctx, &table, &rows[..consumed], absolute_offset)?;
    if consumed == rows.len() {
        build_summary(ctx, &table, consumed)?;
    }
    build_footer(ctx, page)?;

    ctx.canvas.show_page();
    Ok(consumed)
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Frames created by the header step.
#[derive(Debug, Clone)]
pub struct HeaderFrames {
    pub top: Frame,
    pub wagenliste: Frame,
    pub blocks: Vec<(HeaderField, Frame)>,
    pub parties: Option<Frame>,
}

fn field_name(ctx: &LayoutContext<'_>, field: HeaderField) -> String {
    format!("p{}_{:?}", ctx.canvas.page_index() + 1, field)
}

/// Text for a form field: line-break markers become newlines.
fn field_text(text: &str) -> String {
    text.replace(LINE_BREAK, "\n")
}

/// Caption strip plus value area inside one bordered block.
fn fill_block(
    ctx: &mut LayoutContext<'_>,
    block: &Frame,
    field: HeaderField,
    label_align: Alignment,
    value_font_size: f32,
) -> Result<()> {
    let w = block.width();
    let h = block.height();

    let label = block.add_frame(
        ctx.canvas,
        BLOCK_INSET,
        w - BLOCK_INSET,
        BLOCK_INSET,
        LABEL_HEIGHT,
        &FrameStyle::TRANSPARENT,
    )?;
    let caption = ctx.config.labels.for_field(field);
    let style = ParagraphStyle::description().aligned(label_align);
    ctx.canvas.draw_paragraphs(&label, &[caption], &style, ctx.fonts);

    let value = block.add_frame(
        ctx.canvas,
        BLOCK_INSET,
        w - BLOCK_INSET,
        LABEL_HEIGHT,
        h - BLOCK_INSET,
        &FrameStyle::TRANSPARENT,
    )?;

    if field == HeaderField::Date {
        // One field per date part.
        let parts = divide(&value, 3);
        let prefix = field_name(ctx, field);
        for (i, part) in ctx.header.date.iter().enumerate() {
            let cell = Frame::new(
                ctx.canvas,
                parts.left[i],
                parts.right[i],
                value.start_y(),
                value.end_y(),
                &FrameStyle::TRANSPARENT,
            )?;
            let name = format!("{prefix}_{i}");
            let role = FieldRole::Header(field.key().to_string());
            ctx.canvas
                .add_text_field(&cell, name, role, part, value_font_size, false);
        }
        return Ok(());
    }

    let name = field_name(ctx, field);
    let text = field_text(ctx.header.text(field));
    ctx.canvas.add_text_field(
        &value,
        name,
        FieldRole::Header(field.key().to_string()),
        &text,
        value_font_size,
        true,
    );
    Ok(())
}

fn stack_blocks(
    ctx: &mut LayoutContext<'_>,
    column: &Frame,
    fields: &[HeaderField],
    heights: &[f32],
    blocks: &mut Vec<(HeaderField, Frame)>,
) -> Result<()> {
    let mut y = 0.0;
    for (field, h) in fields.iter().zip(heights) {
        let block = column.add_frame(
            ctx.canvas,
            0.0,
            column.width(),
            y,
            y + h,
            &FrameStyle::SOLID_BLACK,
        )?;
        let label_align = if *field == HeaderField::Date {
            Alignment::Center
        } else {
            Alignment::Left
        };
        fill_block(ctx, &block, *field, label_align, HEADER_VALUE_FONT_SIZE)?;
        blocks.push((*field, block));
        y += h;
    }
    Ok(())
}

pub fn build_header(ctx: &mut LayoutContext<'_>, page: &Frame) -> Result<HeaderFrames> {
    let plan = ctx.plan;
    let top = page.add_frame(
        ctx.canvas,
        0.0,
        page.width(),
        0.0,
        plan.top_height,
        &FrameStyle::TRANSPARENT,
    )?;
    let columns = create_matrix(ctx.canvas, &top, &HEADER_COLUMNS, &FrameStyle::TRANSPARENT)?;
    let (left, center, form_column) = (&columns[0], &columns[1], &columns[2]);

    let mut blocks = Vec::new();
    stack_blocks(ctx, left, &LEFT_BLOCKS, &plan.left, &mut blocks)?;
    stack_blocks(ctx, center, &CENTER_BLOCKS, &plan.center, &mut blocks)?;

    // Wagenliste: title over the metadata grid.
    let wagenliste = create_region(ctx.canvas, form_column, Region::FULL, &FrameStyle::SOLID_BLACK)?;
    let title = wagenliste.add_frame(
        ctx.canvas,
        0.0,
        wagenliste.width(),
        BLOCK_INSET,
        TITLE_HEIGHT,
        &FrameStyle::TRANSPARENT,
    )?;
    let title_text = ctx.config.labels.title.as_str();
    ctx.canvas
        .draw_paragraphs(&title, &[title_text], &ParagraphStyle::title(), ctx.fonts);

    let grid = wagenliste.add_frame(
        ctx.canvas,
        0.0,
        wagenliste.width(),
        TITLE_HEIGHT,
        wagenliste.height(),
        &FrameStyle::TRANSPARENT,
    )?;
    let regions: Vec<Region> = WAGENLISTE_FIELDS.iter().map(|(_, r)| *r).collect();
    let cells = create_matrix(ctx.canvas, &grid, &regions, &FrameStyle::TRANSPARENT)?;
    for ((field, _), cell) in WAGENLISTE_FIELDS.iter().zip(&cells) {
        fill_block(ctx, cell, *field, Alignment::Center, PARTY_VALUE_FONT_SIZE)?;
        blocks.push((*field, *cell));
    }

    let parties = if ctx.config.variant.has_parties() {
        let strip = page.add_frame(
            ctx.canvas,
            0.0,
            page.width(),
            plan.top_height,
            plan.band_height(),
            &FrameStyle::TRANSPARENT,
        )?;
        let regions: Vec<Region> = PARTY_BLOCKS.iter().map(|(_, r)| *r).collect();
        let party_frames = create_matrix(ctx.canvas, &strip, &regions, &FrameStyle::SOLID_BLACK)?;
        for ((field, _), frame) in PARTY_BLOCKS.iter().zip(&party_frames) {
            fill_block(ctx, frame, *field, Alignment::Left, PARTY_VALUE_FONT_SIZE)?;
            blocks.push((*field, *frame));
        }
        Some(strip)
    } else {
        None
    };

    Ok(HeaderFrames {
        top,
        wagenliste,
        blocks,
        parties,
    })
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ColumnFrames {
    pub spec: ColumnSpec,
    pub caption: Frame,
    pub values: Frame,
}

/// Frames created by the table step.
#[derive(Debug, Clone)]
pub struct TableFrames {
    pub table: Frame,
    pub columns: Vec<ColumnFrames>,
}

impl TableFrames {
    pub fn body_height(&self) -> f32 {
        self.columns
            .first()
            .map(|c| c.values.height())
            .unwrap_or(0.0)
    }

    fn column(&self, column: Column) -> Option<&ColumnFrames> {
        self.columns.iter().find(|c| c.spec.column == column)
    }
}

pub fn build_table(ctx: &mut LayoutContext<'_>, page: &Frame, top: f32) -> Result<TableFrames> {
    let height = table_height(ctx.config, ctx.plan);
    let table = page.add_frame(
        ctx.canvas,
        0.0,
        page.width(),
        top,
        top + height,
        &FrameStyle::SOLID_GREEN,
    )?;

    let caption_style = ParagraphStyle::description().aligned(Alignment::Center);
    let mut columns = Vec::with_capacity(COLUMNS.len());
    for spec in COLUMNS {
        let column = create_region(
            ctx.canvas,
            &table,
            Region::columns(spec.span.0, spec.span.1),
            &FrameStyle::SOLID_BLACK,
        )?;
        let w = column.width();
        let caption =
            column.add_frame(ctx.canvas, 0.0, w, 0.0, TABLE_CAPTION_HEIGHT, &FrameStyle::SOLID_BLACK)?;
        let values = column.add_frame(
            ctx.canvas,
            0.0,
            w,
            TABLE_CAPTION_HEIGHT,
            column.height(),
            &FrameStyle::SOLID_BLACK,
        )?;

        let text_area = create_region(
            ctx.canvas,
            &caption,
            Region::rows(spec.caption_offset, 100.0),
            &FrameStyle::TRANSPARENT,
        )?;
        let text = ctx.config.labels.column(spec.column);
        if spec.stacked {
            let letters: Vec<String> = text.chars().map(String::from).collect();
            let refs: Vec<&str> = letters.iter().map(String::as_str).collect();
            ctx.canvas
                .draw_paragraphs(&text_area, &refs, &caption_style, ctx.fonts);
        } else {
            ctx.canvas
                .draw_paragraphs(&text_area, &[text], &caption_style, ctx.fonts);
        }

        columns.push(ColumnFrames {
            spec,
            caption,
            values,
        });
    }

    Ok(TableFrames { table, columns })
}

/// Frame of row slot `slot` inside a column's value area.
fn row_cell(canvas: &mut Canvas, values: &Frame, slot: usize) -> Result<Frame> {
    let top = slot as f32 * ROW_HEIGHT;
    values.add_frame(
        canvas,
        0.0,
        values.width(),
        top,
        top + ROW_HEIGHT,
        &FrameStyle::TRANSPARENT,
    )
}

pub fn fill_rows(
    ctx: &mut LayoutContext<'_>,
    table: &TableFrames,
    rows: &[RowRecord],
    absolute_offset: usize,
) -> Result<()> {
    for (local, record) in rows.iter().enumerate() {
        let number = absolute_offset + local + 1;
        for column in &table.columns {
            let cell = row_cell(ctx.canvas, &column.values, local)?;
            let key = column.spec.column.key();
            let value = match column.spec.column {
                Column::Index => number.to_string(),
                other => record.get(other).to_string(),
            };
            ctx.canvas.add_text_field(
                &cell,
                format!("row{number}_{key}"),
                FieldRole::Cell {
                    row: number,
                    column: column.spec.column,
                },
                &value,
                TABLE_FONT_SIZE,
                false,
            );
        }
    }
    Ok(())
}

/// Dashed divider under the last row, then the totals.
pub fn build_summary(ctx: &mut LayoutContext<'_>, table: &TableFrames, rows_on_page: usize) -> Result<()> {
    let Some(first) = table.columns.first() else {
        return Ok(());
    };
    let y = first.values.start_y() + rows_on_page as f32 * ROW_HEIGHT;
    ctx.canvas.draw_line(
        (table.table.start_x(), y),
        (table.table.end_x(), y),
        Stroke {
            width: 2.0,
            color: BLACK,
            dash: Some([1.0, 1.0]),
        },
    );

    let style = ParagraphStyle::description().aligned(Alignment::Center);
    if let Some(label_column) = table.column(SUM_LABEL_COLUMN) {
        let cell = row_cell(ctx.canvas, &label_column.values, rows_on_page)?;
        let label = ctx.config.labels.sum.as_str();
        // Vertically centered in the slot.
        let inner = cell.add_frame(
            ctx.canvas,
            0.0,
            cell.width(),
            (ROW_HEIGHT - style.font_size) / 2.0,
            ROW_HEIGHT,
            &FrameStyle::TRANSPARENT,
        )?;
        ctx.canvas.draw_paragraphs(&inner, &[label], &style, ctx.fonts);
    }

    for (column, total) in SUM_COLUMNS.iter().zip(ctx.header.sum_masses.iter()) {
        let Some(frames) = table.column(*column) else {
            continue;
        };
        let cell = row_cell(ctx.canvas, &frames.values, rows_on_page)?;
        ctx.canvas.add_text_field(
            &cell,
            format!("sum_{}", column.key()),
            FieldRole::Summary(*column),
            total,
            TABLE_FONT_SIZE,
            false,
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// Frames created by the footer step.
#[derive(Debug, Clone)]
pub struct FooterFrames {
    pub issuer: Frame,
    pub signature: Frame,
    pub boilerplate: Frame,
}

fn footer_block(
    ctx: &mut LayoutContext<'_>,
    block: &Frame,
    caption: &str,
    name: String,
    role: FieldRole,
    value: &str,
) -> Result<()> {
    let inner = block.add_frame(
        ctx.canvas,
        FOOTER_PADDING,
        block.width() - FOOTER_PADDING,
        FOOTER_PADDING,
        block.height() - BLOCK_INSET,
        &FrameStyle::TRANSPARENT,
    )?;
    let style = ParagraphStyle::description();
    ctx.canvas.draw_paragraphs(&inner, &[caption], &style, ctx.fonts);

    let value_frame = inner.add_frame(
        ctx.canvas,
        0.0,
        inner.width(),
        style.leading,
        inner.height(),
        &FrameStyle::TRANSPARENT,
    )?;
    let lines = lines_necessary(value, &ParagraphStyle::value(), value_frame.width(), ctx.fonts);
    let (font_size, multiline) = if lines > 1 {
        let fitted = value_frame.height() / (lines as f32 * LINE_HEIGHT_FACTOR);
        (fitted.min(HEADER_VALUE_FONT_SIZE), true)
    } else {
        (HEADER_VALUE_FONT_SIZE, false)
    };
    let value = value.replace(LINE_BREAK, "\n");
    ctx.canvas
        .add_text_field(&value_frame, name, role, &value, font_size, multiline);
    Ok(())
}

pub fn build_footer(ctx: &mut LayoutContext<'_>, page: &Frame) -> Result<FooterFrames> {
    let foot_top = 100.0 - FOOTER_PCT;
    let foot = create_region(
        ctx.canvas,
        page,
        Region::rows(foot_top, 100.0),
        &FrameStyle::SOLID_GREEN,
    )?;
    let halves = create_matrix(
        ctx.canvas,
        &foot,
        &[Region::columns(0.0, 50.0), Region::columns(50.0, 100.0)],
        &FrameStyle::SOLID_BLACK,
    )?;
    let (issuer, signature) = (halves[0], halves[1]);
    let page_no = ctx.canvas.page_index() + 1;

    let issuer_caption = ctx.config.labels.issuer.clone();
    let issuer_value = ctx.header.text(HeaderField::AusstellungDurch).to_string();
    footer_block(
        ctx,
        &issuer,
        &issuer_caption,
        format!("p{page_no}_AusstellungDurch"),
        FieldRole::Footer(HeaderField::AusstellungDurch.key().to_string()),
        &issuer_value,
    )?;

    let signature_caption = ctx.config.labels.signature.clone();
    let signature_value = ctx.header.signature_line();
    footer_block(
        ctx,
        &signature,
        &signature_caption,
        format!("p{page_no}_Signature"),
        FieldRole::Footer("signature".to_string()),
        &signature_value,
    )?;

    // Boilerplate strip below the page frame.
    let m = &ctx.config.margins;
    let boilerplate = Frame::new(
        ctx.canvas,
        m.left,
        ctx.config.page_width - m.right,
        ctx.config.page_height - m.bottom + BOILERPLATE_GAP,
        ctx.config.page_height,
        &FrameStyle::TRANSPARENT,
    )?;
    let sides = create_matrix(
        ctx.canvas,
        &boilerplate,
        &[Region::columns(0.0, 50.0), Region::columns(50.0, 100.0)],
        &FrameStyle::TRANSPARENT,
    )?;
    let caption_style = ParagraphStyle::description();
    let labels = &ctx.config.labels;
    ctx.canvas.draw_paragraphs(
        &sides[0],
        &[labels.combined_transport.as_str()],
        &caption_style,
        ctx.fonts,
    );
    ctx.canvas.draw_paragraphs(
        &sides[1],
        &[labels.form_code.as_str()],
        &caption_style.aligned(Alignment::Right),
        ctx.fonts,
    );

    Ok(FooterFrames {
        issuer,
        signature,
        boilerplate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeaderFieldSet;

    fn setup(config: &ReportConfig) -> (FontManager, ResolvedHeader, HeaderPlan) {
        let fonts = FontManager::default();
        let header = HeaderFieldSet::new()
            .with(HeaderField::Date, vec!["09", "03", "08"])
            .with(HeaderField::SumMasses, vec!["560 380", "158 430", "718 810"])
            .resolve()
            .unwrap();
        let plan = HeaderPlan::measure(config, &header, &fonts);
        (fonts, header, plan)
    }

    #[test]
    fn default_header_fits_minimum_band() {
        let config = ReportConfig::default();
        let (_, _, plan) = setup(&config);
        assert_eq!(plan.band_height(), TemplateVariant::Standard.min_header_height());
        let left: f32 = plan.left.iter().sum();
        let center: f32 = plan.center.iter().sum();
        assert!((left - plan.top_height).abs() < 1e-3);
        assert!((center - plan.top_height).abs() < 1e-3);
    }

    #[test]
    fn long_values_grow_their_block() {
        let config = ReportConfig::default();
        let fonts = FontManager::default();
        let short = HeaderFieldSet::new().resolve().unwrap();
        let tall = HeaderFieldSet::new()
            .with(
                HeaderField::Leitungswege,
                "Salzburg<br/>Villach<br/>Tarvisio<br/>Udine<br/>Venezia Mestre",
            )
            .resolve()
            .unwrap();
        let a = HeaderPlan::measure(&config, &short, &fonts);
        let b = HeaderPlan::measure(&config, &tall, &fonts);
        assert!(b.band_height() > a.band_height());
    }

    #[test]
    fn standard_variant_reports_unused_party_values() {
        let config = ReportConfig::default();
        let fonts = FontManager::default();
        let header = HeaderFieldSet::new()
            .with(HeaderField::Absender, vec!["Holz GmbH", "Salzburg"])
            .with(HeaderField::Begleiter, "")
            .resolve()
            .unwrap();
        let plan = HeaderPlan::measure(&config, &header, &fonts);
        assert_eq!(plan.ignored, vec![HeaderField::Absender]);
        assert_eq!(plan.parties_height, 0.0);

        let parties = config.with_variant(TemplateVariant::WithParties);
        let plan = HeaderPlan::measure(&parties, &header, &fonts);
        assert!(plan.ignored.is_empty());
        assert!(plan.parties_height > 0.0);
    }

    #[test]
    fn long_issuer_becomes_a_multiline_field() {
        let config = ReportConfig::default();
        let fonts = FontManager::default();
        let footer_field = |issuer: &str| {
            let header = HeaderFieldSet::new()
                .with(HeaderField::AusstellungDurch, issuer)
                .resolve()
                .unwrap();
            let plan = HeaderPlan::measure(&config, &header, &fonts);
            let mut canvas = Canvas::new("t", config.page_width, config.page_height);
            let mut ctx = LayoutContext {
                canvas: &mut canvas,
                fonts: &fonts,
                config: &config,
                header: &header,
                plan: &plan,
            };
            let page = page_frame(ctx.canvas, &config).unwrap();
            build_footer(&mut ctx, &page).unwrap();
            ctx.canvas.show_page();
            let layout = canvas.finish();
            layout.pages[0]
                .fields
                .iter()
                .find(|f| f.name == "p1_AusstellungDurch")
                .cloned()
                .unwrap()
        };

        let short = footer_field("RCA Salzburg");
        assert!(!short.multiline);
        assert_eq!(short.font_size, HEADER_VALUE_FONT_SIZE);

        let long = footer_field(
            "Rail Cargo Austria AG, Kundenservice Salzburg, Südtiroler Platz 1, 5020 Salzburg",
        );
        assert!(long.multiline);
        assert!(long.font_size < HEADER_VALUE_FONT_SIZE);
    }

    #[test]
    fn rows_per_page_keeps_a_summary_slot() {
        assert_eq!(rows_for_body(ROW_HEIGHT * 10.0 + 1.0).unwrap(), 9);
        assert!(matches!(
            rows_for_body(ROW_HEIGHT),
            Err(ReportError::NoRowCapacity { .. })
        ));
    }

    #[test]
    fn compose_numbers_rows_from_offset() {
        let config = ReportConfig::default();
        let (fonts, header, plan) = setup(&config);
        let mut canvas = Canvas::new("t", config.page_width, config.page_height);
        let rows = vec![RowRecord::default(); 3];
        let consumed = {
            let mut ctx = LayoutContext {
                canvas: &mut canvas,
                fonts: &fonts,
                config: &config,
                header: &header,
                plan: &plan,
            };
            let page = page_frame(ctx.canvas, &config).unwrap();
            compose_page(&mut ctx, &page, &rows, false, 40).unwrap()
        };
        assert_eq!(consumed, 3);
        let layout = canvas.finish();
        let numbers: Vec<&str> = layout.pages[0]
            .cells(Column::Index)
            .map(|f| f.value.as_str())
            .collect();
        assert_eq!(numbers, vec!["41", "42", "43"]);
        assert!(!layout.pages[0].has_header_field("Leitungswege"));
    }

    #[test]
    fn table_without_header_starts_at_page_frame_top() {
        let config = ReportConfig::default();
        let (fonts, header, plan) = setup(&config);
        let mut canvas = Canvas::new("t", config.page_width, config.page_height);
        let mut ctx = LayoutContext {
            canvas: &mut canvas,
            fonts: &fonts,
            config: &config,
            header: &header,
            plan: &plan,
        };
        let page = page_frame(ctx.canvas, &config).unwrap();
        let with_header = build_table(&mut ctx, &page, plan.band_height()).unwrap();
        let without = build_table(&mut ctx, &page, 0.0).unwrap();
        assert_eq!(without.table.start_y(), config.margins.top);
        assert!((with_header.body_height() - without.body_height()).abs() < 1e-3);
    }
}
