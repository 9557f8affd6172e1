//! Pagination – drives the composer until every row is on a page.
//!
//! Each page takes as many rows as its table body holds. The header band is
//! drawn on the first page and, when `repeat_header` is set, on every
//! following page. The summary goes on the page that drains the last row.

use crate::composer::{compose_page, page_frame, table_height, LayoutContext};
use crate::error::{ReportError, Result};
use crate::model::RowRecord;
use crate::template::{ROW_HEIGHT, TABLE_CAPTION_HEIGHT};

/// Where the driver is in the row list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationCursor {
    /// Rows not yet placed on a page.
    pub rows_remaining: usize,
    /// Number of rows placed so far; the next row's 1-based number is
    /// `last_absolute_index + 1`.
    pub last_absolute_index: usize,
    /// Pages composed so far.
    pub pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Rendering,
    Done,
}

impl PaginationCursor {
    pub fn new(total_rows: usize) -> Self {
        Self {
            rows_remaining: total_rows,
            ..Self::default()
        }
    }

    pub fn state(&self) -> DriverState {
        if self.rows_remaining == 0 {
            DriverState::Done
        } else {
            DriverState::Rendering
        }
    }

    fn advance(&mut self, consumed: usize) {
        self.rows_remaining -= consumed;
        self.last_absolute_index += consumed;
        self.pages += 1;
    }
}

/// Lay out `rows` over as many pages as needed.
pub fn paginate(
    ctx: &mut LayoutContext<'_>,
    rows: &[RowRecord],
    repeat_header: bool,
) -> Result<PaginationCursor> {
    if rows.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    let mut cursor = PaginationCursor::new(rows.len());
    while cursor.state() == DriverState::Rendering {
        let start = cursor.last_absolute_index;
        let must_add_header = repeat_header || start == 0;

        let page = page_frame(ctx.canvas, ctx.config)?;
        let consumed = compose_page(ctx, &page, &rows[start..], must_add_header, start)?;
        if consumed == 0 {
            return Err(ReportError::NoRowCapacity {
                body_height: table_height(ctx.config, ctx.plan) - TABLE_CAPTION_HEIGHT,
                row_height: ROW_HEIGHT,
            });
        }
        log::info!(
            "Creating page {} for wagons {} to {}",
            cursor.pages + 1,
            start + 1,
            start + consumed
        );
        cursor.advance(consumed);
    }

    log::debug!(
        "Paginated {} rows onto {} pages",
        cursor.last_absolute_index,
        cursor.pages
    );
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::composer::{rows_per_page, HeaderPlan};
    use crate::fonts::FontManager;
    use crate::layout_config::DocumentLayout;
    use crate::model::{Column, HeaderFieldSet};
    use crate::pipeline::ReportConfig;

    fn run(n: usize, repeat_header: bool) -> (Result<PaginationCursor>, DocumentLayout, usize) {
        let config = ReportConfig::default();
        let fonts = FontManager::default();
        let header = HeaderFieldSet::new().resolve().unwrap();
        let plan = HeaderPlan::measure(&config, &header, &fonts);
        let rpp = rows_per_page(&config, &plan).unwrap();
        let mut canvas = Canvas::new("p", config.page_width, config.page_height);
        let rows = vec![RowRecord::default(); n];
        let result = {
            let mut ctx = LayoutContext {
                canvas: &mut canvas,
                fonts: &fonts,
                config: &config,
                header: &header,
                plan: &plan,
            };
            paginate(&mut ctx, &rows, repeat_header)
        };
        (result, canvas.finish(), rpp)
    }

    #[test]
    fn single_page() {
        let (cursor, layout, _) = run(1, false);
        let cursor = cursor.unwrap();
        assert_eq!(cursor.pages, 1);
        assert_eq!(cursor.state(), DriverState::Done);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].summary(Column::BruttoMasse).is_some());
    }

    #[test]
    fn multiple_pages() {
        let (_, _, rpp) = run(1, false);
        let (cursor, layout, _) = run(2 * rpp + 1, false);
        assert_eq!(cursor.unwrap().pages, 3);
        assert_eq!(layout.pages.len(), 3);
        assert_eq!(layout.pages[0].cells(Column::Index).count(), rpp);
        assert_eq!(layout.pages[2].cells(Column::Index).count(), 1);
    }

    #[test]
    fn header_only_on_first_page_unless_repeated() {
        let (_, _, rpp) = run(1, false);
        let (_, once, _) = run(rpp + 1, false);
        assert!(once.pages[0].has_header_field("Leitungswege"));
        assert!(!once.pages[1].has_header_field("Leitungswege"));

        let (_, repeated, _) = run(rpp + 1, true);
        assert!(repeated.pages[1].has_header_field("Leitungswege"));
    }

    #[test]
    fn exact_fill_keeps_summary_on_last_page() {
        let (_, _, rpp) = run(1, false);
        let (cursor, layout, _) = run(rpp, false);
        assert_eq!(cursor.unwrap().pages, 1);
        assert!(layout.pages[0].summary(Column::NettoMasse).is_some());
    }

    #[test]
    fn empty_input_is_rejected() {
        let (result, layout, _) = run(0, false);
        assert!(matches!(result, Err(ReportError::EmptyInput)));
        assert!(layout.pages.is_empty());
    }
}
