//! Pagination engine with two distinct strategies.
//!
//! - [`paginate_rows`] slices a fully evaluated row collection itself and
//!   clamps out-of-range page requests instead of erroring.
//! - [`annotate_rows`] trusts the storage layer: the rows *are* already the
//!   requested page (sliced with `LIMIT`/`OFFSET`) and each row carries the
//!   full matching count in a window-`total` column. This strategy only
//!   computes metadata, it never slices.
//!
//! Both strategies produce the same [`PageEnvelope`] shape.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard output wrapper carrying paging metadata plus the page's data.
///
/// `previous_page`, `next_page` and `num_pages` serialize as `null` when
/// absent, matching the wire format clients already consume.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageEnvelope<T> {
    /// Always `true`; failures never produce an envelope.
    pub success: bool,
    /// Previous page number, or `null` on the first page.
    pub previous_page: Option<i64>,
    /// Next page number, or `null` on the last page.
    pub next_page: Option<i64>,
    /// Total number of pages, or `null` when nothing matched.
    pub num_pages: Option<i64>,
    /// Total number of matching rows.
    pub total: i64,
    /// The page's rows.
    pub data: Vec<T>,
}

/// Requested page for the evaluated-collection strategy.
///
/// Carries the possibility of a malformed request: a non-numeric page is
/// not an error at this layer, it clamps to page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// A numeric page request (may still be out of range).
    Number(i64),
    /// Unparseable page request; treated as page 1.
    Invalid,
}

impl From<i64> for PageSelector {
    fn from(page: i64) -> Self {
        Self::Number(page)
    }
}

impl From<u32> for PageSelector {
    fn from(page: u32) -> Self {
        Self::Number(i64::from(page))
    }
}

impl From<&str> for PageSelector {
    fn from(raw: &str) -> Self {
        raw.trim().parse().map_or(Self::Invalid, Self::Number)
    }
}

/// Row types that embed the window total produced by the storage layer.
pub trait WindowTotal {
    /// The full matching count, identical across all rows of the result.
    fn window_total(&self) -> i64;
}

/// Evaluated-collection pagination: counts `rows`, slices the requested
/// page out of it and fills in the page metadata.
///
/// Page clamping: a non-numeric or below-range page becomes page 1; a page
/// beyond the last becomes the last page. `page_size` must be at least 1
/// (the filter layer guarantees 1..=100).
#[must_use]
pub fn paginate_rows<T>(
    rows: Vec<T>,
    page: impl Into<PageSelector>,
    page_size: u32,
) -> PageEnvelope<T> {
    let page_size = i64::from(page_size.max(1));
    let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
    let num_pages = total / page_size + i64::from(total % page_size != 0);

    if total == 0 {
        return PageEnvelope {
            success: true,
            previous_page: None,
            next_page: None,
            num_pages: None,
            total: 0,
            data: rows,
        };
    }

    let requested = match page.into() {
        PageSelector::Number(n) => n,
        PageSelector::Invalid => 1,
    };
    let page = requested.clamp(1, num_pages);

    let start = usize::try_from((page - 1) * page_size).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let data: Vec<T> = rows.into_iter().skip(start).take(take).collect();

    PageEnvelope {
        success: true,
        previous_page: (page > 1).then(|| page - 1),
        next_page: (page < num_pages).then(|| page + 1),
        num_pages: Some(num_pages),
        total,
        data,
    }
}

/// Pre-aggregated pagination: annotates rows the query layer already
/// sliced. The window total embedded in the first row drives the metadata;
/// an empty row set reports `total = 0` with all metadata absent.
#[must_use]
pub fn annotate_rows<T: WindowTotal>(rows: Vec<T>, page: u32, page_size: u32) -> PageEnvelope<T> {
    let Some(first) = rows.first() else {
        return PageEnvelope {
            success: true,
            previous_page: None,
            next_page: None,
            num_pages: None,
            total: 0,
            data: rows,
        };
    };

    let page = i64::from(page);
    let page_size = i64::from(page_size.max(1));
    let total = first.window_total();
    let total_pages = total / page_size + i64::from(total % page_size != 0);

    PageEnvelope {
        success: true,
        previous_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
        num_pages: Some(total_pages),
        total,
        data: rows,
    }
}
