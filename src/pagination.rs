//! This modules defines the common functionality for paging data.
//!
//! A [PageRequest] is the clamped page number and size a client asked for, it
//! turns into the offset and limit of a store query. [create_pagination_indicators]
//! works out which page links a page navigator should show.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// A 1-indexed page number and the number of items per page.
///
/// Both values are always at least 1, [PageRequest::new] is the only way to
/// create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Create a page request, clamping values below 1 to 1.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            page_size: page_size.max(1) as u64,
        }
    }

    /// Create a page request from raw query parameters.
    ///
    /// Missing or unparsable values fall back to the defaults in `config`.
    pub fn from_params(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> Self {
        let parse_or = |raw: Option<&str>, default: u64| {
            raw.and_then(|raw| raw.trim().parse::<i64>().ok())
                .unwrap_or(default.min(i64::MAX as u64) as i64)
        };

        Self::new(
            parse_or(page, config.default_page),
            parse_or(page_size, config.default_page_size),
        )
    }

    /// The 1-indexed page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of items on a page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The number of items before the start of this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The number of items to fetch for this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// The number of pages needed to show `total` items.
    ///
    /// An empty result still has one (empty) page.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size).max(1)
    }
}

/// One element of a page navigator.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page being shown.
    CurrPage(u64),
    /// A gap in the page links.
    Ellipsis,
    /// A link to the following page.
    NextButton(u64),
    /// A link to the preceding page.
    BackButton(u64),
}

/// Work out the links to show for `curr_page` out of `page_count` pages.
///
/// At most `max_pages` consecutive page links are shown around the current
/// page. The first and last page are always reachable, with an ellipsis
/// standing in for any skipped pages.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };
    let half = max_pages / 2;

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= half {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > page_count - half {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - half)..=(curr_page + half))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > half + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < page_count - half {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
