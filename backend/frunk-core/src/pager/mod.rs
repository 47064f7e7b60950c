//! Page-number window for the notes pager.

use std::fmt;

/// Pages listed in full up to this many.
const FULL_LIST_LIMIT: u32 = 7;
/// Pages listed before the ellipsis near the start.
const LEADING_RUN: u32 = 5;

/// One slot of the pager: a clickable page number or a gap marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Ellipsis,
}

impl PageLabel {
    pub fn page(&self) -> Option<u32> {
        match self {
            PageLabel::Page(page) => Some(*page),
            PageLabel::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Page(page) => write!(f, "{page}"),
            PageLabel::Ellipsis => write!(f, "…"),
        }
    }
}

/// Truncated list of page labels for `current` of `total` pages.
///
/// Always starts at page 1 and ends at `total`; away from either end the
/// window around `current` is three pages wide.
pub fn page_window(current: u32, total: u32) -> Vec<PageLabel> {
    use PageLabel::{Ellipsis, Page};

    if total <= FULL_LIST_LIMIT {
        return (1..=total).map(Page).collect();
    }

    let mut labels = Vec::with_capacity(FULL_LIST_LIMIT as usize);
    if current <= 4 {
        labels.extend((1..=LEADING_RUN).map(Page));
        labels.push(Ellipsis);
        labels.push(Page(total));
    } else if current >= total - 3 {
        labels.push(Page(1));
        labels.push(Ellipsis);
        labels.extend((total - 4..=total).map(Page));
    } else {
        labels.push(Page(1));
        labels.push(Ellipsis);
        labels.extend((current - 1..=current + 1).map(Page));
        labels.push(Ellipsis);
        labels.push(Page(total));
    }
    labels
}
