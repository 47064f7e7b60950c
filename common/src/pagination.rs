//! Client-side mirror of the server's pagination metadata.

use crate::ModelError;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;

/// `{page, pages, total, per_page}` with `1 <= page <= pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub per_page: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            pages: 1,
            total: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationState {
    /// Build a state, rejecting values that break the invariants.
    #[track_caller]
    pub fn new(page: u32, pages: u32, total: u64, per_page: u32) -> Result<Self, ModelError> {
        if per_page == 0 {
            return Err(ModelError::validation("per_page", "must be at least 1"));
        }
        if pages == 0 {
            return Err(ModelError::validation("pages", "must be at least 1"));
        }
        if page == 0 || page > pages {
            return Err(ModelError::validation(
                "page",
                format!("{page} is outside 1..={pages}"),
            ));
        }

        Ok(Self {
            page,
            pages,
            total,
            per_page,
        })
    }

    /// Mirror what the server reported.
    ///
    /// An empty result set comes back as `pages = 0`; it is shown as a single
    /// empty page so the invariant holds.
    pub fn from_server(page: u32, pages: u32, total: u64, per_page: u32) -> Self {
        let pages = pages.max(1);
        Self {
            page: page.clamp(1, pages),
            pages,
            total,
            per_page: per_page.max(1),
        }
    }

    pub fn reset_to_first(&mut self) {
        self.page = 1;
    }

    /// Move to `page` when it is in range and differs from the current one.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page >= 1 && page <= self.pages && page != self.page {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        if self.page < self.pages {
            self.page += 1;
            true
        } else {
            false
        }
    }
}
