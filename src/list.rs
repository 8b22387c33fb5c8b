//! Infinite-scroll planet list.
//!
//! [`IncrementalList`] accumulates pages from the remote collection as the
//! user scrolls.  It never performs I/O itself: [`IncrementalList::request_more`]
//! hands out the cursor to fetch and flips the `loading` guard, and
//! [`IncrementalList::complete`] folds the result back in.  Whoever owns the
//! list (see [`crate::fetch`]) does the network call in between.
//!
//! Only the rows inside [`visible_window`] are turned into widgets when the
//! list is drawn.

use std::ops::Range;

use crate::error::Result;
use crate::source::{Page, Planet};

/// Height of one list row in terminal rows.
pub const ITEM_HEIGHT: usize = 1;

/// Extra rows past the viewport that count as "near the end".
pub const LOOKAHEAD_ROWS: usize = 4;

/// Rows materialized above and below the viewport.
pub const OVERSCAN: usize = 2;

/// Near-bottom heuristic: true once the bottom of the viewport plus a
/// lookahead buffer reaches the extent of what is already loaded.
///
/// All arguments share one unit (terminal rows here).  The predicate is
/// monotonic in `scroll_offset`, so once it fires it keeps firing as the user
/// scrolls further down.
pub fn should_fetch_more(
    scroll_offset: usize,
    viewport_height: usize,
    loaded_count: usize,
    item_height: usize,
    buffer: usize,
) -> bool {
    scroll_offset + viewport_height + buffer >= loaded_count.saturating_mul(item_height)
}

/// Index range of the rows to materialize for a viewport starting at
/// `offset`, padded by `overscan` on both sides and clipped to `len`.
pub fn visible_window(offset: usize, viewport: usize, len: usize, overscan: usize) -> Range<usize> {
    let start = offset.saturating_sub(overscan).min(len);
    let end = offset
        .saturating_add(viewport)
        .saturating_add(overscan)
        .min(len);
    start..end
}

pub struct IncrementalList {
    /// Mount generation; page results for another generation are stale.
    pub mount: u64,
    /// Append-only, in arrival order.
    pub items: Vec<Planet>,
    next_cursor: Option<String>,
    has_more: bool,
    loading: bool,
    /// Index of the highlighted row.
    pub selected: Option<usize>,
    /// First visible row.
    offset: usize,
    /// Visible rows, as measured at the last draw.
    viewport: usize,
    /// Size of the whole remote collection, as last reported.
    pub total: usize,
    /// Last fetch failure, shown in the status bar.
    pub last_error: Option<String>,
    /// Set by a failed fetch; only user movement clears it.
    retry_blocked: bool,
}

impl IncrementalList {
    pub fn new(mount: u64, root_cursor: impl Into<String>) -> Self {
        Self {
            mount,
            items: Vec::new(),
            next_cursor: Some(root_cursor.into()),
            has_more: true,
            loading: false,
            selected: None,
            offset: 0,
            viewport: 0,
            total: 0,
            last_error: None,
            retry_blocked: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Claim the next page.
    ///
    /// Returns the cursor the caller must fetch and marks the list as
    /// loading, or `None` if a fetch is already outstanding or the
    /// collection is exhausted.
    pub fn request_more(&mut self) -> Option<String> {
        if self.loading || !self.has_more {
            return None;
        }
        let cursor = self.next_cursor.clone()?;
        self.loading = true;
        Some(cursor)
    }

    /// Fold the result of the fetch handed out by [`Self::request_more`].
    ///
    /// On failure the cursor stays put, and the list stops asking for more
    /// until the user moves.  The next scroll retries the same page.
    pub fn complete(&mut self, result: Result<Page>) {
        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(
                    count = page.results.len(),
                    previous = page.previous.as_deref().unwrap_or("-"),
                    next = page.next.as_deref().unwrap_or("-"),
                    "page loaded"
                );
                self.total = page.count;
                self.items.extend(page.results);
                self.has_more = page.next.is_some();
                self.next_cursor = page.next;
                self.last_error = None;
                self.retry_blocked = false;
            }
            Err(e) => {
                tracing::warn!(network = e.is_network(), "Error fetching planets: {e}");
                self.last_error = Some(e.to_string());
                self.retry_blocked = true;
            }
        }
    }

    /// Whether the viewport is close enough to the end of the loaded rows to
    /// want another page.  Always false after a failed fetch until the user
    /// moves the selection.
    pub fn wants_more(&self) -> bool {
        !self.retry_blocked
            && should_fetch_more(
                self.offset * ITEM_HEIGHT,
                self.viewport,
                self.items.len(),
                ITEM_HEIGHT,
                LOOKAHEAD_ROWS,
            )
    }

    /// Record the viewport height measured by the renderer.
    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows / ITEM_HEIGHT;
        self.keep_selection_visible();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows to materialize for the current scroll position.
    pub fn window(&self) -> Range<usize> {
        visible_window(self.offset, self.viewport, self.items.len(), OVERSCAN)
    }

    /// Detail-screen id of the selected row: its 1-based position.
    pub fn selected_id(&self) -> Option<String> {
        self.selected
            .filter(|&i| i < self.items.len())
            .map(|i| (i + 1).to_string())
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        self.move_selection(self.viewport.max(1) as isize);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(self.viewport.max(1) as isize));
    }

    pub fn select_first(&mut self) {
        self.retry_blocked = false;
        if !self.items.is_empty() {
            self.selected = Some(0);
            self.keep_selection_visible();
        }
    }

    pub fn select_last(&mut self) {
        self.retry_blocked = false;
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
            self.keep_selection_visible();
        }
    }

    fn move_selection(&mut self, delta: isize) {
        self.retry_blocked = false;
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let i = match self.selected {
            Some(i) => i.saturating_add_signed(delta).min(last),
            None => 0,
        };
        self.selected = Some(i);
        self.keep_selection_visible();
    }

    fn keep_selection_visible(&mut self) {
        let Some(sel) = self.selected else {
            return;
        };
        if sel < self.offset {
            self.offset = sel;
        } else if self.viewport > 0 && sel >= self.offset + self.viewport {
            self.offset = sel + 1 - self.viewport;
        }
    }
}
