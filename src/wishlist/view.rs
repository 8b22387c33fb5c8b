//! The paginated wishlist screen state.
//!
//! Whenever the favorites change, every id is re-fetched one at a time and
//! the successes are shown ten per page.  A failed id is logged and left out;
//! it never aborts the rest of the refresh.

use std::ops::Range;

use tokio::task::JoinHandle;

use crate::error::Error;
use crate::source::{Planet, PlanetSource};

pub const PAGE_SIZE: usize = 10;

/// Outcome of one sequential refresh.
#[derive(Debug, Default)]
pub struct Refreshed {
    /// Successfully fetched planets, in wishlist order.
    pub planets: Vec<Planet>,
    /// The id each planet in `planets` was fetched under.
    pub ids: Vec<String>,
    /// Set when at least one id failed.
    pub error: Option<Error>,
}

/// Fetch every id in order, one request at a time.
pub async fn fetch_sequential<S>(source: &S, ids: &[String]) -> Refreshed
where
    S: PlanetSource + ?Sized,
{
    let mut out = Refreshed::default();
    let mut failed = Vec::new();

    for id in ids {
        match source.fetch_by_id(id).await {
            Ok(planet) => {
                out.planets.push(planet);
                out.ids.push(id.clone());
            }
            Err(e) => {
                tracing::warn!("Error fetching planet with ID {id}: {e}");
                failed.push(id.clone());
            }
        }
    }

    if !failed.is_empty() {
        let err = Error::PartialFetch {
            failed,
            requested: ids.len(),
        };
        tracing::warn!("{err}");
        out.error = Some(err);
    }
    out
}

#[derive(Debug)]
pub struct WishlistView {
    /// Mount generation; results for another generation are stale.
    pub mount: u64,
    /// Bumped on every refresh so a slow refresh cannot overwrite a newer one.
    refresh: u64,
    planets: Vec<Planet>,
    ids: Vec<String>,
    /// 1-based.
    current_page: usize,
    /// Selected row within the current page.
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Task running the latest refresh.
    task: Option<JoinHandle<()>>,
}

impl WishlistView {
    pub fn new(mount: u64) -> Self {
        Self {
            mount,
            refresh: 0,
            planets: Vec::new(),
            ids: Vec::new(),
            current_page: 1,
            selected: 0,
            loading: false,
            error: None,
            task: None,
        }
    }

    /// Mark a refresh as started and return its token.  A refresh still
    /// running is aborted.
    pub fn begin_refresh(&mut self) -> u64 {
        if let Some(task) = &self.task {
            task.abort();
        }
        self.refresh += 1;
        self.loading = true;
        self.refresh
    }

    /// Hand back the task of the previous refresh so the next one can wait
    /// for it to wind down.
    pub fn take_task(&mut self) -> Option<JoinHandle<()>> {
        self.task.take()
    }

    pub fn set_task(&mut self, task: JoinHandle<()>) {
        self.task = Some(task);
    }

    /// Apply a finished refresh.  Returns false when it was superseded.
    pub fn complete_refresh(&mut self, token: u64, result: Refreshed) -> bool {
        if token != self.refresh {
            tracing::debug!(token, current = self.refresh, "discarding stale wishlist refresh");
            return false;
        }
        self.loading = false;
        self.planets = result.planets;
        self.ids = result.ids;
        self.error = result.error.map(|e| e.to_string());
        self.paginate(self.current_page);
        true
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages, at least one so an empty wishlist still has a page.
    pub fn page_count(&self) -> usize {
        self.planets.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Select 1-based page `n`, clamped to the available pages.
    pub fn paginate(&mut self, n: usize) {
        self.current_page = n.clamp(1, self.page_count());
        self.selected = self
            .selected
            .min(self.page_range().len().saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.paginate(self.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.paginate(self.current_page.saturating_sub(1));
    }

    fn page_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * PAGE_SIZE).min(self.planets.len());
        let end = (start + PAGE_SIZE).min(self.planets.len());
        start..end
    }

    /// Planets on the current page.
    pub fn current_items(&self) -> &[Planet] {
        &self.planets[self.page_range()]
    }

    pub fn select_next(&mut self) {
        let len = self.page_range().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Wishlist id of the selected row.
    pub fn selected_id(&self) -> Option<&str> {
        let range = self.page_range();
        self.ids[range].get(self.selected).map(String::as_str)
    }
}

impl Drop for WishlistView {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::{planet, FakeSource};

    fn ids(range: impl IntoIterator<Item = usize>) -> Vec<String> {
        range.into_iter().map(|i| i.to_string()).collect()
    }

    fn loaded_view(n: usize) -> WishlistView {
        let mut view = WishlistView::new(1);
        let token = view.begin_refresh();
        view.complete_refresh(
            token,
            Refreshed {
                planets: (1..=n).map(planet).collect(),
                ids: ids(1..=n),
                error: None,
            },
        );
        view
    }

    #[tokio::test]
    async fn twelve_ids_make_two_pages() {
        let source = FakeSource::new().with_planets(1..=12);
        let result = fetch_sequential(&source, &ids(1..=12)).await;
        assert_eq!(result.planets.len(), 12);
        assert!(result.error.is_none());

        let mut view = WishlistView::new(1);
        let token = view.begin_refresh();
        assert!(view.complete_refresh(token, result));

        assert_eq!(view.page_count(), 2);
        assert_eq!(view.current_items().len(), 10);

        view.paginate(2);
        let names: Vec<&str> = view.current_items().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Planet 11", "Planet 12"]);
    }

    #[tokio::test]
    async fn failed_id_is_omitted_and_order_kept() {
        let source = FakeSource::new().with_planets([1, 3]);
        let result = fetch_sequential(&source, &ids([1, 2, 3])).await;

        let names: Vec<&str> = result.planets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Planet 1", "Planet 3"]);
        assert_eq!(result.ids, vec!["1", "3"]);
        match result.error {
            Some(Error::PartialFetch { failed, requested }) => {
                assert_eq!(failed, vec!["2"]);
                assert_eq!(requested, 3);
            }
            other => panic!("expected partial fetch error, got {other:?}"),
        }
        // The failure did not stop the id after it.
        assert_eq!(*source.fetched_ids.lock().unwrap(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn fetches_are_sequential() {
        let source = FakeSource::new().with_planets(1..=5);
        fetch_sequential(&source, &ids(1..=5)).await;
        assert_eq!(
            source
                .max_in_flight
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn empty_wishlist_fetches_nothing() {
        let source = FakeSource::new();
        let result = fetch_sequential(&source, &[]).await;
        assert!(result.planets.is_empty());
        assert!(result.error.is_none());
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn paginate_clamps_out_of_range() {
        let mut view = loaded_view(12);
        view.paginate(0);
        assert_eq!(view.current_page(), 1);
        view.paginate(99);
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn empty_view_has_one_empty_page() {
        let view = WishlistView::new(1);
        assert_eq!(view.page_count(), 1);
        assert!(view.current_items().is_empty());
        assert!(view.selected_id().is_none());
    }

    #[test]
    fn next_and_previous_page_stay_in_bounds() {
        let mut view = loaded_view(25);
        assert_eq!(view.page_count(), 3);
        view.next_page();
        view.next_page();
        view.next_page();
        assert_eq!(view.current_page(), 3);
        assert_eq!(view.current_items().len(), 5);
        view.previous_page();
        view.previous_page();
        view.previous_page();
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut view = WishlistView::new(1);
        let old = view.begin_refresh();
        let new = view.begin_refresh();

        assert!(!view.complete_refresh(
            old,
            Refreshed {
                planets: vec![planet(1)],
                ids: ids([1]),
                error: None,
            }
        ));
        assert!(view.loading);
        assert_eq!(view.len(), 0);

        assert!(view.complete_refresh(new, Refreshed::default()));
        assert!(!view.loading);
    }

    #[test]
    fn shrinking_wishlist_pulls_page_back_in_range() {
        let mut view = loaded_view(12);
        view.paginate(2);
        view.selected = 1;

        let token = view.begin_refresh();
        view.complete_refresh(
            token,
            Refreshed {
                planets: (1..=3).map(planet).collect(),
                ids: ids(1..=3),
                error: None,
            },
        );
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.current_items().len(), 3);
    }

    #[test]
    fn selection_maps_to_wishlist_id() {
        let mut view = loaded_view(12);
        view.paginate(2);
        view.select_next();
        assert_eq!(view.selected_id(), Some("12"));
        view.select_next();
        assert_eq!(view.selected_id(), Some("12"));
        view.select_previous();
        assert_eq!(view.selected_id(), Some("11"));
    }

    #[test]
    fn partial_failure_surfaces_as_error_text() {
        let mut view = WishlistView::new(1);
        let token = view.begin_refresh();
        view.complete_refresh(
            token,
            Refreshed {
                planets: vec![planet(1)],
                ids: ids([1]),
                error: Some(Error::PartialFetch {
                    failed: vec!["2".into()],
                    requested: 2,
                }),
            },
        );
        assert_eq!(view.len(), 1);
        assert!(view.error.as_deref().unwrap().contains("1 of 2"));
    }
}
