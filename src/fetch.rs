//! Background network calls.
//!
//! The UI thread owns all state.  Network calls run as tasks on a tokio
//! runtime and report back over an unbounded [`mpsc`] channel that the main
//! loop drains every tick.  Each message carries the mount generation of the
//! view that asked for it so results for a view that is gone can be dropped.
//!
//! ## For contributors
//!
//! Nothing here retries.  A failed page leaves the list's cursor where it
//! was, so the next scroll asks for the same page again.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::list::IncrementalList;
use crate::source::{Page, Planet, PlanetSource};
use crate::wishlist::{fetch_sequential, Refreshed, WishlistView};

/// Messages sent from fetch tasks to the UI thread.
pub enum FetchMsg {
    /// A list page finished loading.
    Page { mount: u64, result: Result<Page> },
    /// A detail fetch finished.
    Planet { mount: u64, result: Result<Planet> },
    /// A wishlist refresh finished.
    Wishlist {
        mount: u64,
        token: u64,
        result: Refreshed,
    },
}

/// Spawns fetches against one source.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn PlanetSource>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<FetchMsg>,
}

/// Create a fetcher and the receiver the main loop should drain.
pub fn channel(
    source: Arc<dyn PlanetSource>,
    runtime: Handle,
) -> (Fetcher, mpsc::UnboundedReceiver<FetchMsg>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Fetcher {
            source,
            runtime,
            tx,
        },
        rx,
    )
}

impl Fetcher {
    pub fn root_cursor(&self) -> String {
        self.source.root_cursor()
    }

    /// Ask the list for its next page and fetch it.  Returns false when the
    /// list's guard refused (already loading, or exhausted).
    pub fn request_more(&self, list: &mut IncrementalList) -> bool {
        let Some(cursor) = list.request_more() else {
            return false;
        };
        let mount = list.mount;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(mount, cursor = %cursor, "fetching page");

        self.runtime.spawn(async move {
            let result = source.fetch_page(&cursor).await;
            // The receiver is gone once the UI has exited.
            let _ = tx.send(FetchMsg::Page { mount, result });
        });
        true
    }

    /// Fetch one planet for a detail view.
    pub fn fetch_planet(&self, mount: u64, id: String) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = source.fetch_by_id(&id).await;
            let _ = tx.send(FetchMsg::Planet { mount, result });
        });
    }

    /// Re-fetch every wishlist id, one at a time, for `view`.
    ///
    /// The refresh it replaces is aborted, and the new one does not start
    /// fetching until the old task has stopped.
    pub fn refresh_wishlist(&self, view: &mut WishlistView, ids: Vec<String>) {
        let mount = view.mount;
        let token = view.begin_refresh();
        let previous = view.take_task();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(mount, token, count = ids.len(), "refreshing wishlist");

        let task = self.runtime.spawn(async move {
            if let Some(previous) = previous {
                // Resolves with a cancellation error once the old task is gone.
                let _ = previous.await;
            }
            let result = fetch_sequential(source.as_ref(), &ids).await;
            let _ = tx.send(FetchMsg::Wishlist {
                mount,
                token,
                result,
            });
        });
        view.set_task(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::FakeSource;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn at_most_one_page_in_flight() {
        let source = Arc::new(
            FakeSource::gated()
                .with_page("root", &[1, 2], Some("page2"))
                .with_page("page2", &[3], None),
        );
        let (fetcher, mut rx) = channel(source.clone(), Handle::current());
        let mut list = IncrementalList::new(1, fetcher.root_cursor());

        assert!(fetcher.request_more(&mut list));
        assert!(!fetcher.request_more(&mut list));
        assert!(!fetcher.request_more(&mut list));
        settle().await;
        assert_eq!(source.calls(), 1);
        assert_eq!(source.in_flight(), 1);

        source.release(1);
        match rx.recv().await {
            Some(FetchMsg::Page { mount, result }) => {
                assert_eq!(mount, 1);
                list.complete(result);
            }
            _ => panic!("expected a page"),
        }
        assert_eq!(list.items.len(), 2);
        assert_eq!(source.in_flight(), 0);

        assert!(fetcher.request_more(&mut list));
        source.release(1);
        if let Some(FetchMsg::Page { result, .. }) = rx.recv().await {
            list.complete(result);
        }
        assert_eq!(list.items.len(), 3);
        assert!(!list.has_more());

        assert!(!fetcher.request_more(&mut list));
        settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(
            source
                .max_in_flight
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn planet_result_carries_mount() {
        let source = Arc::new(FakeSource::new().with_planets([5]));
        let (fetcher, mut rx) = channel(source, Handle::current());

        fetcher.fetch_planet(7, "5".into());
        match rx.recv().await {
            Some(FetchMsg::Planet { mount, result }) => {
                assert_eq!(mount, 7);
                assert_eq!(result.unwrap().name, "Planet 5");
            }
            _ => panic!("expected a planet"),
        }
    }

    #[tokio::test]
    async fn dropping_the_view_stops_its_refresh() {
        let source = Arc::new(FakeSource::gated().with_planets([1, 2]));
        let (fetcher, mut rx) = channel(source.clone(), Handle::current());
        let mut view = WishlistView::new(4);

        fetcher.refresh_wishlist(&mut view, vec!["1".into(), "2".into()]);
        settle().await;
        assert_eq!(source.in_flight(), 1);

        drop(view);
        settle().await;
        source.release(2);
        settle().await;

        assert_eq!(source.calls(), 1);
        assert_eq!(source.in_flight(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn wishlist_refresh_is_tagged_with_token() {
        let source = Arc::new(FakeSource::new().with_planets([1, 3]));
        let (fetcher, mut rx) = channel(source, Handle::current());
        let mut view = WishlistView::new(4);

        fetcher.refresh_wishlist(&mut view, vec!["1".into(), "2".into(), "3".into()]);
        assert!(view.loading);

        match rx.recv().await {
            Some(FetchMsg::Wishlist {
                mount,
                token,
                result,
            }) => {
                assert_eq!(mount, 4);
                assert!(view.complete_refresh(token, result));
            }
            _ => panic!("expected a wishlist refresh"),
        }
        let names: Vec<&str> = view.current_items().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Planet 1", "Planet 3"]);
        assert!(view.error.is_some());
    }
}
