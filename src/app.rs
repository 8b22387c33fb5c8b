//! Application state: which screen is showing and the views behind it.
//!
//! The list is mounted at startup and stays mounted while a detail screen is
//! open on top of it.  The wishlist view is mounted when its screen opens and
//! dropped when the user returns to the list.  Every mount gets a fresh
//! generation number; fetch results addressed to an older generation are
//! ignored.

use tokio::sync::watch;

use crate::detail::DetailView;
use crate::fetch::{FetchMsg, Fetcher};
use crate::list::IncrementalList;
use crate::storage::Storage;
use crate::wishlist::{WishlistStore, WishlistView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
    Wishlist,
}

pub struct App<S: Storage> {
    pub screen: Screen,
    pub list: IncrementalList,
    pub detail: Option<DetailView>,
    /// Screen to return to when the detail view closes.
    detail_parent: Screen,
    pub wishlist: Option<WishlistView>,
    pub store: WishlistStore<S>,
    wishlist_rx: watch::Receiver<Vec<String>>,
    fetcher: Fetcher,
    next_mount: u64,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl<S: Storage> App<S> {
    /// Build the app around an already-hydrated store and mount the list.
    pub fn new(fetcher: Fetcher, store: WishlistStore<S>) -> Self {
        let wishlist_rx = store.subscribe();
        let list = IncrementalList::new(1, fetcher.root_cursor());
        Self {
            screen: Screen::List,
            list,
            detail: None,
            detail_parent: Screen::List,
            wishlist: None,
            store,
            wishlist_rx,
            fetcher,
            next_mount: 2,
            quit: false,
            status: "Loading planets…".into(),
        }
    }

    fn mount(&mut self) -> u64 {
        let m = self.next_mount;
        self.next_mount += 1;
        m
    }

    // -- fetch results -------------------------------------------------------

    pub fn handle_fetch(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Page { mount, result } => {
                if mount != self.list.mount {
                    tracing::debug!(mount, "discarding page for unmounted list");
                    return;
                }
                self.list.complete(result);
                self.status = match &self.list.last_error {
                    Some(e) => format!("Error: {e}"),
                    None if self.list.has_more() && self.list.total > 0 => format!(
                        "Loaded {} of {} planets",
                        self.list.items.len(),
                        self.list.total
                    ),
                    None if self.list.has_more() => {
                        format!("Loaded {} planets", self.list.items.len())
                    }
                    None => format!("All {} planets loaded", self.list.items.len()),
                };
            }
            FetchMsg::Planet { mount, result } => match &mut self.detail {
                Some(detail) if detail.mount == mount => detail.complete(result),
                _ => tracing::debug!(mount, "discarding planet for closed detail view"),
            },
            FetchMsg::Wishlist {
                mount,
                token,
                result,
            } => match &mut self.wishlist {
                Some(view) if view.mount == mount => {
                    view.complete_refresh(token, result);
                }
                _ => tracing::debug!(mount, "discarding refresh for closed wishlist"),
            },
        }
    }

    /// Render signal: keep loading while the loaded rows do not reach past
    /// the viewport.  After a failed page it stays quiet until the user
    /// scrolls or reloads.
    pub fn on_render(&mut self) {
        if self.screen == Screen::List {
            self.maybe_load_more();
        }
    }

    /// Scroll signal and render signal both end up here; the list's guard
    /// absorbs the extra calls.
    fn maybe_load_more(&mut self) {
        if self.list.wants_more() && self.fetcher.request_more(&mut self.list) {
            self.status = "Loading…".into();
        }
    }

    /// Pick up wishlist changes and refresh the wishlist view if mounted.
    pub fn sync_wishlist(&mut self) {
        if !self.wishlist_rx.has_changed().unwrap_or(false) {
            return;
        }
        let ids = self.wishlist_rx.borrow_and_update().clone();
        if let Some(view) = &mut self.wishlist {
            self.fetcher.refresh_wishlist(view, ids);
        }
    }

    // -- screens -------------------------------------------------------------

    pub fn open_detail(&mut self) {
        let id = match self.screen {
            Screen::List => self.list.selected_id(),
            Screen::Wishlist => self
                .wishlist
                .as_ref()
                .and_then(|v| v.selected_id())
                .map(String::from),
            Screen::Detail => None,
        };
        let Some(id) = id else {
            return;
        };

        let mount = self.mount();
        tracing::info!(id = %id, "opening planet");
        self.fetcher.fetch_planet(mount, id.clone());
        self.detail = Some(DetailView::new(mount, id));
        self.detail_parent = self.screen;
        self.screen = Screen::Detail;
    }

    pub fn open_wishlist(&mut self) {
        if self.screen == Screen::Wishlist {
            return;
        }
        self.detail = None;
        let mut view = WishlistView::new(self.mount());
        let ids = self.wishlist_rx.borrow_and_update().clone();
        self.fetcher.refresh_wishlist(&mut view, ids);
        self.wishlist = Some(view);
        self.screen = Screen::Wishlist;
    }

    /// Close the current screen.  Quits from the list.
    pub fn back(&mut self) {
        match self.screen {
            Screen::Detail => {
                self.detail = None;
                self.screen = self.detail_parent;
            }
            Screen::Wishlist => {
                self.wishlist = None;
                self.screen = Screen::List;
            }
            Screen::List => self.quit = true,
        }
    }

    /// Discard the loaded list and start again from the first page.
    pub fn reload(&mut self) {
        if self.screen != Screen::List {
            return;
        }
        let mount = self.mount();
        self.list = IncrementalList::new(mount, self.fetcher.root_cursor());
        self.status = "Reloading…".into();
        self.maybe_load_more();
    }

    pub fn toggle_favorite(&mut self) {
        let Some(detail) = &self.detail else {
            return;
        };
        let added = detail.toggle(&mut self.store);
        self.status = if added {
            format!("Planet {} added to wishlist", detail.id)
        } else {
            format!("Planet {} removed from wishlist", detail.id)
        };
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::List => {
                self.list.select_next();
                self.maybe_load_more();
            }
            Screen::Wishlist => {
                if let Some(v) = &mut self.wishlist {
                    v.select_next();
                }
            }
            Screen::Detail => {}
        }
    }

    pub fn select_previous(&mut self) {
        match self.screen {
            Screen::List => self.list.select_previous(),
            Screen::Wishlist => {
                if let Some(v) = &mut self.wishlist {
                    v.select_previous();
                }
            }
            Screen::Detail => {}
        }
    }

    pub fn page_down(&mut self) {
        if self.screen == Screen::List {
            self.list.page_down();
            self.maybe_load_more();
        }
    }

    pub fn page_up(&mut self) {
        if self.screen == Screen::List {
            self.list.page_up();
        }
    }

    pub fn select_first(&mut self) {
        if self.screen == Screen::List {
            self.list.select_first();
        }
    }

    pub fn select_last(&mut self) {
        if self.screen == Screen::List {
            self.list.select_last();
            self.maybe_load_more();
        }
    }

    pub fn next_page(&mut self) {
        if let (Screen::Wishlist, Some(v)) = (self.screen, &mut self.wishlist) {
            v.next_page();
        }
    }

    pub fn previous_page(&mut self) {
        if let (Screen::Wishlist, Some(v)) = (self.screen, &mut self.wishlist) {
            v.previous_page();
        }
    }

    pub fn go_to_page(&mut self, n: usize) {
        if let (Screen::Wishlist, Some(v)) = (self.screen, &mut self.wishlist) {
            v.paginate(n);
        }
    }
}
