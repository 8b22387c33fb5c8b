//! Single-planet screen state.

use crate::error::Result;
use crate::source::Planet;
use crate::storage::Storage;
use crate::wishlist::WishlistStore;

pub struct DetailView {
    /// Mount generation; a late result for an earlier detail is dropped.
    pub mount: u64,
    /// 1-based planet id, also the wishlist key.
    pub id: String,
    pub planet: Option<Planet>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailView {
    /// A detail view waiting for its fetch.
    pub fn new(mount: u64, id: impl Into<String>) -> Self {
        Self {
            mount,
            id: id.into(),
            planet: None,
            loading: true,
            error: None,
        }
    }

    pub fn complete(&mut self, result: Result<Planet>) {
        self.loading = false;
        match result {
            Ok(planet) => {
                if planet.url_id().is_some_and(|u| u != self.id) {
                    tracing::debug!(
                        id = %self.id,
                        url = %planet.url,
                        "list position and resource id disagree"
                    );
                }
                self.planet = Some(planet);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(id = %self.id, "Error fetching planet details: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn is_favorited<S: Storage>(&self, store: &WishlistStore<S>) -> bool {
        store.contains(&self.id)
    }

    /// Add to or remove from the wishlist.  Returns the new membership.
    pub fn toggle<S: Storage>(&self, store: &mut WishlistStore<S>) -> bool {
        if self.is_favorited(store) {
            store.remove(&self.id);
            false
        } else {
            store.add(&self.id);
            true
        }
    }
}
