//! The wishlist store: the session's set of favorited planet ids.
//!
//! The store is the only writer of the `wishlist` storage key.  Every
//! mutation rewrites the whole set; readers get snapshots, either by calling
//! [`WishlistStore::get`] or through a [`watch`] receiver from
//! [`WishlistStore::subscribe`].

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::storage::Storage;

/// Storage key holding the JSON array of ids.
pub const WISHLIST_KEY: &str = "wishlist";

pub struct WishlistStore<S: Storage> {
    storage: S,
    /// Ids in insertion order.  The watch sender owns the set so that
    /// subscribers always see whole snapshots.
    ids: watch::Sender<Vec<String>>,
    hydrated: bool,
}

impl<S: Storage> WishlistStore<S> {
    /// An empty, not-yet-hydrated store.
    pub fn new(storage: S) -> Self {
        let (ids, _) = watch::channel(Vec::new());
        Self {
            storage,
            ids,
            hydrated: false,
        }
    }

    /// Load the persisted set.  Runs once; later calls do nothing.
    ///
    /// A missing key leaves the set empty.  Unreadable or malformed data is
    /// logged and also leaves the set empty.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;

        match self.load() {
            Ok(ids) => {
                tracing::info!(count = ids.len(), "wishlist hydrated");
                self.ids.send_replace(ids);
            }
            Err(e) => {
                tracing::warn!("Error parsing wishlist data: {e}");
                self.ids.send_replace(Vec::new());
            }
        }
    }

    fn load(&self) -> Result<Vec<String>> {
        let Some(raw) = self.storage.get_item(WISHLIST_KEY)? else {
            return Ok(Vec::new());
        };
        let parsed: Vec<String> = serde_json::from_str(&raw).map_err(Error::Parse)?;
        // Collapse duplicates a hand-edited file might contain.
        let mut ids: Vec<String> = Vec::with_capacity(parsed.len());
        for id in parsed {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Snapshot of the current favorites, in insertion order.
    pub fn get(&self) -> Vec<String> {
        self.ids.borrow().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.borrow().iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    /// Receive a fresh snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.ids.subscribe()
    }

    /// Insert `id` if absent, then persist.
    pub fn add(&mut self, id: &str) {
        self.ids.send_if_modified(|ids| {
            if ids.iter().any(|i| i == id) {
                false
            } else {
                ids.push(id.to_string());
                true
            }
        });
        self.persist();
    }

    /// Delete `id` if present, then persist.
    pub fn remove(&mut self, id: &str) {
        self.ids.send_if_modified(|ids| {
            let before = ids.len();
            ids.retain(|i| i != id);
            ids.len() != before
        });
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = self.get();
        let result = serde_json::to_string(&snapshot)
            .map_err(Error::from)
            .and_then(|json| self.storage.set_item(WISHLIST_KEY, &json));
        if let Err(e) = result {
            tracing::warn!("Failed to persist wishlist: {e}");
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
