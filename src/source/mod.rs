//! Remote collection abstraction layer.
//!
//! This module defines the [`PlanetSource`] trait and the record types it
//! returns.  The concrete HTTP implementation lives in [`swapi`].
//!
//! ## For contributors — pointing at another backend
//!
//! 1. Create a new file in this directory (e.g. `mirror.rs`).
//! 2. Define a struct and implement [`PlanetSource`] for it.
//! 3. Add `mod mirror;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of [`SwapiClient`].
//!
//! The list controller, wishlist view and UI never see the concrete type.

mod planet;
mod swapi;

pub use planet::{Page, Planet};
pub use swapi::SwapiClient;

use async_trait::async_trait;

use crate::error::Result;

/// A cursor-paginated, read-only collection of planets.
///
/// Calls are made from tasks on the tokio runtime, so implementations must be
/// `Send + Sync`.  Every call is a single attempt with no caching.
#[async_trait]
pub trait PlanetSource: Send + Sync {
    /// Cursor of the first page.
    fn root_cursor(&self) -> String;

    /// Fetch the page a cursor points at.
    async fn fetch_page(&self, cursor: &str) -> Result<Page>;

    /// Fetch a single planet by its 1-based id.
    async fn fetch_by_id(&self, id: &str) -> Result<Planet>;
}
