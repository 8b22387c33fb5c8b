//! Favorites: the persistent store and the paginated screen built on it.

mod store;
mod view;

pub use store::WishlistStore;
pub use view::{fetch_sequential, Refreshed, WishlistView};
