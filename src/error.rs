//! Error taxonomy shared by the fetch, storage and wishlist layers.
//!
//! None of these are fatal.  Every caller logs the error and falls back to a
//! degraded view (empty list, empty wishlist, an omitted item).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, or a body that could not be decoded.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The durable wishlist payload is not a JSON array of ids.
    #[error("malformed wishlist data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Some wishlist items failed to load while others succeeded.
    #[error("{} of {requested} wishlist items failed to load ({})", .failed.len(), .failed.join(", "))]
    PartialFetch { failed: Vec<String>, requested: usize },

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the errors that count as a network failure.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
