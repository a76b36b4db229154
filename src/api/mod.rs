//! Pin collection API.
//!
//! Screens talk to the backend only through [`CollectionApi`]. The HTTP
//! implementation issues one request per call against the fixed
//! `/api/pins/...` endpoints; the in-memory one backs demo mode and tests.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ApiError;
use crate::types::{BoardKind, CollectionEntry, EntryId, Identification, ImagePayload, Pin};

mod http;
pub mod memory;

pub use http::{HttpCollectionClient, HttpSettings};
pub use memory::InMemoryCollection;

pub const CREATE_PIN_PATH: &str = "/api/pins/create-pin/";

/// Detail/delete/move path for one entry, id percent-encoded
pub fn pin_details_path(id: &EntryId) -> String {
    format!("/api/pins/pin-details/{}/", urlencoding::encode(id.as_str()))
}

#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// List every entry on a board
    async fn list_board(&self, board: BoardKind) -> Result<Vec<CollectionEntry>, ApiError>;

    /// Fetch the pin behind an entry
    async fn pin_detail(&self, id: &EntryId) -> Result<Pin, ApiError>;

    /// Remove an entry from the collection
    async fn delete_pin(&self, id: &EntryId) -> Result<(), ApiError>;

    /// Change the board an entry belongs to
    async fn move_pin(&self, id: &EntryId, to: BoardKind) -> Result<(), ApiError>;

    /// Upload a photo for identification; `timeout` caps the whole request
    async fn create_pin(
        &self,
        image: &ImagePayload,
        timeout: Duration,
    ) -> Result<Identification, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_details_path_encodes_id() {
        assert_eq!(pin_details_path(&EntryId::new("42")), "/api/pins/pin-details/42/");
        assert_eq!(
            pin_details_path(&EntryId::new("a/b c")),
            "/api/pins/pin-details/a%2Fb%20c/"
        );
    }
}
