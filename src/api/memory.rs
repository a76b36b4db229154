//! In-memory stand-in for the pin backend.
//!
//! Used by `--demo` and by the test suites. Latency and failures can be
//! injected per operation so timing and error paths are reproducible.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{pin_details_path, CollectionApi};
use crate::error::ApiError;
use crate::types::{BoardKind, CollectionEntry, EntryId, Identification, ImagePayload, Pin};

/// Operation selector for injected latency/failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    List(BoardKind),
    Detail,
    Delete,
    Move,
    Create,
}

#[derive(Default)]
struct State {
    entries: Vec<CollectionEntry>,
    next_id: u64,
    latency: HashMap<Op, Duration>,
    failures: HashMap<Op, ApiError>,
    calls: HashMap<Op, usize>,
    uploads: Vec<ImagePayload>,
}

#[derive(Default)]
pub struct InMemoryCollection {
    state: Mutex<State>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small seeded collection for demo mode
    pub fn demo() -> Self {
        let store = Self::new();
        let seed = [
            ("Stitch Surfing", "Hawaiian Holidays", BoardKind::MyBoard),
            ("Figment Paint Can", "EPCOT Festival", BoardKind::MyBoard),
            ("Haunted Mansion Ticket", "Attraction Tickets", BoardKind::MyBoard),
            ("Tinker Bell Lantern", "Pixie Hollow", BoardKind::Wishlist),
            ("Orange Bird Sipper", "Adventureland", BoardKind::Wishlist),
            ("Mickey Steamboat", "Classics", BoardKind::Trading),
        ];
        for (name, series, board) in seed {
            let pin = Pin {
                id: String::new(),
                name: Some(name.to_string()),
                series: Some(series.to_string()),
                origin: Some("Walt Disney World".to_string()),
                edition: Some("Limited Edition 2000".to_string()),
                release_date: Some("2023-05-01".to_string()),
                original_price: Some("$17.99".to_string()),
                image_url: None,
            };
            store.insert(pin, board);
        }
        store
    }

    /// Add an entry; pin and entry ids are assigned here
    pub fn insert(&self, mut pin: Pin, board: BoardKind) -> EntryId {
        let mut st = self.lock();
        st.next_id += 1;
        let n = st.next_id;
        if pin.id.is_empty() {
            pin.id = format!("pin-{n}");
        }
        let id = EntryId::new(n.to_string());
        st.entries.push(CollectionEntry { id: id.clone(), pin, board: Some(board) });
        id
    }

    /// Delay every call of `op` by `delay`
    pub fn set_latency(&self, op: Op, delay: Duration) {
        self.lock().latency.insert(op, delay);
    }

    /// Make every call of `op` fail with `err` until cleared
    pub fn fail(&self, op: Op, err: ApiError) {
        self.lock().failures.insert(op, err);
    }

    pub fn clear_failure(&self, op: Op) {
        self.lock().failures.remove(&op);
    }

    /// Number of calls made for `op`, including failed ones
    pub fn calls(&self, op: Op) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn uploads(&self) -> Vec<ImagePayload> {
        self.lock().uploads.clone()
    }

    pub fn board_of(&self, id: &EntryId) -> Option<BoardKind> {
        self.lock().entries.iter().find(|e| &e.id == id).and_then(|e| e.board)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicked test thread must not wedge the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call, then apply injected latency and failure
    async fn enter(&self, op: Op) -> Result<(), ApiError> {
        let (delay, failure) = {
            let mut st = self.lock();
            *st.calls.entry(op).or_default() += 1;
            (st.latency.get(&op).copied(), st.failures.get(&op).cloned())
        };
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionApi for InMemoryCollection {
    async fn list_board(&self, board: BoardKind) -> Result<Vec<CollectionEntry>, ApiError> {
        self.enter(Op::List(board)).await?;
        Ok(self
            .lock()
            .entries
            .iter()
            .filter(|e| e.board == Some(board))
            .cloned()
            .collect())
    }

    async fn pin_detail(&self, id: &EntryId) -> Result<Pin, ApiError> {
        self.enter(Op::Detail).await?;
        self.lock()
            .entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.pin.clone())
            .ok_or_else(|| ApiError::NotFound { path: pin_details_path(id) })
    }

    async fn delete_pin(&self, id: &EntryId) -> Result<(), ApiError> {
        self.enter(Op::Delete).await?;
        let mut st = self.lock();
        let before = st.entries.len();
        st.entries.retain(|e| &e.id != id);
        if st.entries.len() == before {
            return Err(ApiError::NotFound { path: pin_details_path(id) });
        }
        Ok(())
    }

    async fn move_pin(&self, id: &EntryId, to: BoardKind) -> Result<(), ApiError> {
        self.enter(Op::Move).await?;
        let mut st = self.lock();
        match st.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.board = Some(to);
                Ok(())
            }
            None => Err(ApiError::NotFound { path: pin_details_path(id) }),
        }
    }

    async fn create_pin(
        &self,
        image: &ImagePayload,
        timeout: Duration,
    ) -> Result<Identification, ApiError> {
        let identified = tokio::time::timeout(timeout, self.enter(Op::Create))
            .await
            .map_err(|_| ApiError::Timeout(timeout))?;
        identified?;
        if !image.image.starts_with("data:image/") {
            return Err(ApiError::Server { status: 400, message: "image must be a data URI".into() });
        }
        self.lock().uploads.push(image.clone());
        let n = self.lock().next_id + 1;
        let pin = Pin {
            id: String::new(),
            name: Some(format!("Identified Pin #{n}")),
            series: None,
            origin: None,
            edition: None,
            release_date: None,
            original_price: None,
            image_url: None,
        };
        let id = self.insert(pin, BoardKind::MyBoard);
        let st = self.lock();
        let entry = st
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Decode("created entry vanished".into()))?;
        Ok(Identification::Entry(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_move_changes_membership_without_duplicating() {
        let store = InMemoryCollection::demo();
        let mine = store.list_board(BoardKind::MyBoard).await.unwrap();
        let id = mine[0].id.clone();

        store.move_pin(&id, BoardKind::Trading).await.unwrap();

        let mine_after = store.list_board(BoardKind::MyBoard).await.unwrap();
        let trading = store.list_board(BoardKind::Trading).await.unwrap();
        assert!(mine_after.iter().all(|e| e.id != id));
        assert_eq!(trading.iter().filter(|e| e.id == id).count(), 1);
        assert_eq!(store.board_of(&id), Some(BoardKind::Trading));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryCollection::new();
        let err = store.delete_pin(&EntryId::new("404")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_injected_failure_counts_call() {
        let store = InMemoryCollection::demo();
        store.fail(Op::List(BoardKind::Wishlist), ApiError::Network("offline".into()));
        assert!(store.list_board(BoardKind::Wishlist).await.is_err());
        assert_eq!(store.calls(Op::List(BoardKind::Wishlist)), 1);
        store.clear_failure(Op::List(BoardKind::Wishlist));
        assert_eq!(store.list_board(BoardKind::Wishlist).await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_respects_timeout() {
        let store = InMemoryCollection::new();
        store.set_latency(Op::Create, Duration::from_secs(45));
        let payload = ImagePayload { image: "data:image/jpeg;base64,AAAA".into() };
        let err = store
            .create_pin(&payload, Duration::from_secs(30))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout(Duration::from_secs(30)));
    }
}
