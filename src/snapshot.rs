//! Headless `--snapshot` mode: the boards summary as JSON.

use futures::future::join3;
use serde::Serialize;

use crate::api::CollectionApi;
use crate::device::DeviceClass;
use crate::error::ApiError;
use crate::types::{BoardKind, CollectionEntry};

#[derive(Debug, Serialize)]
pub struct BoardPreview {
    pub board: BoardKind,
    pub title: &'static str,
    /// Entries shown, capped like the summary screen
    pub entries: Vec<CollectionEntry>,
    /// Size of the board before capping
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub device: &'static str,
    pub boards: Vec<BoardPreview>,
}

impl Snapshot {
    pub fn all_failed(&self) -> bool {
        self.boards.iter().all(|b| b.error.is_some())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn preview(board: BoardKind, cap: usize, result: Result<Vec<CollectionEntry>, ApiError>) -> BoardPreview {
    match result {
        Ok(mut entries) => {
            let total = entries.len();
            entries.truncate(cap);
            BoardPreview { board, title: board.title(), entries, total, error: None }
        }
        Err(e) => {
            log::error!("[snapshot] {board}: {e}");
            BoardPreview { board, title: board.title(), entries: Vec::new(), total: 0, error: Some(e.to_string()) }
        }
    }
}

/// Fetch the three boards concurrently and cap each for `class`
pub async fn fetch_snapshot(api: &dyn CollectionApi, class: DeviceClass) -> Snapshot {
    let cap = class.summary_cap();
    let (mine, wish, trade) = join3(
        api.list_board(BoardKind::MyBoard),
        api.list_board(BoardKind::Wishlist),
        api.list_board(BoardKind::Trading),
    )
    .await;

    Snapshot {
        device: class.as_str(),
        boards: vec![
            preview(BoardKind::MyBoard, cap, mine),
            preview(BoardKind::Wishlist, cap, wish),
            preview(BoardKind::Trading, cap, trade),
        ],
    }
}
