use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;
use crate::router::Route;
use crate::scope::ViewId;
use crate::section::Ticket;
use crate::toast::Toast;

/// Identifier of a collection entry (distinct from the catalog pin id)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(#[serde(deserialize_with = "crate::util_text::string_or_number")] pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        EntryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog pin record. The client only reads these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(deserialize_with = "crate::util_text::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub series: Option<String>,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub edition: Option<String>,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "crate::util_text::opt_string_or_number")]
    pub original_price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Pin {
    /// Label/value pairs in the order the detail screen shows them
    pub fn detail_rows(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Name", self.name.as_deref()),
            ("Series", self.series.as_deref()),
            ("Origin", self.origin.as_deref()),
            ("Edition", self.edition.as_deref()),
            ("Release Date", self.release_date.as_deref()),
            ("Original Price", self.original_price.as_deref()),
        ]
    }
}

/// The three mutually exclusive boards an entry can live on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardKind {
    #[serde(rename = "myboard")]
    MyBoard,
    #[serde(rename = "wishlist")]
    Wishlist,
    #[serde(rename = "trading")]
    Trading,
}

impl BoardKind {
    pub const ALL: [BoardKind; 3] = [BoardKind::MyBoard, BoardKind::Wishlist, BoardKind::Trading];

    /// Collection endpoint listing this board
    pub fn endpoint(self) -> &'static str {
        match self {
            BoardKind::MyBoard => "/api/pins/user-collection/",
            BoardKind::Wishlist => "/api/pins/wishlist/",
            BoardKind::Trading => "/api/pins/trading-board/",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BoardKind::MyBoard => "My Pin Board",
            BoardKind::Wishlist => "My Wish Board",
            BoardKind::Trading => "My Trading Board",
        }
    }

    /// Wire name, also used in deep links
    pub fn slug(self) -> &'static str {
        match self {
            BoardKind::MyBoard => "myboard",
            BoardKind::Wishlist => "wishlist",
            BoardKind::Trading => "trading",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "myboard" | "my-board" | "collection" => Some(BoardKind::MyBoard),
            "wishlist" | "wish" => Some(BoardKind::Wishlist),
            "trading" | "trading-board" => Some(BoardKind::Trading),
            _ => None,
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A pin's membership record on one board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: EntryId,
    pub pin: Pin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardKind>,
}

/// Backend answer to an uploaded photo. Entries are tried first since a
/// bare pin has no `pin` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identification {
    Entry(CollectionEntry),
    Pin(Pin),
}

impl Identification {
    pub fn pin(&self) -> &Pin {
        match self {
            Identification::Entry(e) => &e.pin,
            Identification::Pin(p) => p,
        }
    }

    /// Entry id when the backend already filed the pin on a board
    pub fn entry_id(&self) -> Option<&EntryId> {
        match self {
            Identification::Entry(e) => Some(&e.id),
            Identification::Pin(_) => None,
        }
    }
}

/// JSON body of the create-pin upload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImagePayload {
    pub image: String,
}

/// JSON body of the move request
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub board: BoardKind,
}

/// Camera permission as reported by the device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionState {
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

/// Results produced by view-scoped tasks, delivered back to the mounted screen
#[derive(Debug)]
pub enum ViewPayload {
    BoardLoaded {
        board: BoardKind,
        ticket: Ticket,
        result: Result<Vec<CollectionEntry>, ApiError>,
    },
    PinLoaded {
        ticket: Ticket,
        result: Result<Pin, ApiError>,
    },
    PinRemoved {
        result: Result<(), ApiError>,
    },
    PinMoved {
        to: BoardKind,
        result: Result<(), ApiError>,
    },
    Permission(PermissionState),
    ScanFinished(Result<Identification, crate::camera::ScanError>),
    DeviceChanged(crate::device::DeviceMetrics),
}

#[derive(Debug)]
pub enum AppEvent {
    View { view: ViewId, payload: ViewPayload },
    Navigate(Route),
    Toast(Toast),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accepts_numeric_ids() {
        let raw = r#"{"id": 12, "pin": {"id": 7, "name": "Stitch", "original_price": 14.99}}"#;
        let entry: CollectionEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, EntryId::new("12"));
        assert_eq!(entry.pin.id, "7");
        assert_eq!(entry.pin.original_price.as_deref(), Some("14.99"));
        assert_eq!(entry.board, None);
    }

    #[test]
    fn test_identification_prefers_entry() {
        let raw = r#"{"id": "e1", "board": "myboard", "pin": {"id": "p1"}}"#;
        let ident: Identification = serde_json::from_str(raw).unwrap();
        assert_eq!(ident.entry_id(), Some(&EntryId::new("e1")));
        assert_eq!(ident.pin().id, "p1");

        let raw = r#"{"id": "p2", "name": "Figment", "image_url": null}"#;
        let ident: Identification = serde_json::from_str(raw).unwrap();
        assert!(ident.entry_id().is_none());
        assert_eq!(ident.pin().name.as_deref(), Some("Figment"));
    }

    #[test]
    fn test_board_slugs() {
        for board in BoardKind::ALL {
            assert_eq!(BoardKind::from_slug(board.slug()), Some(board));
        }
        assert_eq!(
            serde_json::to_string(&MoveRequest { board: BoardKind::Trading }).unwrap(),
            r#"{"board":"trading"}"#
        );
        assert!(BoardKind::from_slug("attic").is_none());
    }
}
