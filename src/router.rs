//! Screen routes and the deep link parser.
//!
//! Deep links use the `pinboard://v1/*` scheme and map onto [`Route`]:
//!
//! - `pinboard://v1/onboarding` - Welcome screen
//! - `pinboard://v1/boards` (also `home`, empty path) - Boards summary
//! - `pinboard://v1/board/<kind>` - Full board (`myboard`, `wishlist`, `trading`)
//! - `pinboard://v1/pin/<entry id>` - Pin details
//! - `pinboard://v1/scan` - Camera scanner
//!
//! The parser is lenient: case-insensitive scheme, single or repeated
//! slashes after the colon, `/v1/...` paths, and trailing query/fragment.
//! The identification result screen carries backend data and has no link.

use tokio::sync::mpsc::UnboundedSender;

use crate::types::{AppEvent, BoardKind, EntryId, Identification};

const SCHEME: &str = "pinboard";

/// Named screens with their typed parameters
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Onboarding,
    Boards,
    Board(BoardKind),
    Details { item_id: EntryId },
    Scanning,
    Identified { data: Identification },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Onboarding => "Onboarding",
            Route::Boards => "Boards",
            Route::Board(_) => "MyBoards",
            Route::Details { .. } => "BoardDetails",
            Route::Scanning => "Scanning",
            Route::Identified { .. } => "PinIdentified",
        }
    }

    /// Deep link for this route, when it has one
    pub fn to_link(&self) -> Option<String> {
        let path = match self {
            Route::Onboarding => "onboarding".to_string(),
            Route::Boards => "boards".to_string(),
            Route::Board(kind) => format!("board/{}", kind.slug()),
            Route::Details { item_id } => format!("pin/{}", urlencoding::encode(item_id.as_str())),
            Route::Scanning => "scan".to_string(),
            Route::Identified { .. } => return None,
        };
        Some(format!("{SCHEME}://v1/{path}"))
    }
}

/// Fire-and-forget screen transitions
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, route: Route);
}

/// Routes navigation requests through the app event channel
#[derive(Clone)]
pub struct EventNavigator {
    events: UnboundedSender<AppEvent>,
}

impl EventNavigator {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

impl Navigator for EventNavigator {
    fn navigate_to(&self, route: Route) {
        log::debug!("[router] navigate -> {}", route.name());
        let _ = self.events.send(AppEvent::Navigate(route));
    }
}

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Path after the `pinboard:` scheme (case-insensitive, any slash count)
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return None;
    }
    Some(rest.trim_start_matches('/'))
}

/// Whether a CLI argument looks like a deep link rather than a flag value
pub fn looks_like_link(arg: &str) -> bool {
    after_scheme(arg).is_some() || arg.starts_with("/v1/") || arg.starts_with("#/v1/")
}

/// Parse a deep link. Returns `None` for unknown versions or routes.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::Boards);
    }

    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else {
        s.trim_start_matches('/')
    };
    let path = strip_query_frag(path);

    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let version = segments.next()?.to_ascii_lowercase();
    if version != "v1" {
        return None;
    }

    let page = segments.next().unwrap_or("").to_ascii_lowercase();
    let route = match page.as_str() {
        "" | "home" | "boards" => Route::Boards,
        "onboarding" | "welcome" => Route::Onboarding,
        "scan" | "scanning" => Route::Scanning,
        "board" => Route::Board(BoardKind::from_slug(segments.next()?)?),
        "pin" => {
            let raw_id = segments.next()?;
            let id = urlencoding::decode(raw_id).ok()?.into_owned();
            if id.is_empty() {
                return None;
            }
            Route::Details { item_id: EntryId::new(id) }
        }
        _ => return None,
    };
    Some(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let expected = Route::Details { item_id: EntryId::new("42") };
        assert_eq!(parse("pinboard://v1/pin/42"), Some(expected.clone()));
        assert_eq!(parse("#/v1/pin/42"), Some(expected.clone()));
        assert_eq!(parse("/v1/pin/42"), Some(expected));
    }

    #[test]
    fn test_parse_board() {
        assert_eq!(parse("pinboard://v1/board/wishlist"), Some(Route::Board(BoardKind::Wishlist)));
        assert_eq!(parse("pinboard://v1/board/TRADING"), Some(Route::Board(BoardKind::Trading)));
        assert_eq!(parse("pinboard://v1/board/myboard"), Some(Route::Board(BoardKind::MyBoard)));
    }

    #[test]
    fn test_parse_home_variants() {
        assert_eq!(parse("pinboard://v1/boards"), Some(Route::Boards));
        assert_eq!(parse("pinboard://v1/"), Some(Route::Boards));
        assert_eq!(parse("pinboard://v1"), Some(Route::Boards));
        assert_eq!(parse(""), Some(Route::Boards));
        assert_eq!(parse("pinboard://v1/onboarding"), Some(Route::Onboarding));
        assert_eq!(parse("pinboard://v1/scan"), Some(Route::Scanning));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("pinboard://v2/pin/1").is_none());
        assert!(parse("pinboard://v1/pin/").is_none());
        assert!(parse("pinboard://v1/board/attic").is_none());
        assert!(parse("pinboard://v1/unknown/test").is_none());
        assert!(parse("nearx://v1/pin/1").is_none());
    }

    #[test]
    fn test_parse_scheme_variants() {
        let expected = Some(Route::Details { item_id: EntryId::new("7") });
        assert_eq!(parse("PINBOARD://v1/pin/7"), expected);
        assert_eq!(parse("pinboard:/v1/pin/7"), expected);
        assert_eq!(parse("pinboard:////v1/pin/7"), expected);
        assert_eq!(parse("pinboard://v1/pin/7?utm=1#frag"), expected);
    }

    #[test]
    fn test_links() {
        let details = Route::Details { item_id: EntryId::new("a b") };
        assert_eq!(details.to_link().as_deref(), Some("pinboard://v1/pin/a%20b"));
        assert_eq!(parse("pinboard://v1/pin/a%20b"), Some(details));
        assert!(looks_like_link("pinboard://v1/scan"));
        assert!(!looks_like_link("--demo"));

        let identified = Route::Identified {
            data: serde_json::from_str(r#"{"id": "p1"}"#).unwrap(),
        };
        assert!(identified.to_link().is_none());
    }
}
