//! Screen controllers.
//!
//! Each screen owns its sections and a [`ViewScope`]; rendering reads the
//! state through getters and input arrives as [`Action`]s, so nothing here
//! depends on the terminal front-end.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::CollectionApi;
use crate::camera::Camera;
use crate::device::DeviceMetricsSource;
use crate::router::{EventNavigator, Navigator, Route};
use crate::scope::{ViewId, ViewScope};
use crate::toast::{EventNotifier, Notifier};
use crate::types::{AppEvent, BoardKind, ViewPayload};

pub mod board;
pub mod boards;
pub mod details;
pub mod identified;
pub mod onboarding;
pub mod scanning;

pub use board::BoardScreen;
pub use boards::BoardsScreen;
pub use details::DetailsScreen;
pub use identified::IdentifiedScreen;
pub use onboarding::OnboardingScreen;
pub use scanning::ScanningScreen;

#[derive(Clone, Copy, Debug)]
pub struct ScreenSettings {
    /// When false the move affordance refuses without calling the backend
    pub move_enabled: bool,
    /// Ceiling for the photo upload request
    pub upload_timeout: Duration,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self { move_enabled: true, upload_timeout: Duration::from_secs(30) }
    }
}

/// Collaborators every screen may use
#[derive(Clone)]
pub struct Services {
    pub api: Arc<dyn CollectionApi>,
    pub camera: Arc<dyn Camera>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub device: DeviceMetricsSource,
    pub settings: ScreenSettings,
}

impl Services {
    /// Navigation and toasts go back to the app through `events`
    pub fn new(
        api: Arc<dyn CollectionApi>,
        camera: Arc<dyn Camera>,
        device: DeviceMetricsSource,
        settings: ScreenSettings,
        events: &UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            camera,
            navigator: Arc::new(EventNavigator::new(events.clone())),
            notifier: Arc::new(EventNotifier::new(events.clone())),
            device,
            settings,
        }
    }
}

/// Input-agnostic user intents
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Open,
    Retry,
    Remove,
    Confirm,
    Cancel,
    MoveTo(BoardKind),
    Capture,
    RequestPermission,
    Go(Route),
    Back,
    Quit,
}

/// The mounted screen
pub enum ActiveScreen {
    Onboarding(OnboardingScreen),
    Boards(BoardsScreen),
    Board(BoardScreen),
    Details(DetailsScreen),
    Scanning(ScanningScreen),
    Identified(IdentifiedScreen),
}

impl ActiveScreen {
    /// Build the controller for `route`; mounting starts its initial fetches
    pub fn mount(route: Route, services: Services, scope: ViewScope) -> Self {
        match route {
            Route::Onboarding => ActiveScreen::Onboarding(OnboardingScreen::mount(services, scope)),
            Route::Boards => ActiveScreen::Boards(BoardsScreen::mount(services, scope)),
            Route::Board(kind) => ActiveScreen::Board(BoardScreen::mount(services, scope, kind)),
            Route::Details { item_id } => {
                ActiveScreen::Details(DetailsScreen::mount(services, scope, item_id))
            }
            Route::Scanning => ActiveScreen::Scanning(ScanningScreen::mount(services, scope)),
            Route::Identified { data } => {
                ActiveScreen::Identified(IdentifiedScreen::mount(services, scope, data))
            }
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.scope().id()
    }

    fn scope(&self) -> &ViewScope {
        match self {
            ActiveScreen::Onboarding(s) => s.scope(),
            ActiveScreen::Boards(s) => s.scope(),
            ActiveScreen::Board(s) => s.scope(),
            ActiveScreen::Details(s) => s.scope(),
            ActiveScreen::Scanning(s) => s.scope(),
            ActiveScreen::Identified(s) => s.scope(),
        }
    }

    pub fn on_payload(&mut self, payload: ViewPayload) {
        match self {
            ActiveScreen::Onboarding(_) | ActiveScreen::Identified(_) => {
                log::debug!("[screen] ignoring {payload:?} on a static screen");
            }
            ActiveScreen::Boards(s) => s.on_payload(payload),
            ActiveScreen::Board(s) => s.on_payload(payload),
            ActiveScreen::Details(s) => s.on_payload(payload),
            ActiveScreen::Scanning(s) => s.on_payload(payload),
        }
    }

    pub fn on_action(&mut self, action: Action) {
        match self {
            ActiveScreen::Onboarding(s) => s.on_action(action),
            ActiveScreen::Boards(s) => s.on_action(action),
            ActiveScreen::Board(s) => s.on_action(action),
            ActiveScreen::Details(s) => s.on_action(action),
            ActiveScreen::Scanning(s) => s.on_action(action),
            ActiveScreen::Identified(s) => s.on_action(action),
        }
    }
}
