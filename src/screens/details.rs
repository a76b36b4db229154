//! Pin details: one pin with retry, remove and move-to-board actions.

use super::{Action, Services};
use crate::error::ApiError;
use crate::router::Route;
use crate::scope::ViewScope;
use crate::section::{Applied, RemoteSection};
use crate::toast::Toast;
use crate::types::{BoardKind, EntryId, Pin, ViewPayload};

pub struct DetailsScreen {
    services: Services,
    scope: ViewScope,
    item_id: EntryId,
    pin: RemoteSection<Pin>,
    confirm_remove: bool,
    removing: bool,
    moving: Option<BoardKind>,
}

impl DetailsScreen {
    pub fn mount(services: Services, scope: ViewScope, item_id: EntryId) -> Self {
        let mut screen = Self {
            services,
            scope,
            item_id,
            pin: RemoteSection::new("pin-details"),
            confirm_remove: false,
            removing: false,
            moving: None,
        };
        screen.load();
        screen
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn item_id(&self) -> &EntryId {
        &self.item_id
    }

    pub fn pin(&self) -> &RemoteSection<Pin> {
        &self.pin
    }

    /// Message for the error state; the screen offers a retry next to it
    pub fn error_message(&self) -> Option<String> {
        self.pin
            .error()
            .map(|e| format!("Failed to load pin details. {}", e.user_message()))
    }

    pub fn confirm_remove_visible(&self) -> bool {
        self.confirm_remove
    }

    pub fn is_removing(&self) -> bool {
        self.removing
    }

    pub fn moving_to(&self) -> Option<BoardKind> {
        self.moving
    }

    pub fn move_enabled(&self) -> bool {
        self.services.settings.move_enabled
    }

    pub fn load(&mut self) {
        let ticket = self.pin.begin();
        let api = self.services.api.clone();
        let id = self.item_id.clone();
        self.scope.spawn("pin-details", async move {
            let result = api.pin_detail(&id).await;
            ViewPayload::PinLoaded { ticket, result }
        });
    }

    /// Issue the DELETE. Nothing is removed locally until the backend agrees.
    pub fn remove(&mut self) {
        if self.removing {
            return;
        }
        self.removing = true;
        let api = self.services.api.clone();
        let id = self.item_id.clone();
        self.scope.spawn("remove-pin", async move {
            let result = api.delete_pin(&id).await;
            ViewPayload::PinRemoved { result }
        });
    }

    pub fn move_to(&mut self, to: BoardKind) {
        if !self.services.settings.move_enabled {
            self.services
                .notifier
                .notify(Toast::error("Move Unavailable", "Moving pins between boards is disabled"));
            return;
        }
        if self.moving.is_some() {
            return;
        }
        self.moving = Some(to);
        let api = self.services.api.clone();
        let id = self.item_id.clone();
        self.scope.spawn("move-pin", async move {
            let result = api.move_pin(&id, to).await;
            ViewPayload::PinMoved { to, result }
        });
    }

    pub fn on_payload(&mut self, payload: ViewPayload) {
        match payload {
            ViewPayload::PinLoaded { ticket, result } => {
                if self.pin.complete(ticket, result) == Applied::Failed {
                    self.services
                        .notifier
                        .notify(Toast::error("Error", "Failed to load pin details"));
                }
            }
            ViewPayload::PinRemoved { result } => {
                self.removing = false;
                self.on_removed(result);
            }
            ViewPayload::PinMoved { to, result } => {
                self.moving = None;
                match result {
                    Ok(()) => self
                        .services
                        .notifier
                        .notify(Toast::done("Pin Moved", format!("Pin moved to {}", to.title()))),
                    Err(e) => {
                        log::error!("[details] move {} -> {to} failed: {e}", self.item_id);
                        self.services.notifier.notify(Toast::error(
                            "Error",
                            format!("Failed to move pin. {}", e.user_message()),
                        ));
                    }
                }
            }
            other => log::debug!("[details] unexpected payload {other:?}"),
        }
    }

    fn on_removed(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.services
                    .notifier
                    .notify(Toast::done("Success", "Pin removed successfully!"));
                self.services
                    .navigator
                    .navigate_to(Route::Board(BoardKind::MyBoard));
            }
            Err(e) => {
                log::error!("[details] removing {} failed: {e}", self.item_id);
                self.services.notifier.notify(Toast::error(
                    "Error",
                    format!("Failed to remove pin. {}", e.user_message()),
                ));
            }
        }
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Retry if !self.pin.is_loading() => self.load(),
            Action::Remove => self.confirm_remove = true,
            Action::Cancel => self.confirm_remove = false,
            Action::Confirm if self.confirm_remove => {
                self.confirm_remove = false;
                self.remove();
            }
            Action::MoveTo(board) => self.move_to(board),
            other => log::debug!("[details] unhandled action {other:?}"),
        }
    }
}
