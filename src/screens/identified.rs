//! Result of a scan: the pin the backend matched the photo to.

use super::{Action, Services};
use crate::router::Route;
use crate::scope::ViewScope;
use crate::types::{BoardKind, Identification};

pub struct IdentifiedScreen {
    services: Services,
    scope: ViewScope,
    data: Identification,
}

impl IdentifiedScreen {
    pub fn mount(services: Services, scope: ViewScope, data: Identification) -> Self {
        Self { services, scope, data }
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn data(&self) -> &Identification {
        &self.data
    }

    /// Filed entries open their detail screen, bare matches the collection
    pub fn next_route(&self) -> Route {
        match self.data.entry_id() {
            Some(id) => Route::Details { item_id: id.clone() },
            None => Route::Board(BoardKind::MyBoard),
        }
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Open => self.services.navigator.navigate_to(self.next_route()),
            Action::Retry => self.services.navigator.navigate_to(Route::Scanning),
            other => log::debug!("[identified] unhandled action {other:?}"),
        }
    }
}
