//! Boards summary: a short preview of each of the three boards.

use super::{Action, Services};
use crate::device::DeviceClass;
use crate::router::Route;
use crate::scope::ViewScope;
use crate::section::{ItemCap, ListSection, RemoteSection};
use crate::types::{BoardKind, CollectionEntry, ViewPayload};

pub struct BoardsScreen {
    services: Services,
    scope: ViewScope,
    class: DeviceClass,
    sections: [ListSection<CollectionEntry>; 3],
    selected: usize,
}

fn index_of(board: BoardKind) -> usize {
    match board {
        BoardKind::MyBoard => 0,
        BoardKind::Wishlist => 1,
        BoardKind::Trading => 2,
    }
}

impl BoardsScreen {
    pub fn mount(services: Services, scope: ViewScope) -> Self {
        let sub = services.device.subscribe();
        let class = sub.current().class();
        scope.watch_device(sub);

        let mut screen = Self {
            services,
            scope,
            class,
            sections: [
                RemoteSection::new("myboard"),
                RemoteSection::new("wishlist"),
                RemoteSection::new("trading"),
            ],
            selected: 0,
        };
        screen.refresh();
        screen
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn device_class(&self) -> DeviceClass {
        self.class
    }

    pub fn section(&self, board: BoardKind) -> &ListSection<CollectionEntry> {
        &self.sections[index_of(board)]
    }

    pub fn selected_board(&self) -> BoardKind {
        BoardKind::ALL[self.selected]
    }

    /// Fetch all three boards; each resolves on its own
    pub fn refresh(&mut self) {
        for board in BoardKind::ALL {
            self.load_section(board);
        }
    }

    pub fn load_section(&mut self, board: BoardKind) {
        let ticket = self.sections[index_of(board)].begin();
        let api = self.services.api.clone();
        self.scope.spawn("board-preview", async move {
            let result = api.list_board(board).await;
            ViewPayload::BoardLoaded { board, ticket, result }
        });
    }

    pub fn on_payload(&mut self, payload: ViewPayload) {
        match payload {
            ViewPayload::BoardLoaded { board, ticket, result } => {
                let limit = ItemCap::ByDevice.limit(self.class);
                // Failures fall back to the empty-state render; the section logs them
                self.sections[index_of(board)].complete_capped(ticket, result, limit);
            }
            ViewPayload::DeviceChanged(metrics) => {
                let class = metrics.class();
                if class != self.class {
                    log::info!("[boards] device class {:?} -> {:?}, reloading", self.class, class);
                    self.class = class;
                    self.refresh();
                }
            }
            other => log::debug!("[boards] unexpected payload {other:?}"),
        }
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Up => self.selected = self.selected.saturating_sub(1),
            Action::Down => self.selected = (self.selected + 1).min(BoardKind::ALL.len() - 1),
            Action::Open => {
                let board = self.selected_board();
                self.services.navigator.navigate_to(Route::Board(board));
            }
            Action::Retry => self.refresh(),
            other => log::debug!("[boards] unhandled action {other:?}"),
        }
    }
}
