//! Full board: every entry of one board in a grid.

use super::{Action, Services};
use crate::device::DeviceClass;
use crate::router::Route;
use crate::scope::ViewScope;
use crate::section::{ItemCap, ListSection, RemoteSection};
use crate::types::{BoardKind, CollectionEntry, ViewPayload};

pub struct BoardScreen {
    services: Services,
    scope: ViewScope,
    board: BoardKind,
    class: DeviceClass,
    entries: ListSection<CollectionEntry>,
    cursor: usize,
}

impl BoardScreen {
    pub fn mount(services: Services, scope: ViewScope, board: BoardKind) -> Self {
        let sub = services.device.subscribe();
        let class = sub.current().class();
        scope.watch_device(sub);

        let mut screen = Self {
            services,
            scope,
            board,
            class,
            entries: RemoteSection::new(board.slug()),
            cursor: 0,
        };
        screen.reload();
        screen
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn board(&self) -> BoardKind {
        self.board
    }

    pub fn entries(&self) -> &ListSection<CollectionEntry> {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Grid columns follow the device class
    pub fn columns(&self) -> usize {
        self.class.summary_cap()
    }

    pub fn selected(&self) -> Option<&CollectionEntry> {
        self.entries.items().get(self.cursor)
    }

    pub fn reload(&mut self) {
        let ticket = self.entries.begin();
        let api = self.services.api.clone();
        let board = self.board;
        self.scope.spawn("board", async move {
            let result = api.list_board(board).await;
            ViewPayload::BoardLoaded { board, ticket, result }
        });
    }

    pub fn on_payload(&mut self, payload: ViewPayload) {
        match payload {
            ViewPayload::BoardLoaded { board, ticket, result } if board == self.board => {
                let limit = ItemCap::Unbounded.limit(self.class);
                self.entries.complete_capped(ticket, result, limit);
                self.clamp_cursor();
            }
            ViewPayload::DeviceChanged(metrics) => self.class = metrics.class(),
            other => log::debug!("[board] unexpected payload {other:?}"),
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.entries.items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn step(&mut self, delta: isize) {
        let len = self.entries.items().len();
        if len == 0 {
            return;
        }
        let next = self.cursor as isize + delta;
        if (0..len as isize).contains(&next) {
            self.cursor = next as usize;
        }
    }

    pub fn on_action(&mut self, action: Action) {
        let cols = self.columns() as isize;
        match action {
            Action::Left => self.step(-1),
            Action::Right => self.step(1),
            Action::Up => self.step(-cols),
            Action::Down => self.step(cols),
            Action::Open => {
                if let Some(entry) = self.selected() {
                    let item_id = entry.id.clone();
                    self.services.navigator.navigate_to(Route::Details { item_id });
                }
            }
            Action::Retry => self.reload(),
            other => log::debug!("[board] unhandled action {other:?}"),
        }
    }
}
