use tokio::sync::mpsc::UnboundedSender;

use crate::device::DeviceMetricsSource;
use crate::router::Route;
use crate::scope::{ViewId, ViewScope};
use crate::screens::{Action, ActiveScreen, Services};
use crate::toast::{Toast, ToastSlot};
use crate::types::AppEvent;

/// Application shell: owns the mounted screen and the navigation stack.
///
/// Async results come back as [`AppEvent`]s through the channel whose
/// sender is handed to every view scope; [`App::handle_event`] routes them
/// to the mounted screen and drops anything addressed to an unmounted one.
pub struct App {
    services: Services,
    events: UnboundedSender<AppEvent>,
    route: Route,
    screen: ActiveScreen,
    back_stack: Vec<Route>,
    next_view: u64,
    toast: ToastSlot,
    quit: bool,
    fps: u32,
}

impl App {
    /// Mount `start`. Must run inside a tokio runtime (mounting spawns fetches).
    pub fn new(services: Services, events: UnboundedSender<AppEvent>, start: Route, fps: u32) -> Self {
        let scope = ViewScope::new(ViewId(1), events.clone());
        let screen = ActiveScreen::mount(start.clone(), services.clone(), scope);
        log::info!("[app] start screen {}", start.name());
        Self {
            services,
            events,
            route: start,
            screen,
            back_stack: Vec::new(),
            next_view: 2,
            toast: ToastSlot::default(),
            quit: false,
            fps,
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 { self.fps }
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn route(&self) -> &Route { &self.route }
    pub fn screen(&self) -> &ActiveScreen { &self.screen }
    pub fn view_id(&self) -> ViewId { self.screen.view_id() }
    pub fn can_go_back(&self) -> bool { !self.back_stack.is_empty() }
    pub fn device(&self) -> &DeviceMetricsSource { &self.services.device }

    /// Toast still inside its display window
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.active()
    }

    /// Most recent toast, expired or not
    pub fn last_toast(&self) -> Option<&Toast> {
        self.toast.last()
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast.show(toast);
    }

    /// Replace the mounted screen. Navigating to a route already on the
    /// stack pops back to it instead of stacking a duplicate.
    pub fn navigate(&mut self, route: Route) {
        if let Some(pos) = self.back_stack.iter().position(|r| r == &route) {
            self.back_stack.truncate(pos);
        } else if route != self.route {
            self.back_stack.push(self.route.clone());
        }
        self.replace_screen(route);
    }

    /// Return to the previous screen; false at the root
    pub fn back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(route) => {
                self.replace_screen(route);
                true
            }
            None => false,
        }
    }

    fn replace_screen(&mut self, route: Route) {
        let view = ViewId(self.next_view);
        self.next_view += 1;
        log::info!("[app] {} -> {} ({view})", self.route.name(), route.name());
        let scope = ViewScope::new(view, self.events.clone());
        // Old screen drops here, cancelling everything its scope started
        self.screen = ActiveScreen::mount(route.clone(), self.services.clone(), scope);
        self.route = route;
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::View { view, payload } => {
                if view == self.screen.view_id() {
                    self.screen.on_payload(payload);
                } else {
                    log::debug!("[app] dropping result for unmounted {view}");
                }
            }
            AppEvent::Navigate(route) => self.navigate(route),
            AppEvent::Toast(toast) => self.show_toast(toast),
            AppEvent::Quit => self.quit = true,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Go(route) => self.navigate(route),
            Action::Back => {
                self.back();
            }
            Action::Quit => self.quit = true,
            other => self.screen.on_action(other),
        }
    }
}
