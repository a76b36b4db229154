use super::{Action, Services};
use crate::router::Route;
use crate::scope::ViewScope;

pub const HEADLINE: &str = "Scan, collect and trade your pins";
pub const BODY: &str =
    "Point the camera at a pin to identify it, then keep it on your board, wish for it, or trade it.";

pub struct OnboardingScreen {
    services: Services,
    scope: ViewScope,
}

impl OnboardingScreen {
    pub fn mount(services: Services, scope: ViewScope) -> Self {
        Self { services, scope }
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Open | Action::Confirm => self.services.navigator.navigate_to(Route::Boards),
            other => log::debug!("[onboarding] unhandled action {other:?}"),
        }
    }
}
