//! Scanner: permission gate, capture, upload, hand-off to the result screen.

use std::sync::Arc;
use std::time::Duration;

use super::{Action, Services};
use crate::api::CollectionApi;
use crate::camera::{Camera, ScanError};
use crate::router::Route;
use crate::scope::ViewScope;
use crate::toast::Toast;
use crate::types::{Identification, PermissionState, ViewPayload};

pub struct ScanningScreen {
    services: Services,
    scope: ViewScope,
    permission: PermissionState,
    loading: bool,
}

/// Capture a photo and upload it for identification
async fn capture_and_identify(
    camera: Arc<dyn Camera>,
    api: Arc<dyn CollectionApi>,
    timeout: Duration,
) -> Result<Identification, ScanError> {
    let photo = camera.capture().await?;
    let payload = photo.to_payload();
    Ok(api.create_pin(&payload, timeout).await?)
}

impl ScanningScreen {
    pub fn mount(services: Services, scope: ViewScope) -> Self {
        let camera = services.camera.clone();
        scope.spawn("camera-permission", async move {
            let mut state = camera.permission().await;
            if !state.is_granted() {
                state = camera.request_permission().await;
            }
            ViewPayload::Permission(state)
        });
        Self { services, scope, permission: PermissionState::Unknown, loading: false }
    }

    pub(crate) fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Capture is only reachable with permission and no capture in flight
    pub fn can_capture(&self) -> bool {
        self.permission.is_granted() && !self.loading
    }

    pub fn request_permission(&mut self) {
        let camera = self.services.camera.clone();
        self.scope.spawn("camera-permission", async move {
            ViewPayload::Permission(camera.request_permission().await)
        });
    }

    /// Start a capture; returns false when the control is not reachable
    pub fn capture(&mut self) -> bool {
        if !self.can_capture() {
            log::debug!(
                "[scan] capture ignored (permission {:?}, loading {})",
                self.permission, self.loading
            );
            return false;
        }
        self.loading = true;
        let camera = self.services.camera.clone();
        let api = self.services.api.clone();
        let timeout = self.services.settings.upload_timeout;
        self.scope.spawn("capture", async move {
            ViewPayload::ScanFinished(capture_and_identify(camera, api, timeout).await)
        });
        true
    }

    pub fn on_payload(&mut self, payload: ViewPayload) {
        match payload {
            ViewPayload::Permission(state) => {
                log::info!("[scan] camera permission {state:?}");
                self.permission = state;
            }
            ViewPayload::ScanFinished(result) => {
                self.loading = false;
                match result {
                    Ok(data) => self.services.navigator.navigate_to(Route::Identified { data }),
                    Err(ScanError::Capture(e)) => {
                        log::error!("[scan] {e}");
                        self.services
                            .notifier
                            .notify(Toast::error("Error", "Failed to capture image"));
                    }
                    Err(ScanError::Upload(e)) => {
                        log::error!("[scan] upload failed: {e}");
                        self.services.notifier.notify(Toast::error("Upload Error", e.to_string()));
                    }
                }
            }
            other => log::debug!("[scan] unexpected payload {other:?}"),
        }
    }

    pub fn on_action(&mut self, action: Action) {
        match action {
            Action::Capture | Action::Open => {
                self.capture();
            }
            Action::RequestPermission => self.request_permission(),
            other => log::debug!("[scan] unhandled action {other:?}"),
        }
    }
}
