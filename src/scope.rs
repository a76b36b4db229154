//! Lifetime scope of a mounted view.
//!
//! Every async operation a screen starts runs under its scope's
//! cancellation token. Unmounting drops the scope, which cancels the token:
//! in-flight tasks stop and nothing they would have produced reaches the
//! event channel.

use std::fmt;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::device::DeviceSubscription;
use crate::types::{AppEvent, ViewPayload};

/// Identity of one mount of one screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

pub struct ViewScope {
    id: ViewId,
    token: CancellationToken,
    events: UnboundedSender<AppEvent>,
}

impl ViewScope {
    pub fn new(id: ViewId, events: UnboundedSender<AppEvent>) -> Self {
        Self { id, token: CancellationToken::new(), events }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token for work that must stop with the view
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Run `fut` on the runtime and deliver its payload to this view, unless
    /// the view is unmounted first.
    pub fn spawn<F>(&self, label: &'static str, fut: F)
    where
        F: Future<Output = ViewPayload> + Send + 'static,
    {
        let token = self.token.clone();
        let events = self.events.clone();
        let view = self.id;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::debug!("[scope] {view} {label} cancelled before completion");
                }
                payload = fut => {
                    if token.is_cancelled() {
                        log::debug!("[scope] {view} {label} finished after unmount, discarded");
                        return;
                    }
                    if events.send(AppEvent::View { view, payload }).is_err() {
                        log::debug!("[scope] {view} {label} finished after app shutdown");
                    }
                }
            }
        });
    }

    /// Forward device metric changes to this view until it unmounts. The
    /// subscription is released when the forwarding task ends.
    pub fn watch_device(&self, mut sub: DeviceSubscription) {
        let token = self.token.clone();
        let events = self.events.clone();
        let view = self.id;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    next = sub.changed() => {
                        let Some(metrics) = next else { break };
                        let payload = ViewPayload::DeviceChanged(metrics);
                        if events.send(AppEvent::View { view, payload }).is_err() {
                            break;
                        }
                    }
                }
            }
            log::debug!("[scope] {view} device subscription released");
        });
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
