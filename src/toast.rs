//! Transient notifications.

use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

use crate::types::AppEvent;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPreset {
    Done,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub preset: ToastPreset,
}

impl Toast {
    pub fn done(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), preset: ToastPreset::Done }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), preset: ToastPreset::Error }
    }
}

/// Fire-and-forget notification sink used by screens
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Routes toasts through the app event channel
#[derive(Clone)]
pub struct EventNotifier {
    events: UnboundedSender<AppEvent>,
}

impl EventNotifier {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, toast: Toast) {
        log::info!("[toast] {}: {}", toast.title, toast.message);
        let _ = self.events.send(AppEvent::Toast(toast));
    }
}

/// The toast currently shown, if any
#[derive(Debug, Default)]
pub struct ToastSlot {
    current: Option<(Toast, Instant)>,
}

impl ToastSlot {
    pub fn show(&mut self, toast: Toast) {
        self.current = Some((toast, Instant::now()));
    }

    /// Current toast if still within its display window
    pub fn active(&self) -> Option<&Toast> {
        self.current.as_ref().and_then(|(toast, at)| {
            if at.elapsed() < TOAST_DURATION {
                Some(toast)
            } else {
                None
            }
        })
    }

    /// Most recent toast regardless of expiry
    pub fn last(&self) -> Option<&Toast> {
        self.current.as_ref().map(|(toast, _)| toast)
    }
}
