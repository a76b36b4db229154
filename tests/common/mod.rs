#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use pinboard::api::InMemoryCollection;
use pinboard::app::App;
use pinboard::camera::{Camera, CaptureError, Photo};
use pinboard::device::{DeviceMetrics, DeviceMetricsSource};
use pinboard::router::Route;
use pinboard::screens::{
    ActiveScreen, BoardScreen, BoardsScreen, DetailsScreen, ScanningScreen, ScreenSettings, Services,
};
use pinboard::types::{AppEvent, PermissionState};

/// Camera with a scripted permission and capture outcome
pub struct TestCamera {
    permission: Mutex<PermissionState>,
    capture: Mutex<Result<Photo, CaptureError>>,
    pub captures: AtomicUsize,
    pub prompts: AtomicUsize,
}

impl TestCamera {
    pub fn granted() -> Self {
        Self::new(PermissionState::Granted)
    }

    pub fn denied() -> Self {
        Self::new(PermissionState::Denied)
    }

    fn new(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            capture: Mutex::new(Ok(Photo::jpeg(vec![0xff, 0xd8, 0xff, 0xe0]))),
            captures: AtomicUsize::new(0),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn set_permission(&self, state: PermissionState) {
        *self.permission.lock().unwrap() = state;
    }

    pub fn fail_capture(&self, err: CaptureError) {
        *self.capture.lock().unwrap() = Err(err);
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for TestCamera {
    async fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionState {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.permission.lock().unwrap()
    }

    async fn capture(&self) -> Result<Photo, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.capture.lock().unwrap().clone()
    }
}

/// App wired to an in-memory backend, pumped by hand
pub struct Harness {
    pub app: App,
    pub rx: UnboundedReceiver<AppEvent>,
    pub tx: UnboundedSender<AppEvent>,
    pub api: Arc<InMemoryCollection>,
    pub camera: Arc<TestCamera>,
    pub device: DeviceMetricsSource,
}

pub struct Setup {
    pub api: Arc<InMemoryCollection>,
    pub camera: Arc<TestCamera>,
    pub metrics: DeviceMetrics,
    pub settings: ScreenSettings,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            api: Arc::new(InMemoryCollection::demo()),
            camera: Arc::new(TestCamera::granted()),
            metrics: DeviceMetrics::default(),
            settings: ScreenSettings::default(),
        }
    }
}

impl Harness {
    pub fn start(route: Route) -> Self {
        Self::with(Setup::default(), route)
    }

    pub fn with(setup: Setup, route: Route) -> Self {
        let (tx, rx) = unbounded_channel();
        let device = DeviceMetricsSource::new(setup.metrics);
        let services = Services::new(
            setup.api.clone(),
            setup.camera.clone(),
            device.clone(),
            setup.settings,
            &tx,
        );
        let app = App::new(services, tx.clone(), route, 30);
        Self { app, rx, tx, api: setup.api, camera: setup.camera, device }
    }

    /// Handle every event produced within `d` of (virtual) time
    pub async fn run_for(&mut self, d: Duration) {
        let deadline = tokio::time::Instant::now() + d;
        loop {
            tokio::select! {
                ev = self.rx.recv() => match ev {
                    Some(ev) => self.app.handle_event(ev),
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    /// Let all pending work finish
    pub async fn settle(&mut self) {
        self.run_for(Duration::from_secs(5)).await;
    }

    /// Handle exactly one event
    pub async fn step(&mut self) {
        let ev = tokio::time::timeout(Duration::from_secs(60), self.rx.recv())
            .await
            .expect("no event arrived")
            .expect("channel closed");
        self.app.handle_event(ev);
    }

    pub fn boards(&self) -> &BoardsScreen {
        match self.app.screen() {
            ActiveScreen::Boards(s) => s,
            _ => panic!("expected boards summary, on {}", self.app.route().name()),
        }
    }

    pub fn board(&self) -> &BoardScreen {
        match self.app.screen() {
            ActiveScreen::Board(s) => s,
            _ => panic!("expected full board, on {}", self.app.route().name()),
        }
    }

    pub fn details(&self) -> &DetailsScreen {
        match self.app.screen() {
            ActiveScreen::Details(s) => s,
            _ => panic!("expected details, on {}", self.app.route().name()),
        }
    }

    pub fn scanning(&self) -> &ScanningScreen {
        match self.app.screen() {
            ActiveScreen::Scanning(s) => s,
            _ => panic!("expected scanner, on {}", self.app.route().name()),
        }
    }

    /// (title, message) of the most recent toast
    pub fn last_toast(&self) -> Option<(String, String)> {
        self.app.last_toast().map(|t| (t.title.clone(), t.message.clone()))
    }
}

pub fn ids(entries: &[pinboard::types::CollectionEntry]) -> Vec<String> {
    entries.iter().map(|e| e.id.as_str().to_string()).collect()
}

pub fn pin(name: &str) -> pinboard::types::Pin {
    pinboard::types::Pin {
        id: String::new(),
        name: Some(name.to_string()),
        series: None,
        origin: None,
        edition: None,
        release_date: None,
        original_price: None,
        image_url: None,
    }
}
