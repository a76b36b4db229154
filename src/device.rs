//! Device metrics as an injected, observable value.
//!
//! The host (terminal loop, tests) owns a [`DeviceMetricsSource`] and pushes
//! size changes into it. Screens hold a [`DeviceSubscription`] only while
//! mounted; dropping the subscription is the unsubscribe.

use tokio::sync::watch;

/// Widths above this are laid out as tablets
pub const TABLET_MIN_WIDTH: f32 = 768.0;

/// Logical width of one terminal column, used to map terminal size to metrics
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for DeviceMetrics {
    /// iPhone X logical size, the layout baseline
    fn default() -> Self {
        Self { width: 375.0, height: 812.0 }
    }
}

impl DeviceMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Metrics for a terminal of `cols` x `rows` cells
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f32 * CELL_WIDTH,
            height: rows as f32 * CELL_HEIGHT,
        }
    }

    pub fn class(&self) -> DeviceClass {
        if self.width > TABLET_MIN_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Handset
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Handset,
    Tablet,
}

impl DeviceClass {
    /// Items shown per section on summary screens (also the grid column count)
    pub fn summary_cap(self) -> usize {
        match self {
            DeviceClass::Handset => 2,
            DeviceClass::Tablet => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Handset => "handset",
            DeviceClass::Tablet => "tablet",
        }
    }
}

/// Host-side handle publishing metrics changes
#[derive(Clone, Debug)]
pub struct DeviceMetricsSource {
    tx: watch::Sender<DeviceMetrics>,
}

impl DeviceMetricsSource {
    pub fn new(initial: DeviceMetrics) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> DeviceMetrics {
        *self.tx.borrow()
    }

    /// Publish new metrics; subscribers only wake when the value changed
    pub fn update(&self, metrics: DeviceMetrics) {
        self.tx.send_if_modified(|cur| {
            if *cur == metrics {
                false
            } else {
                *cur = metrics;
                true
            }
        });
    }

    pub fn subscribe(&self) -> DeviceSubscription {
        DeviceSubscription { rx: self.tx.subscribe() }
    }

    /// Live subscriptions; zero once every subscribed screen unmounted
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A screen's view of the device metrics, valid while it is held
#[derive(Debug)]
pub struct DeviceSubscription {
    rx: watch::Receiver<DeviceMetrics>,
}

impl DeviceSubscription {
    pub fn current(&self) -> DeviceMetrics {
        *self.rx.borrow()
    }

    /// Wait for the next change. `None` once the source is gone.
    pub async fn changed(&mut self) -> Option<DeviceMetrics> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_class_threshold() {
        assert_eq!(DeviceMetrics::new(768.0, 1024.0).class(), DeviceClass::Handset);
        assert_eq!(DeviceMetrics::new(768.5, 1024.0).class(), DeviceClass::Tablet);
        assert_eq!(DeviceMetrics::default().class().summary_cap(), 2);
        assert_eq!(DeviceClass::Tablet.summary_cap(), 3);
    }

    #[test]
    fn test_from_cells() {
        // 96 columns is exactly the threshold, 97 crosses it
        assert_eq!(DeviceMetrics::from_cells(96, 40).class(), DeviceClass::Handset);
        assert_eq!(DeviceMetrics::from_cells(97, 40).class(), DeviceClass::Tablet);
    }

    #[tokio::test]
    async fn test_subscription_lifecycle() {
        let source = DeviceMetricsSource::new(DeviceMetrics::default());
        let mut sub = source.subscribe();
        assert_eq!(source.subscriber_count(), 1);

        source.update(DeviceMetrics::new(1024.0, 768.0));
        assert_eq!(sub.changed().await, Some(DeviceMetrics::new(1024.0, 768.0)));
        assert_eq!(sub.current().class(), DeviceClass::Tablet);

        drop(sub);
        assert_eq!(source.subscriber_count(), 0);
    }
}
