//! Remote section: one independently fetched slice of a screen.
//!
//! Lifecycle is `Idle -> Loading -> {Ready, Failed}`; `Failed` re-enters
//! `Loading` on retry. Each `begin` hands out a [`Ticket`]; only the ticket
//! of the most recently issued request may complete the section, so a slow
//! superseded response can neither overwrite newer data nor clear the
//! loading flag of the request still in flight.

use crate::device::DeviceClass;
use crate::error::ApiError;

/// Proof that a completion belongs to a specific request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionStatus {
    Idle,
    Loading,
    Ready,
    Failed(ApiError),
}

/// Outcome of handing a completion to a section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Failed,
    /// Superseded by a later request; ignored
    Stale,
}

/// How many list items a section keeps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCap {
    Unbounded,
    /// 2 on handsets, 3 on tablets
    ByDevice,
}

impl ItemCap {
    pub fn limit(self, class: DeviceClass) -> Option<usize> {
        match self {
            ItemCap::Unbounded => None,
            ItemCap::ByDevice => Some(class.summary_cap()),
        }
    }
}

#[derive(Debug)]
pub struct RemoteSection<T> {
    label: &'static str,
    status: SectionStatus,
    data: Option<T>,
    issued: u64,
}

impl<T> RemoteSection<T> {
    pub fn new(label: &'static str) -> Self {
        Self { label, status: SectionStatus::Idle, data: None, issued: 0 }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn status(&self) -> &SectionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SectionStatus::Loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.status {
            SectionStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Mark a new request in flight and return its ticket
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.status = SectionStatus::Loading;
        Ticket(self.issued)
    }

    /// Apply a completion. Failures keep whatever data was loaded before.
    pub fn complete(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> Applied {
        if ticket.0 != self.issued {
            log::debug!(
                "[section] {} dropping stale response (ticket {} < {})",
                self.label, ticket.0, self.issued
            );
            return Applied::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = SectionStatus::Ready;
                Applied::Updated
            }
            Err(e) => {
                log::error!("[section] {} fetch failed: {e}", self.label);
                self.status = SectionStatus::Failed(e);
                Applied::Failed
            }
        }
    }
}

/// Shorthand for the list sections every board screen uses
pub type ListSection<T> = RemoteSection<Vec<T>>;

impl<T> RemoteSection<Vec<T>> {
    /// Loaded items, empty when nothing loaded yet
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Like `complete`, truncating a successful list to `limit`
    pub fn complete_capped(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<T>, ApiError>,
        limit: Option<usize>,
    ) -> Applied {
        let result = result.map(|mut items| {
            if let Some(max) = limit {
                items.truncate(max);
            }
            items
        });
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net_err() -> ApiError {
        ApiError::Network("connection refused".into())
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut s: ListSection<u32> = RemoteSection::new("wishlist");
        assert_eq!(s.status(), &SectionStatus::Idle);

        let t = s.begin();
        assert!(s.is_loading());
        assert_eq!(s.complete(t, Ok(vec![1, 2])), Applied::Updated);

        let t = s.begin();
        assert_eq!(s.complete(t, Err(net_err())), Applied::Failed);
        assert!(!s.is_loading());
        assert_eq!(s.items(), &[1, 2]);
        assert_eq!(s.error(), Some(&net_err()));
    }

    #[test]
    fn test_retry_from_failed() {
        let mut s: RemoteSection<String> = RemoteSection::new("detail");
        let t = s.begin();
        s.complete(t, Err(net_err()));
        let t = s.begin();
        assert!(s.is_loading());
        s.complete(t, Ok("pin".into()));
        assert_eq!(s.status(), &SectionStatus::Ready);
        assert_eq!(s.data().map(String::as_str), Some("pin"));
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut s: ListSection<u32> = RemoteSection::new("myboard");
        let first = s.begin();
        let second = s.begin();

        // The superseded request lands last-but-one and must not clear loading
        assert_eq!(s.complete(first, Ok(vec![9])), Applied::Stale);
        assert!(s.is_loading());
        assert!(s.items().is_empty());

        assert_eq!(s.complete(second, Ok(vec![1])), Applied::Updated);
        assert_eq!(s.complete(first, Ok(vec![9])), Applied::Stale);
        assert_eq!(s.items(), &[1]);
    }

    #[test]
    fn test_cap_by_device() {
        let mut s: ListSection<u32> = RemoteSection::new("trading");
        let t = s.begin();
        let limit = ItemCap::ByDevice.limit(DeviceClass::Handset);
        s.complete_capped(t, Ok(vec![1, 2, 3, 4]), limit);
        assert_eq!(s.items(), &[1, 2]);

        let t = s.begin();
        let limit = ItemCap::ByDevice.limit(DeviceClass::Tablet);
        s.complete_capped(t, Ok(vec![1, 2, 3, 4]), limit);
        assert_eq!(s.items(), &[1, 2, 3]);

        assert_eq!(ItemCap::Unbounded.limit(DeviceClass::Tablet), None);
    }
}
