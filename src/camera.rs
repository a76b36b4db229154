//! Camera capability boundary.
//!
//! The scanner only needs a permission state and a one-shot capture. The
//! native implementation reads the photo from a file, which is what a
//! terminal session has instead of a camera.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ApiError;
use crate::types::{ImagePayload, PermissionState};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("capture failed: {0}")]
    Failed(String),
}

/// Anything that can end a scan before identification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Upload(#[from] ApiError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl Photo {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self { bytes, mime: "image/jpeg" }
    }

    /// `data:<mime>;base64,<...>`, the form the create-pin endpoint expects
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload { image: self.to_data_uri() }
    }
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn permission(&self) -> PermissionState;

    /// Ask for access; returns the state after the prompt
    async fn request_permission(&self) -> PermissionState;

    async fn capture(&self) -> Result<Photo, CaptureError>;
}

/// Reads the "captured" photo from a configured file path
pub struct FileCamera {
    path: Option<PathBuf>,
}

impl FileCamera {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn mime_for(path: &std::path::Path) -> &'static str {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn permission(&self) -> PermissionState {
        match &self.path {
            Some(_) => PermissionState::Granted,
            None => PermissionState::Denied,
        }
    }

    async fn request_permission(&self) -> PermissionState {
        // Nothing to prompt for: access exists iff a capture source was configured
        let state = self.permission().await;
        if !state.is_granted() {
            log::warn!("[camera] no capture source configured (set CAPTURE_PATH)");
        }
        state
    }

    async fn capture(&self) -> Result<Photo, CaptureError> {
        let path = self.path.as_ref().ok_or(CaptureError::PermissionDenied)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;
        if bytes.is_empty() {
            return Err(CaptureError::Failed(format!("{} is empty", path.display())));
        }
        log::info!("[camera] captured {} bytes from {}", bytes.len(), path.display());
        Ok(Photo { bytes, mime: Self::mime_for(path) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        let photo = Photo::jpeg(vec![0xff, 0xd8, 0xff]);
        assert_eq!(photo.to_data_uri(), "data:image/jpeg;base64,/9j/");
        assert_eq!(photo.to_payload().image, "data:image/jpeg;base64,/9j/");
    }

    #[tokio::test]
    async fn test_file_camera_without_path_is_denied() {
        let cam = FileCamera::new(None);
        assert_eq!(cam.permission().await, PermissionState::Denied);
        assert_eq!(cam.request_permission().await, PermissionState::Denied);
        assert_eq!(cam.capture().await, Err(CaptureError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_file_camera_missing_file_fails_capture() {
        let cam = FileCamera::new(Some(PathBuf::from("/nonexistent/pinboard/photo.png")));
        assert!(cam.permission().await.is_granted());
        assert!(matches!(cam.capture().await, Err(CaptureError::Failed(_))));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(FileCamera::mime_for(std::path::Path::new("a.PNG")), "image/png");
        assert_eq!(FileCamera::mime_for(std::path::Path::new("a.jpg")), "image/jpeg");
    }
}
