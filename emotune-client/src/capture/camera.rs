//! Camera stream lifecycle
//!
//! `MediaCaptureSource` is the seam between the workflow and whatever owns
//! the camera hardware. The controller holds at most one source and pairs
//! every `open()` with a `close()` on each exit path.

use crate::error::CaptureError;
use crate::models::CapturedImage;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Filename given to every camera snapshot
pub const SNAPSHOT_FILENAME: &str = "capture.jpeg";

/// A live video source that can produce still frames
#[async_trait]
pub trait MediaCaptureSource: Send {
    /// Acquire the stream; no-op if already open
    async fn open(&mut self) -> Result<(), CaptureError>;

    /// Capture the current frame at the stream's native size
    async fn snapshot(&mut self) -> Result<CapturedImage, CaptureError>;

    /// Release the stream; idempotent
    async fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Native frame geometry of an open stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
struct LiveStream {
    dimensions: FrameDimensions,
    opened_at: Instant,
}

/// Camera backed by a frame file that a capture daemon keeps overwriting
///
/// e.g. `ffmpeg -f v4l2 -i /dev/video0 -update 1 -y /run/emotune/frame.jpg`
pub struct FrameFileCamera {
    frame_path: PathBuf,
    stream: Option<LiveStream>,
}

impl FrameFileCamera {
    pub fn new(frame_path: impl Into<PathBuf>) -> Self {
        Self {
            frame_path: frame_path.into(),
            stream: None,
        }
    }

    pub fn frame_path(&self) -> &Path {
        &self.frame_path
    }

    /// Geometry reported when the stream was opened (or last snapshotted)
    pub fn dimensions(&self) -> Option<FrameDimensions> {
        self.stream.as_ref().map(|s| s.dimensions)
    }

    async fn read_frame(&self) -> Result<DynamicImage, CaptureError> {
        let bytes = tokio::fs::read(&self.frame_path).await.map_err(|e| {
            CaptureError::DeviceUnavailable(format!("{}: {}", self.frame_path.display(), e))
        })?;
        image::load_from_memory(&bytes).map_err(|e| {
            CaptureError::DeviceUnavailable(format!(
                "{}: undecodable frame: {}",
                self.frame_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl MediaCaptureSource for FrameFileCamera {
    async fn open(&mut self) -> Result<(), CaptureError> {
        if self.stream.is_some() {
            debug!("Camera stream already open");
            return Ok(());
        }

        let frame = self.read_frame().await?;
        let dimensions = FrameDimensions {
            width: frame.width(),
            height: frame.height(),
        };
        info!(
            path = %self.frame_path.display(),
            width = dimensions.width,
            height = dimensions.height,
            "Camera stream opened"
        );
        self.stream = Some(LiveStream {
            dimensions,
            opened_at: Instant::now(),
        });
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<CapturedImage, CaptureError> {
        if self.stream.is_none() {
            return Err(CaptureError::NotOpen);
        }

        let frame = self.read_frame().await?;
        let dimensions = FrameDimensions {
            width: frame.width(),
            height: frame.height(),
        };
        if let Some(stream) = self.stream.as_mut() {
            stream.dimensions = dimensions;
        }

        let jpeg = encode_jpeg(&frame)?;
        debug!(
            width = dimensions.width,
            height = dimensions.height,
            bytes = jpeg.len(),
            "Snapshot captured"
        );
        Ok(CapturedImage::new(jpeg, "image/jpeg", SNAPSHOT_FILENAME))
    }

    async fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            info!(
                open_for_ms = stream.opened_at.elapsed().as_millis() as u64,
                "Camera stream released"
            );
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Re-encode a frame as JPEG at its own dimensions
fn encode_jpeg(frame: &DynamicImage) -> Result<Vec<u8>, CaptureError> {
    let rgb = frame.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| CaptureError::DeviceUnavailable(format!("JPEG encode failed: {}", e)))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_frame(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("frame.png");
        RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
            .save(&path)
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_snapshot_requires_open_stream() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = FrameFileCamera::new(write_frame(dir.path(), 8, 8));
        assert_eq!(camera.snapshot().await, Err(CaptureError::NotOpen));
    }

    #[tokio::test]
    async fn test_open_missing_device() {
        let mut camera = FrameFileCamera::new("/nonexistent/emotune/frame.jpg");
        assert!(matches!(
            camera.open().await,
            Err(CaptureError::DeviceUnavailable(_))
        ));
        assert!(!camera.is_open());
    }

    #[tokio::test]
    async fn test_open_undecodable_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        std::fs::write(&path, b"not an image").unwrap();
        let mut camera = FrameFileCamera::new(path);
        assert!(matches!(
            camera.open().await,
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_uses_native_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = FrameFileCamera::new(write_frame(dir.path(), 64, 48));
        camera.open().await.unwrap();
        assert_eq!(
            camera.dimensions(),
            Some(FrameDimensions { width: 64, height: 48 })
        );

        let snapshot = camera.snapshot().await.unwrap();
        assert_eq!(snapshot.mime_type(), "image/jpeg");
        assert_eq!(snapshot.filename(), SNAPSHOT_FILENAME);

        let decoded = image::load_from_memory(snapshot.bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = FrameFileCamera::new(write_frame(dir.path(), 4, 4));
        camera.open().await.unwrap();
        camera.open().await.unwrap();
        assert!(camera.is_open());

        camera.close().await;
        camera.close().await;
        assert!(!camera.is_open());
        assert_eq!(camera.snapshot().await, Err(CaptureError::NotOpen));
    }
}
