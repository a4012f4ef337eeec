//! Image acquisition
//!
//! - `camera`: live stream lifecycle and still-frame snapshots
//! - `ingest`: normalization of files, drops and data URIs into a CapturedImage

pub mod camera;
pub mod ingest;

pub use camera::{FrameFileCamera, MediaCaptureSource};
pub use ingest::ImageIngestAdapter;
