//! Test Helper Utilities
//!
//! Shared utilities for testing emotune-client

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;
pub mod mock_backend;

// Re-export commonly used items
pub use fakes::{CameraProbe, FakeAnalyzer, FakeCamera, FakeRecommender};
pub use fixtures::{captured_jpeg, drain_events, jpeg_blob, jpeg_bytes, song, song_json};
pub use mock_backend::{MockBackend, RecordedRequest, Reply};
