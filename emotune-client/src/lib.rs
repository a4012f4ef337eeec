//! emotune-client library
//!
//! Image capture, emotion analysis and music recommendation workflow for the
//! EmoTune backend, plus the account calls the front end needs.
//!
//! Data flow: capture/ingest → CapturedImage → analysis → emotion →
//! recommendations → WorkflowState → front end.

pub mod capture;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod workflow;

pub use crate::error::{AccountError, CaptureError};
pub use crate::models::{CapturedImage, FileBlob, Profile, Recommendation};
pub use crate::workflow::{CaptureWorkflowController, InputMode, WorkflowState};
