//! # EmoTune Common Library
//!
//! Shared code for the EmoTune client crates:
//! - Error and result types
//! - Configuration loading and the preferences file
//! - Emotion and language vocabulary
//! - Event types (ClientEvent enum) and the EventBus
//! - Backend wire types

pub mod api;
pub mod config;
pub mod emotion;
pub mod error;
pub mod events;
pub mod language;
pub mod preferences;

pub use emotion::{Emotion, EmotionResult};
pub use error::{Error, Result};
pub use language::Language;
