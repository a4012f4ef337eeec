//! Capture workflow
//!
//! # State Progression
//! IDLE → PREVIEWING → ANALYZING → RECOMMENDING → READY → (reset) → IDLE
//!
//! ANALYZING and RECOMMENDING are the busy phases. Every pass ends in READY,
//! whether it succeeded or failed, so the busy flag can never stick.

mod controller;
mod state;

pub use controller::{CaptureWorkflowController, ANALYSIS_FAILED_MESSAGE, RECOMMENDATIONS_FAILED_MESSAGE};
pub use state::{InputMode, Notice, WorkflowState};
pub use emotune_common::events::WorkflowPhase;
