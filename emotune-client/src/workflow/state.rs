//! Workflow state owned by the controller

use crate::models::{CapturedImage, Recommendation};
use emotune_common::events::{NoticeLevel, WorkflowPhase};
use emotune_common::{EmotionResult, Language};
use serde::{Deserialize, Serialize};

/// Active input tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Camera,
    Upload,
}

/// Outcome message of the last pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Composite workflow state
///
/// Cloned out of the controller as a snapshot; callers never hold a
/// reference into the live state.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub input_mode: InputMode,
    pub phase: WorkflowPhase,
    pub image: Option<CapturedImage>,
    pub emotion: Option<EmotionResult>,
    /// Backend order, never re-sorted
    pub recommendations: Vec<Recommendation>,
    pub selected_track: Option<Recommendation>,
    pub busy: bool,
    pub language: Language,
    /// Pass counter; bumped on every submit and every reset
    pub generation: u64,
    /// Failure raised by the current pass, if any
    pub notice: Option<Notice>,
}

impl WorkflowState {
    pub fn new(input_mode: InputMode, language: Language) -> Self {
        Self {
            input_mode,
            phase: WorkflowPhase::Idle,
            image: None,
            emotion: None,
            recommendations: Vec::new(),
            selected_track: None,
            busy: false,
            language,
            generation: 0,
            notice: None,
        }
    }

    /// Drop everything produced by the previous pass (image kept)
    pub(crate) fn clear_results(&mut self) {
        self.emotion = None;
        self.recommendations.clear();
        self.selected_track = None;
        self.notice = None;
    }

    /// Check the structural invariants; returns the first violation
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.busy != self.phase.is_busy() {
            return Err(format!(
                "busy={} does not match phase {:?}",
                self.busy, self.phase
            ));
        }
        if !self.recommendations.is_empty() && self.emotion.is_none() {
            return Err("recommendations present without an emotion".to_string());
        }
        if let Some(track) = &self.selected_track {
            if !self.recommendations.contains(track) {
                return Err(format!("selected track {:?} not in recommendations", track.title));
            }
        }
        if self.phase == WorkflowPhase::Idle && self.image.is_some() {
            return Err("idle with an image".to_string());
        }
        if self.phase != WorkflowPhase::Idle && self.image.is_none() {
            return Err(format!("{:?} without an image", self.phase));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotune_common::Emotion;

    fn song(title: &str) -> Recommendation {
        Recommendation {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album_art_url: None,
            embed_url: Some(format!("https://open.spotify.com/embed/track/{}", title)),
        }
    }

    #[test]
    fn test_new_state_is_idle_and_consistent() {
        let state = WorkflowState::new(InputMode::Upload, Language::Hindi);
        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert!(!state.busy);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_recommendations_need_emotion() {
        let mut state = WorkflowState::new(InputMode::Camera, Language::English);
        state.recommendations.push(song("a"));
        assert!(state.check_invariants().is_err());

        state.emotion = Some(EmotionResult::new(Emotion::Sad, 0.5).unwrap());
        state.image = Some(CapturedImage::new(vec![1], "image/jpeg", "capture.jpeg"));
        state.phase = WorkflowPhase::Ready;
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_selected_must_be_listed() {
        let mut state = WorkflowState::new(InputMode::Camera, Language::English);
        state.image = Some(CapturedImage::new(vec![1], "image/jpeg", "capture.jpeg"));
        state.phase = WorkflowPhase::Ready;
        state.emotion = Some(EmotionResult::new(Emotion::Happy, 0.9).unwrap());
        state.recommendations = vec![song("a")];
        state.selected_track = Some(song("b"));
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_invariant_busy_matches_phase() {
        let mut state = WorkflowState::new(InputMode::Camera, Language::English);
        state.busy = true;
        assert!(state.check_invariants().is_err());
    }
}
