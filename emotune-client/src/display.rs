//! Plain-text rendering of the workflow state for the terminal front end

use crate::workflow::WorkflowState;
use emotune_common::events::WorkflowPhase;
use std::fmt::Write;

pub const ANALYZING_PLACEHOLDER: &str = "Analyzing emotion...";
pub const EMOTION_PLACEHOLDER: &str = "Emotion will be displayed here after analysis";
pub const NO_SONGS_MESSAGE: &str = "No songs found for this emotion/language.";

/// Render the emotion panel and song list
pub fn render_state(state: &WorkflowState) -> String {
    let mut out = String::new();

    match (&state.emotion, state.busy) {
        (_, true) => {
            let _ = writeln!(out, "{}", ANALYZING_PLACEHOLDER);
        }
        (None, false) => {
            let _ = writeln!(out, "{}", EMOTION_PLACEHOLDER);
        }
        (Some(result), false) => {
            let _ = writeln!(
                out,
                "Emotion: {} [{}]  Confidence: {}",
                result.label.display_name(),
                result.label.icon(),
                result.confidence_percent()
            );
        }
    }

    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "! {}", notice.message);
    }

    if state.phase == WorkflowPhase::Ready && state.emotion.is_some() {
        if state.recommendations.is_empty() {
            let _ = writeln!(out, "{}", NO_SONGS_MESSAGE);
        } else {
            let _ = writeln!(out, "Songs ({}):", state.language.as_str());
            for (i, song) in state.recommendations.iter().enumerate() {
                let marker = if state.selected_track.as_ref() == Some(song) {
                    '>'
                } else {
                    ' '
                };
                let preview = if song.is_playable() { "" } else { "  (no preview)" };
                let _ = writeln!(
                    out,
                    "{} {:>2}. {} - {}{}",
                    marker,
                    i + 1,
                    song.title,
                    song.artist,
                    preview
                );
            }
        }
    }

    if let Some(url) = state.selected_track.as_ref().and_then(|t| t.player_url()) {
        let _ = writeln!(out, "Player: {}", url);
    }

    out
}
