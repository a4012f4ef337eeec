//! Emotion vocabulary
//!
//! The backend classifier returns one of seven labels. Anything else coming
//! off the wire is rejected here rather than trusted downstream.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emotion label produced by the detection endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
}

impl Emotion {
    /// All labels in classifier output order
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Neutral,
        Emotion::Sad,
        Emotion::Surprise,
    ];

    /// Wire form, as sent in `?emotion=`
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
        }
    }

    /// Font Awesome icon used when displaying the label
    pub fn icon(&self) -> &'static str {
        match self {
            Emotion::Happy => "fa-smile",
            Emotion::Sad => "fa-sad-tear",
            Emotion::Angry => "fa-angry",
            Emotion::Surprise => "fa-surprise",
            Emotion::Neutral => "fa-meh",
            Emotion::Fear => "fa-flushed",
            Emotion::Disgust => "fa-grimace",
        }
    }

    /// Capitalized label ("Happy")
    pub fn display_name(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angry" => Ok(Emotion::Angry),
            "disgust" => Ok(Emotion::Disgust),
            "fear" => Ok(Emotion::Fear),
            "happy" => Ok(Emotion::Happy),
            "neutral" => Ok(Emotion::Neutral),
            "sad" => Ok(Emotion::Sad),
            "surprise" => Ok(Emotion::Surprise),
            other => Err(Error::InvalidInput(format!("unknown emotion label: {other:?}"))),
        }
    }
}

/// Validated analysis result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub label: Emotion,
    /// Classifier confidence (0.0 to 1.0)
    pub confidence: f64,
}

impl EmotionResult {
    /// Build a result, rejecting confidences outside [0, 1] (NaN included)
    pub fn new(label: Emotion, confidence: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidInput(format!(
                "confidence {confidence} outside [0, 1]"
            )));
        }
        Ok(Self { label, confidence })
    }

    /// Confidence as a percentage with two decimals ("87.00%")
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}
