//! In-process stand-ins for the analysis, recommendation and camera seams

use async_trait::async_trait;
use emotune_client::capture::MediaCaptureSource;
use emotune_client::models::{CapturedImage, Recommendation};
use emotune_client::services::{EmotionAnalyzer, RecommendationSource};
use emotune_client::CaptureError;
use emotune_common::{Emotion, EmotionResult, Language};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type AnalysisOutcome = Result<Option<EmotionResult>, CaptureError>;

struct Script {
    outcome: AnalysisOutcome,
    gate: Option<Arc<Notify>>,
}

/// Analyzer answering per image filename
pub struct FakeAnalyzer {
    scripts: Mutex<HashMap<String, Script>>,
    fallback: AnalysisOutcome,
    calls: AtomicUsize,
}

impl FakeAnalyzer {
    /// Every unscripted image gets `fallback`
    pub fn new(fallback: AnalysisOutcome) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn detecting(label: Emotion, confidence: f64) -> Self {
        Self::new(Ok(Some(EmotionResult::new(label, confidence).unwrap())))
    }

    pub fn failing(err: CaptureError) -> Self {
        Self::new(Err(err))
    }

    /// Answer `outcome` for `filename`
    pub fn on(self, filename: &str, outcome: AnalysisOutcome) -> Self {
        self.scripts.lock().unwrap().insert(
            filename.to_string(),
            Script {
                outcome,
                gate: None,
            },
        );
        self
    }

    /// Answer `outcome` for `filename`, but only after `gate` is notified
    pub fn gated(self, filename: &str, outcome: AnalysisOutcome, gate: Arc<Notify>) -> Self {
        self.scripts.lock().unwrap().insert(
            filename.to_string(),
            Script {
                outcome,
                gate: Some(gate),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmotionAnalyzer for FakeAnalyzer {
    async fn analyze(&self, image: &CapturedImage) -> AnalysisOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (outcome, gate) = {
            let scripts = self.scripts.lock().unwrap();
            match scripts.get(image.filename()) {
                Some(script) => (script.outcome.clone(), script.gate.clone()),
                None => (self.fallback.clone(), None),
            }
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        outcome
    }
}

/// Recommender returning a fixed list and recording every query
pub struct FakeRecommender {
    outcome: Mutex<Result<Vec<Recommendation>, CaptureError>>,
    scripts: Mutex<HashMap<Emotion, (Vec<Recommendation>, Option<Arc<Notify>>)>>,
    queries: Mutex<Vec<(Emotion, Language)>>,
}

impl FakeRecommender {
    fn with_outcome(outcome: Result<Vec<Recommendation>, CaptureError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            scripts: Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(songs: Vec<Recommendation>) -> Self {
        Self::with_outcome(Ok(songs))
    }

    pub fn failing(err: CaptureError) -> Self {
        Self::with_outcome(Err(err))
    }

    /// Answer `songs` for `emotion`, but only after `gate` is notified
    pub fn gated(self, emotion: Emotion, songs: Vec<Recommendation>, gate: Arc<Notify>) -> Self {
        self.scripts.lock().unwrap().insert(emotion, (songs, Some(gate)));
        self
    }

    pub fn queries(&self) -> Vec<(Emotion, Language)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationSource for FakeRecommender {
    async fn fetch(
        &self,
        emotion: Emotion,
        language: Language,
    ) -> Result<Vec<Recommendation>, CaptureError> {
        self.queries.lock().unwrap().push((emotion, language));
        let scripted = self.scripts.lock().unwrap().get(&emotion).cloned();
        match scripted {
            Some((songs, gate)) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                Ok(songs)
            }
            None => self.outcome.lock().unwrap().clone(),
        }
    }
}

/// Shared view of a FakeCamera after it moved into the controller
#[derive(Clone, Default)]
pub struct CameraProbe {
    open: Arc<AtomicBool>,
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl CameraProbe {
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of close() calls that actually released a stream
    pub fn releases(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Camera that yields a fixed JPEG frame
pub struct FakeCamera {
    probe: CameraProbe,
    deny: bool,
}

impl FakeCamera {
    pub fn new() -> (Self, CameraProbe) {
        let probe = CameraProbe::default();
        (
            Self {
                probe: probe.clone(),
                deny: false,
            },
            probe,
        )
    }

    /// Camera whose permission is denied
    pub fn denied() -> (Self, CameraProbe) {
        let (mut camera, probe) = Self::new();
        camera.deny = true;
        (camera, probe)
    }
}

#[async_trait]
impl MediaCaptureSource for FakeCamera {
    async fn open(&mut self) -> Result<(), CaptureError> {
        if self.deny {
            return Err(CaptureError::DeviceUnavailable(
                "permission denied".to_string(),
            ));
        }
        if !self.probe.is_open() {
            self.probe.open.store(true, Ordering::SeqCst);
            self.probe.opens.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<CapturedImage, CaptureError> {
        if !self.probe.is_open() {
            return Err(CaptureError::NotOpen);
        }
        Ok(super::fixtures::captured_jpeg("capture.jpeg"))
    }

    async fn close(&mut self) {
        if self.probe.open.swap(false, Ordering::SeqCst) {
            self.probe.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_open(&self) -> bool {
        self.probe.is_open()
    }
}
