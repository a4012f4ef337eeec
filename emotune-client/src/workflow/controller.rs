//! Capture workflow controller
//!
//! Owns the workflow state and sequences submit → analyze → recommend.
//!
//! Every submitted image starts a new pass tagged with a generation number.
//! A response is applied only if its generation is still current; anything
//! older is dropped (a later capture or a reset overtook it). State locks
//! are never held across a network call or a device call.

use super::state::{InputMode, Notice, WorkflowState};
use crate::capture::{ImageIngestAdapter, MediaCaptureSource};
use crate::error::CaptureError;
use crate::models::{CapturedImage, FileBlob, Recommendation};
use crate::services::{EmotionAnalyzer, RecommendationSource};
use chrono::Utc;
use emotune_common::events::{ClientEvent, EventBus, NoticeLevel, WorkflowPhase};
use emotune_common::Language;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Shown when the detection call fails
pub const ANALYSIS_FAILED_MESSAGE: &str = "Error detecting emotion. Please try again.";

/// Shown when the recommendation call fails
pub const RECOMMENDATIONS_FAILED_MESSAGE: &str = "Could not fetch songs. Try again.";

/// Workflow controller
pub struct CaptureWorkflowController {
    analyzer: Arc<dyn EmotionAnalyzer>,
    recommender: Arc<dyn RecommendationSource>,
    /// The one camera this controller may hold open
    camera: Option<Mutex<Box<dyn MediaCaptureSource>>>,
    state: RwLock<WorkflowState>,
    event_bus: EventBus,
}

impl CaptureWorkflowController {
    pub fn new(
        analyzer: Arc<dyn EmotionAnalyzer>,
        recommender: Arc<dyn RecommendationSource>,
        event_bus: EventBus,
        language: Language,
    ) -> Self {
        Self {
            analyzer,
            recommender,
            camera: None,
            state: RwLock::new(WorkflowState::new(InputMode::default(), language)),
            event_bus,
        }
    }

    /// Attach the camera source used in camera mode
    pub fn with_camera(mut self, camera: Box<dyn MediaCaptureSource>) -> Self {
        self.camera = Some(Mutex::new(camera));
        self
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    /// Language used by the next recommendation fetch
    pub async fn set_language(&self, language: Language) {
        let mut state = self.state.write().await;
        if state.language != language {
            info!(from = %state.language, to = %language, "Recommendation language changed");
            state.language = language;
        }
    }

    /// Tab switch: reset, then change input mode
    pub async fn switch_mode(&self, mode: InputMode) -> WorkflowState {
        self.reset().await;
        let mut state = self.state.write().await;
        state.input_mode = mode;
        debug!(mode = ?mode, "Input mode switched");
        state.clone()
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    pub async fn camera_is_open(&self) -> bool {
        match &self.camera {
            Some(camera) => camera.lock().await.is_open(),
            None => false,
        }
    }

    /// Acquire the camera stream
    pub async fn start_camera(&self) -> Result<(), CaptureError> {
        let Some(camera) = &self.camera else {
            return Err(self.reject(CaptureError::DeviceUnavailable(
                "no camera configured".to_string(),
            )));
        };

        let mut camera = camera.lock().await;
        if camera.is_open() {
            return Ok(());
        }
        match camera.open().await {
            Ok(()) => {
                self.event_bus.emit_lossy(ClientEvent::CameraOpened {
                    timestamp: Utc::now(),
                });
                Ok(())
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Release the camera stream if one is open; returns whether it was
    pub async fn release_camera(&self) -> bool {
        let Some(camera) = &self.camera else {
            return false;
        };
        let mut camera = camera.lock().await;
        if !camera.is_open() {
            return false;
        }
        camera.close().await;
        self.event_bus.emit_lossy(ClientEvent::CameraReleased {
            timestamp: Utc::now(),
        });
        true
    }

    /// Snapshot the open stream, release it, and submit the frame
    pub async fn capture_from_camera(&self) -> Result<WorkflowState, CaptureError> {
        let image = {
            let Some(camera) = &self.camera else {
                return Err(self.reject(CaptureError::NotOpen));
            };
            let mut camera = camera.lock().await;
            if !camera.is_open() {
                return Err(self.reject(CaptureError::NotOpen));
            }
            let image = match camera.snapshot().await {
                Ok(image) => image,
                Err(e) => return Err(self.reject(e)),
            };
            camera.close().await;
            self.event_bus.emit_lossy(ClientEvent::CameraReleased {
                timestamp: Utc::now(),
            });
            image
        };

        Ok(self.submit_image(image).await)
    }

    // ------------------------------------------------------------------
    // Upload paths
    // ------------------------------------------------------------------

    /// File picker input; a non-image leaves the state untouched
    pub async fn submit_file(&self, blob: FileBlob) -> Result<WorkflowState, CaptureError> {
        let image = ImageIngestAdapter::from_file(blob).map_err(|e| self.reject(e))?;
        Ok(self.submit_image(image).await)
    }

    /// Drag-and-drop input (first file only)
    pub async fn submit_drop(&self, files: Vec<FileBlob>) -> Result<WorkflowState, CaptureError> {
        let image = ImageIngestAdapter::from_drop(files).map_err(|e| self.reject(e))?;
        Ok(self.submit_image(image).await)
    }

    /// Encoded image input
    pub async fn submit_data_uri(&self, uri: &str) -> Result<WorkflowState, CaptureError> {
        let image = ImageIngestAdapter::from_data_uri(uri).map_err(|e| self.reject(e))?;
        Ok(self.submit_image(image).await)
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Run one full pass for `image` and return the resulting state
    ///
    /// Never returns while busy: failures end the pass in READY with a
    /// notice. If a newer pass (or a reset) overtakes this one, its results
    /// are discarded and the current state is returned unchanged.
    pub async fn submit_image(&self, image: CapturedImage) -> WorkflowState {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.clear_results();
            state.image = Some(image.clone());
            self.enter(&mut state, WorkflowPhase::Previewing);
            self.enter(&mut state, WorkflowPhase::Analyzing);
            state.generation
        };

        info!(
            generation,
            filename = image.filename(),
            mime = image.mime_type(),
            bytes = image.len(),
            "Submitting image for emotion analysis"
        );
        let analysis = self.analyzer.analyze(&image).await;

        let (emotion, language) = {
            let mut state = self.state.write().await;
            if self.is_stale(&state, generation) {
                return state.clone();
            }
            match analysis {
                Err(e) => {
                    warn!(generation, error = %e, "Emotion analysis failed");
                    self.fail(&mut state, ANALYSIS_FAILED_MESSAGE);
                    self.enter(&mut state, WorkflowPhase::Ready);
                    return state.clone();
                }
                Ok(None) => {
                    info!(generation, "No emotion detected, skipping recommendations");
                    self.enter(&mut state, WorkflowPhase::Ready);
                    return state.clone();
                }
                Ok(Some(result)) => {
                    info!(
                        generation,
                        emotion = %result.label,
                        confidence = result.confidence,
                        "Emotion detected"
                    );
                    state.emotion = Some(result);
                    self.event_bus.emit_lossy(ClientEvent::EmotionDetected {
                        generation,
                        emotion: result.label,
                        confidence: result.confidence,
                        timestamp: Utc::now(),
                    });
                    self.enter(&mut state, WorkflowPhase::Recommending);
                    (result.label, state.language)
                }
            }
        };

        let fetched = self.recommender.fetch(emotion, language).await;

        let mut state = self.state.write().await;
        if self.is_stale(&state, generation) {
            return state.clone();
        }
        match fetched {
            Ok(songs) => {
                state.selected_track = songs.first().cloned();
                state.recommendations = songs;
                self.event_bus.emit_lossy(ClientEvent::RecommendationsReady {
                    generation,
                    count: state.recommendations.len(),
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                warn!(generation, error = %e, "Recommendation fetch failed");
                state.recommendations.clear();
                state.selected_track = None;
                self.fail(&mut state, RECOMMENDATIONS_FAILED_MESSAGE);
            }
        }
        self.enter(&mut state, WorkflowPhase::Ready);
        info!(
            generation,
            songs = state.recommendations.len(),
            "Workflow pass complete"
        );
        state.clone()
    }

    /// Switch the player to `track`
    ///
    /// The track must be in the current list and have an embed URL.
    pub async fn select_track(&self, track: &Recommendation) -> Result<WorkflowState, CaptureError> {
        let mut state = self.state.write().await;
        if !state.recommendations.contains(track) {
            return Err(self.reject(CaptureError::TrackNotFound(track.title.clone())));
        }
        let Some(embed_url) = track.embed_url.clone() else {
            return Err(self.reject(CaptureError::PreviewUnavailable));
        };

        state.selected_track = Some(track.clone());
        debug!(title = %track.title, "Track selected");
        self.event_bus.emit_lossy(ClientEvent::TrackSelected {
            title: track.title.clone(),
            artist: track.artist.clone(),
            embed_url,
            timestamp: Utc::now(),
        });
        Ok(state.clone())
    }

    /// `select_track` by list position (0-based)
    pub async fn select_track_at(&self, index: usize) -> Result<WorkflowState, CaptureError> {
        let track = self.state.read().await.recommendations.get(index).cloned();
        match track {
            Some(track) => self.select_track(&track).await,
            None => Err(self.reject(CaptureError::TrackNotFound(format!("#{}", index + 1)))),
        }
    }

    /// Back to IDLE from any phase; releases the camera
    ///
    /// Advances the generation so an in-flight pass cannot repopulate the
    /// cleared state.
    pub async fn reset(&self) -> WorkflowState {
        let released = self.release_camera().await;

        let mut state = self.state.write().await;
        state.generation += 1;
        state.image = None;
        state.clear_results();
        self.enter(&mut state, WorkflowPhase::Idle);
        debug!(
            generation = state.generation,
            camera_released = released,
            "Workflow reset"
        );
        state.clone()
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn enter(&self, state: &mut WorkflowState, phase: WorkflowPhase) {
        let old_phase = state.phase;
        state.phase = phase;
        state.busy = phase.is_busy();
        if old_phase != phase {
            debug!(
                generation = state.generation,
                from = ?old_phase,
                to = ?phase,
                "Workflow phase changed"
            );
            self.event_bus.emit_lossy(ClientEvent::PhaseChanged {
                old_phase,
                new_phase: phase,
                generation: state.generation,
                timestamp: Utc::now(),
            });
        }
    }

    fn fail(&self, state: &mut WorkflowState, message: &str) {
        state.notice = Some(Notice {
            level: NoticeLevel::Error,
            message: message.to_string(),
        });
        self.event_bus.notify(NoticeLevel::Error, message);
    }

    fn is_stale(&self, state: &WorkflowState, generation: u64) -> bool {
        if state.generation == generation {
            return false;
        }
        debug!(
            generation,
            current_generation = state.generation,
            "Discarding result of superseded pass"
        );
        self.event_bus.emit_lossy(ClientEvent::StaleResultDiscarded {
            generation,
            current_generation: state.generation,
            timestamp: Utc::now(),
        });
        true
    }

    /// Notify the user about a rejected action and hand the error back
    fn reject(&self, err: CaptureError) -> CaptureError {
        warn!(error = %err, "Capture action rejected");
        self.event_bus.notify(NoticeLevel::Error, err.user_message());
        err
    }
}
