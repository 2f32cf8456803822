// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The view controller. Every transition goes through `transition`, which
// stops the camera whenever the new state is not `Capturing`.

use mediscan_bridge::{CameraConstraints, CaptureSession, ImageArtifact, PickedFile, PreviewRegistry};
use mediscan_core::config::CaptureConfig;
use mediscan_core::error::{MediscanError, Result};
use mediscan_core::human_errors::{HumanError, humanize_error};
use mediscan_core::types::{CaptureSources, ResultField, SourceKind};
use mediscan_imaging::{RasterSurface, RgbaFrame};
use tracing::{debug, info, warn};

use crate::state::{Action, ViewState};
use crate::ticket::{AcquireOutcome, AcquireTicket, AnalysisOutcome, AnalysisRequest, RequestId};

const REQUESTING_CAMERA: &str = "Requesting camera access...";
const CAMERA_ACTIVE: &str = "Camera active. Ready to scan.";
const PHOTO_CAPTURED: &str = "Photo captured successfully! Ready to scan & analyze.";
const CAMERA_STOPPED: &str = "Camera stopped.";
const PHOTO_DISCARDED: &str = "Photo discarded.";
const ANALYSIS_DONE: &str = "Analysis complete.";
const CONFIRMED: &str = "Confirmed.";

/// Owns the view state and the resources tied to it.
///
/// At most one camera session and one image artifact exist at a time. The
/// session only exists while the state is `Capturing`.
#[derive(Debug)]
pub struct ViewController {
    sources: CaptureSources,
    constraints: CameraConstraints,
    previews: PreviewRegistry,
    surface: RasterSurface,
    state: ViewState,
    session: Option<CaptureSession>,
    pending_acquire: Option<u64>,
    artifact: Option<ImageArtifact>,
    status: String,
    notice: Option<HumanError>,
    acquire_seq: u64,
    request_seq: u64,
}

impl ViewController {
    pub fn new(config: &CaptureConfig, previews: PreviewRegistry) -> Self {
        Self {
            sources: config.sources,
            constraints: CameraConstraints::from(config),
            previews,
            surface: RasterSurface::new(),
            state: ViewState::Splash,
            session: None,
            pending_acquire: None,
            artifact: None,
            status: String::new(),
            notice: None,
            acquire_seq: 0,
            request_seq: 0,
        }
    }

    // -- Accessors --

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// One-line message for the status bar.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The error behind the current status line, if it is one.
    pub fn notice(&self) -> Option<&HumanError> {
        self.notice.as_ref()
    }

    pub fn sources(&self) -> CaptureSources {
        self.sources
    }

    pub fn artifact(&self) -> Option<&ImageArtifact> {
        self.artifact.as_ref()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Whether a camera stream with running tracks is held.
    pub fn has_live_stream(&self) -> bool {
        self.session.as_ref().is_some_and(CaptureSession::is_live)
    }

    /// Whether a camera request is outstanding.
    pub fn is_acquiring(&self) -> bool {
        self.pending_acquire.is_some()
    }

    /// The camera's current frame, for the live preview.
    pub fn live_frame(&self) -> Option<RgbaFrame> {
        self.session
            .as_ref()
            .and_then(CaptureSession::stream)
            .and_then(|stream| stream.current_frame())
    }

    /// The artifact's preview as a `data:` URL the web view can render.
    pub fn preview_data_url(&self) -> Option<String> {
        let artifact = self.artifact.as_ref()?;
        self.previews.data_url(artifact.preview_url())
    }

    /// Labelled result fields; empty unless the analysis is complete.
    pub fn result_fields(&self) -> Vec<ResultField> {
        match &self.state {
            ViewState::AnalysisComplete { result } => result.display_fields(),
            _ => Vec::new(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::AnalysisError { message } => Some(message),
            _ => None,
        }
    }

    /// Show an error raised outside the controller (e.g. by the file
    /// picker) in the status bar. The state is left as it is.
    pub fn report(&mut self, err: &MediscanError) {
        warn!(state = self.state.name(), error = %err, "action failed");
        let human = humanize_error(err);
        self.status.clone_from(&human.message);
        self.notice = Some(human);
    }

    // -- Camera --

    /// Enter `Capturing` and hand out a ticket for acquiring the camera.
    ///
    /// Any previous stream is stopped and the current image discarded first.
    pub fn start_camera(&mut self) -> Result<AcquireTicket> {
        self.require(Action::StartCamera)?;
        self.require_source(SourceKind::Camera)?;

        if let Some(mut session) = self.session.take() {
            session.release();
        }
        self.discard_artifact();

        self.acquire_seq += 1;
        self.pending_acquire = Some(self.acquire_seq);
        self.transition(ViewState::Capturing);
        self.set_status(REQUESTING_CAMERA);
        Ok(AcquireTicket::new(self.acquire_seq, self.constraints))
    }

    /// Apply the result of an acquisition.
    ///
    /// A stream for a ticket that is no longer current is stopped at once.
    /// A failure for the current ticket returns to `Splash` and is returned
    /// to the caller.
    pub fn camera_acquired(&mut self, outcome: AcquireOutcome) -> Result<()> {
        let current = self.pending_acquire == Some(outcome.seq)
            && matches!(self.state, ViewState::Capturing);
        if !current {
            info!(ticket = outcome.seq, state = self.state.name(), "camera outcome is stale");
            outcome.discard();
            return Ok(());
        }

        let AcquireOutcome { seq, stream } = outcome;
        self.pending_acquire = None;
        match stream {
            Ok(stream) => {
                info!(ticket = seq, stream = stream.id(), "camera active");
                self.session = Some(CaptureSession::new(stream));
                self.set_status(CAMERA_ACTIVE);
                Ok(())
            }
            Err(e) => {
                let e = self.fail(e);
                self.transition(ViewState::Splash);
                Err(e)
            }
        }
    }

    /// Capture the current frame and move to `Reviewing`.
    ///
    /// Without a live stream or a first frame this fails with `NotReady`
    /// and the camera stays up.
    pub fn take_photo(&mut self) -> Result<()> {
        self.require(Action::Shutter)?;
        let captured = match &self.session {
            Some(session) => session.capture(&mut self.surface),
            None => Err(MediscanError::NotReady),
        };
        let png = captured.map_err(|e| self.fail(e))?;

        let artifact = ImageArtifact::from_capture(png, &self.previews);
        self.replace_artifact(artifact);
        self.transition(ViewState::Reviewing);
        self.set_status(PHOTO_CAPTURED);
        Ok(())
    }

    /// Leave the camera or review screen for the home screen.
    pub fn back(&mut self) -> Result<()> {
        self.require(Action::Back)?;
        let status = match self.state {
            ViewState::Reviewing => PHOTO_DISCARDED,
            _ => CAMERA_STOPPED,
        };
        self.discard_artifact();
        self.transition(ViewState::Splash);
        self.set_status(status);
        Ok(())
    }

    // -- Upload and analysis --

    /// Accept a picked file and start analyzing it.
    ///
    /// A non-image file leaves the state as it was. A valid file replaces
    /// the current image and supersedes any request in flight.
    pub fn select_file(&mut self, file: PickedFile) -> Result<AnalysisRequest> {
        self.require(Action::SelectFile)?;
        self.require_source(SourceKind::Upload)?;

        let artifact = mediscan_bridge::select_file(file, &self.previews).map_err(|e| self.fail(e))?;
        self.replace_artifact(artifact);
        self.submit()
    }

    /// Submit the current image again (from review, home or after an error).
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest> {
        self.require(Action::Analyze)?;
        self.submit().map_err(|e| self.fail(e))
    }

    /// Apply an analysis outcome. Returns `false` when the outcome belongs to
    /// a request that is no longer current and was dropped.
    pub fn finish_analysis(&mut self, outcome: AnalysisOutcome) -> bool {
        let AnalysisOutcome { id, result } = outcome;
        let current = matches!(&self.state, ViewState::AnalysisPending { request } if *request == id);
        if !current {
            debug!(request = %id, state = self.state.name(), "discarding stale analysis outcome");
            return false;
        }

        match result {
            Ok(result) => {
                info!(request = %id, fields = result.len(), "analysis complete");
                self.set_status(ANALYSIS_DONE);
                self.transition(ViewState::AnalysisComplete { result });
            }
            Err(e) => {
                debug!(request = %id, "analysis failed");
                self.report(&e);
                let message = self.status.clone();
                self.transition(ViewState::AnalysisError { message });
            }
        }
        true
    }

    /// Acknowledge the result.
    pub fn confirm(&mut self) -> Result<()> {
        self.require(Action::Confirm)?;
        self.discard_artifact();
        self.transition(ViewState::Confirmed);
        self.set_status(CONFIRMED);
        Ok(())
    }

    /// Back to `Splash` from anywhere, dropping every resource.
    pub fn reset(&mut self) {
        self.discard_artifact();
        self.transition(ViewState::Splash);
        self.set_status("");
    }

    /// Release everything ahead of teardown. Dropping the controller has the
    /// same effect.
    pub fn shutdown(&mut self) {
        info!(state = self.state.name(), "view controller shutting down");
        self.reset();
    }

    // -- Internals --

    fn submit(&mut self) -> Result<AnalysisRequest> {
        let artifact = self.artifact.as_ref().ok_or(MediscanError::NoImage)?;
        let image = artifact.upload_payload();
        let name = artifact.filename().to_string();
        self.request_seq += 1;
        let id = RequestId(self.request_seq);
        info!(request = %id, filename = %name, bytes = image.bytes.len(), "analysis requested");
        self.transition(ViewState::AnalysisPending { request: id });
        self.set_status(&format!("Analyzing {name}..."));
        Ok(AnalysisRequest::new(id, image))
    }

    fn transition(&mut self, next: ViewState) {
        if !matches!(next, ViewState::Capturing) {
            self.pending_acquire = None;
            if let Some(mut session) = self.session.take() {
                session.release();
            }
        }
        debug!(from = self.state.name(), to = next.name(), "view transition");
        self.state = next;
    }

    fn require(&self, action: Action) -> Result<()> {
        if self.state.permits(action) {
            return Ok(());
        }
        debug!(state = self.state.name(), action = action.describe(), "action not permitted");
        Err(MediscanError::InvalidTransition {
            state: self.state.name(),
            action: action.describe(),
        })
    }

    fn require_source(&mut self, source: SourceKind) -> Result<()> {
        if self.sources.allows(source) {
            Ok(())
        } else {
            Err(self.fail(MediscanError::SourceDisabled(source)))
        }
    }

    fn replace_artifact(&mut self, artifact: ImageArtifact) {
        self.discard_artifact();
        self.artifact = Some(artifact);
    }

    fn discard_artifact(&mut self) {
        if let Some(old) = self.artifact.take() {
            old.release();
        }
    }

    fn set_status(&mut self, status: &str) {
        self.status.clear();
        self.status.push_str(status);
        self.notice = None;
    }

    fn fail(&mut self, err: MediscanError) -> MediscanError {
        self.report(&err);
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use mediscan_analysis::{AnalysisClient, Analyzer};
    use mediscan_bridge::{CameraFailure, SyntheticCamera};
    use mediscan_core::config::AnalysisConfig;
    use mediscan_core::human_errors::{CONNECTIVITY_MESSAGE, INVALID_FILE_MESSAGE, Severity};
    use mediscan_core::types::{AnalysisResult, UploadImage};

    use super::*;

    fn controller() -> ViewController {
        ViewController::new(&CaptureConfig::default(), PreviewRegistry::new())
    }

    fn png_bytes() -> Vec<u8> {
        RasterSurface::new()
            .rasterize(&RgbaFrame::solid(4, 3, [10, 20, 30, 255]).unwrap())
            .unwrap()
    }

    fn photo() -> PickedFile {
        PickedFile {
            name: "photo.png".into(),
            media_type: "image/png".into(),
            bytes: png_bytes(),
        }
    }

    fn notes() -> PickedFile {
        PickedFile {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
            bytes: b"take two daily".to_vec(),
        }
    }

    fn aspirin() -> AnalysisResult {
        let mut result = AnalysisResult::new();
        result.insert("medication_name", "Aspirin");
        result.insert("dosage_strength", "81 mg");
        result
    }

    /// Analyzer returning a fixed reply and counting calls.
    struct ScriptedAnalyzer {
        calls: AtomicUsize,
        reply: fn() -> Result<AnalysisResult>,
    }

    impl ScriptedAnalyzer {
        fn new(reply: fn() -> Result<AnalysisResult>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn analyze(&self, _image: UploadImage) -> Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    async fn open_camera(ctrl: &mut ViewController, camera: &SyntheticCamera) {
        let ticket = ctrl.start_camera().unwrap();
        let outcome = ticket.run(camera).await;
        ctrl.camera_acquired(outcome).unwrap();
    }

    #[tokio::test]
    async fn photo_upload_completes_with_labelled_fields() {
        let analyzer = ScriptedAnalyzer::new(|| Ok(aspirin()));
        let mut ctrl = controller();

        let request = ctrl.select_file(photo()).unwrap();
        assert!(matches!(ctrl.state(), ViewState::AnalysisPending { .. }));
        assert_eq!(request.image().filename, "photo.png");
        assert_eq!(request.image().media_type, "image/png");

        let outcome = request.run(&analyzer).await;
        assert!(ctrl.finish_analysis(outcome));
        assert_eq!(analyzer.calls(), 1);
        assert!(matches!(ctrl.state(), ViewState::AnalysisComplete { .. }));

        let fields = ctrl.result_fields();
        assert_eq!(fields[0].label, "Medication Name");
        assert_eq!(fields[0].value, "Aspirin");
        assert_eq!(fields[1].label, "Dosage / Strength");
    }

    #[test]
    fn text_file_is_rejected_without_leaving_splash() {
        let analyzer = ScriptedAnalyzer::new(|| Ok(aspirin()));
        let mut ctrl = controller();

        let err = ctrl.select_file(notes()).unwrap_err();
        assert!(matches!(err, MediscanError::InvalidFileType(_)));
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert_eq!(ctrl.status(), INVALID_FILE_MESSAGE);
        assert!(ctrl.artifact().is_none());
        assert_eq!(analyzer.calls(), 0);
    }

    #[test]
    fn rejected_file_keeps_the_current_image() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        ctrl.finish_analysis(request.outcome(Ok(aspirin())));

        ctrl.select_file(notes()).unwrap_err();
        assert!(matches!(ctrl.state(), ViewState::AnalysisComplete { .. }));
        assert_eq!(ctrl.artifact().map(ImageArtifact::filename), Some("photo.png"));
    }

    #[test]
    fn server_rejection_shows_its_message() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        let rejected = request.outcome(Err(MediscanError::ServerRejected {
            status: 500,
            message: "model unavailable".into(),
        }));

        assert!(ctrl.finish_analysis(rejected));
        assert_eq!(ctrl.error_message(), Some("model unavailable"));
        assert_eq!(ctrl.status(), "model unavailable");
        assert!(ctrl.artifact().is_some(), "image is kept for a retry");
    }

    #[test]
    fn unreachable_service_shows_generic_message() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        let failed = request.outcome(Err(MediscanError::ConnectionFailed("refused".into())));

        ctrl.finish_analysis(failed);
        assert_eq!(ctrl.error_message(), Some(CONNECTIVITY_MESSAGE));
    }

    #[tokio::test]
    async fn permission_denied_returns_home() {
        let camera = SyntheticCamera::new().failing_with(CameraFailure::PermissionDenied);
        let mut ctrl = controller();

        let ticket = ctrl.start_camera().unwrap();
        assert_eq!(ctrl.status(), REQUESTING_CAMERA);
        let err = ctrl.camera_acquired(ticket.run(&camera).await).unwrap_err();

        assert!(matches!(err, MediscanError::PermissionDenied(_)));
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert!(ctrl.status().contains("permissions"));
        assert!(ctrl.status().contains("NotAllowedError"));
        assert!(!ctrl.has_live_stream());
    }

    #[tokio::test]
    async fn missing_camera_returns_home_with_reason() {
        let camera = SyntheticCamera::new().failing_with(CameraFailure::NoDevice);
        let mut ctrl = controller();

        let ticket = ctrl.start_camera().unwrap();
        let err = ctrl.camera_acquired(ticket.run(&camera).await).unwrap_err();

        assert!(matches!(err, MediscanError::NoDeviceFound(_)));
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert!(ctrl.status().contains("NotFoundError"));
        assert!(ctrl.status().ends_with("Returning to home."));
        assert!(!ctrl.has_live_stream());
        assert!(!ctrl.is_acquiring());
        assert_eq!(camera.live_tracks(), 0);

        let notice = ctrl.notice().unwrap();
        assert!(notice.suggestion.contains("upload a photo"));
        assert_eq!(notice.severity, Severity::ActionRequired);
    }

    #[tokio::test]
    async fn unsupported_camera_returns_home() {
        let camera = SyntheticCamera::new().failing_with(CameraFailure::Unsupported);
        let mut ctrl = controller();

        let ticket = ctrl.start_camera().unwrap();
        ctrl.camera_acquired(ticket.run(&camera).await).unwrap_err();
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert_eq!(ctrl.status(), "Camera access is not supported on this device.");
    }

    #[tokio::test]
    async fn reacquiring_leaves_one_live_track() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();

        open_camera(&mut ctrl, &camera).await;
        assert_eq!(ctrl.status(), CAMERA_ACTIVE);
        open_camera(&mut ctrl, &camera).await;

        assert_eq!(camera.acquisitions(), 2);
        assert_eq!(camera.live_tracks(), 1);
        assert!(ctrl.has_live_stream());
    }

    #[tokio::test]
    async fn shutter_captures_and_stops_camera() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;
        assert!(ctrl.live_frame().is_some());

        ctrl.take_photo().unwrap();
        assert_eq!(ctrl.state(), &ViewState::Reviewing);
        assert_eq!(camera.live_tracks(), 0);
        assert!(ctrl.live_frame().is_none());

        let artifact = ctrl.artifact().unwrap();
        assert_eq!(artifact.source(), SourceKind::Camera);
        assert_eq!(artifact.media_type(), "image/png");
        assert_eq!(artifact.dimensions(), Some((320, 240)));
        assert!(ctrl.preview_data_url().unwrap().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn shutter_before_first_frame_is_not_ready() {
        let camera = SyntheticCamera::new().without_frames();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;

        let err = ctrl.take_photo().unwrap_err();
        assert!(matches!(err, MediscanError::NotReady));
        assert_eq!(ctrl.state(), &ViewState::Capturing);
        assert_eq!(ctrl.status(), "Camera not running or not ready yet.");
        assert_eq!(camera.live_tracks(), 1);
    }

    #[tokio::test]
    async fn shutter_while_still_acquiring_is_not_ready() {
        let mut ctrl = controller();
        let _ticket = ctrl.start_camera().unwrap();
        assert!(ctrl.is_acquiring());
        assert!(matches!(ctrl.take_photo(), Err(MediscanError::NotReady)));
    }

    #[tokio::test]
    async fn stream_arriving_after_back_is_released() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();

        let ticket = ctrl.start_camera().unwrap();
        ctrl.back().unwrap();
        let outcome = ticket.run(&camera).await;
        assert_eq!(camera.live_tracks(), 1);

        ctrl.camera_acquired(outcome).unwrap();
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert!(!ctrl.has_live_stream());
    }

    #[tokio::test]
    async fn stream_for_superseded_ticket_is_released() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();

        let first = ctrl.start_camera().unwrap();
        let second = ctrl.start_camera().unwrap();
        let late = first.run(&camera).await;
        ctrl.camera_acquired(second.run(&camera).await).unwrap();
        ctrl.camera_acquired(late).unwrap();

        assert_eq!(camera.live_tracks(), 1);
        assert!(ctrl.has_live_stream());
    }

    #[tokio::test]
    async fn back_from_camera_stops_it() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;

        ctrl.back().unwrap();
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert_eq!(ctrl.status(), CAMERA_STOPPED);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn back_from_review_discards_the_photo() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;
        ctrl.take_photo().unwrap();

        ctrl.back().unwrap();
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert_eq!(ctrl.status(), PHOTO_DISCARDED);
        assert!(ctrl.artifact().is_none());
        assert_eq!(ctrl.previews().live_count(), 0);
    }

    #[test]
    fn failed_analysis_keeps_its_suggestion_until_next_status() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        assert!(ctrl.notice().is_none());

        ctrl.finish_analysis(request.outcome(Err(MediscanError::ConnectionFailed("refused".into()))));
        let notice = ctrl.notice().unwrap();
        assert_eq!(notice.message, CONNECTIVITY_MESSAGE);
        assert!(notice.retriable);
        assert!(!notice.suggestion.is_empty());

        let _retry = ctrl.begin_analysis().unwrap();
        assert!(ctrl.notice().is_none());
    }

    #[test]
    fn upload_while_pending_supersedes_from_the_info_screen() {
        let mut ctrl = controller();
        let first = ctrl.select_file(photo()).unwrap();
        assert!(ctrl.state().permits(Action::SelectFile));

        let second = ctrl.select_file(photo()).unwrap();
        assert!(!ctrl.finish_analysis(first.outcome(Err(MediscanError::ConnectionFailed("late".into())))));
        assert!(ctrl.error_message().is_none());
        assert!(ctrl.finish_analysis(second.outcome(Ok(aspirin()))));
        assert!(matches!(ctrl.state(), ViewState::AnalysisComplete { .. }));
    }

    #[test]
    fn superseded_response_is_ignored() {
        let mut ctrl = controller();
        let first = ctrl.select_file(photo()).unwrap();
        let second = ctrl.select_file(photo()).unwrap();
        assert!(second.id() > first.id());

        assert!(!ctrl.finish_analysis(first.outcome(Ok(aspirin()))));
        assert!(matches!(ctrl.state(), ViewState::AnalysisPending { request } if *request == second.id()));

        let mut other = AnalysisResult::new();
        other.insert("medication_name", "Ibuprofen");
        assert!(ctrl.finish_analysis(second.outcome(Ok(other))));
        assert_eq!(ctrl.result_fields()[0].value, "Ibuprofen");
    }

    #[test]
    fn outcome_after_reset_is_ignored() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        ctrl.reset();

        assert!(!ctrl.finish_analysis(request.outcome(Ok(aspirin()))));
        assert_eq!(ctrl.state(), &ViewState::Splash);
    }

    #[test]
    fn retry_after_error_resubmits_the_same_image() {
        let mut ctrl = controller();
        let first = ctrl.select_file(photo()).unwrap();
        ctrl.finish_analysis(first.outcome(Err(MediscanError::MalformedResponse("html".into()))));

        let retry = ctrl.begin_analysis().unwrap();
        assert!(retry.id() > first.id());
        assert_eq!(retry.image().bytes, png_bytes());
        assert!(ctrl.finish_analysis(retry.outcome(Ok(aspirin()))));
        assert!(matches!(ctrl.state(), ViewState::AnalysisComplete { .. }));
    }

    #[tokio::test]
    async fn retake_after_error_discards_the_image() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        ctrl.finish_analysis(request.outcome(Err(MediscanError::ConnectionFailed("x".into()))));

        open_camera(&mut ctrl, &camera).await;
        assert_eq!(ctrl.state(), &ViewState::Capturing);
        assert!(ctrl.artifact().is_none());
        assert_eq!(ctrl.previews().live_count(), 0);
    }

    #[test]
    fn reported_errors_only_touch_the_status() {
        let mut ctrl = controller();
        ctrl.report(&MediscanError::Io(std::io::Error::other("disk gone")));
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert!(!ctrl.status().is_empty());
    }

    #[test]
    fn analyze_without_image_fails() {
        let mut ctrl = controller();
        assert!(matches!(ctrl.begin_analysis(), Err(MediscanError::NoImage)));
        assert_eq!(ctrl.state(), &ViewState::Splash);
    }

    #[test]
    fn disallowed_actions_leave_state_untouched() {
        let mut ctrl = controller();
        assert!(matches!(ctrl.confirm(), Err(MediscanError::InvalidTransition { .. })));
        assert!(matches!(ctrl.take_photo(), Err(MediscanError::InvalidTransition { .. })));
        assert!(matches!(ctrl.back(), Err(MediscanError::InvalidTransition { .. })));
        assert_eq!(ctrl.state(), &ViewState::Splash);

        let _pending = ctrl.select_file(photo()).unwrap();
        assert!(matches!(ctrl.begin_analysis(), Err(MediscanError::InvalidTransition { .. })));
        assert!(matches!(ctrl.start_camera(), Err(MediscanError::InvalidTransition { .. })));
        assert!(matches!(ctrl.state(), ViewState::AnalysisPending { .. }));
    }

    #[test]
    fn confirm_then_reset() {
        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        ctrl.finish_analysis(request.outcome(Ok(aspirin())));

        ctrl.confirm().unwrap();
        assert_eq!(ctrl.state(), &ViewState::Confirmed);
        assert!(ctrl.result_fields().is_empty());

        ctrl.reset();
        assert_eq!(ctrl.state(), &ViewState::Splash);
        assert!(ctrl.status().is_empty());
    }

    #[test]
    fn disabled_sources_are_refused() {
        let camera_only = CaptureConfig {
            sources: CaptureSources::Camera,
            ..CaptureConfig::default()
        };
        let mut ctrl = ViewController::new(&camera_only, PreviewRegistry::new());
        assert!(matches!(
            ctrl.select_file(photo()),
            Err(MediscanError::SourceDisabled(SourceKind::Upload))
        ));
        assert_eq!(ctrl.state(), &ViewState::Splash);

        let upload_only = CaptureConfig {
            sources: CaptureSources::Upload,
            ..CaptureConfig::default()
        };
        let mut ctrl = ViewController::new(&upload_only, PreviewRegistry::new());
        assert!(matches!(
            ctrl.start_camera(),
            Err(MediscanError::SourceDisabled(SourceKind::Camera))
        ));
    }

    #[tokio::test]
    async fn previews_do_not_leak() {
        let camera = SyntheticCamera::new();
        let previews = PreviewRegistry::new();
        let mut ctrl = ViewController::new(&CaptureConfig::default(), previews.clone());

        let _ = ctrl.select_file(photo()).unwrap();
        let _ = ctrl.select_file(photo()).unwrap();
        assert_eq!(previews.live_count(), 1);

        ctrl.reset();
        assert_eq!(previews.live_count(), 0);

        open_camera(&mut ctrl, &camera).await;
        ctrl.take_photo().unwrap();
        assert_eq!(previews.live_count(), 1);
        let url = ctrl.artifact().unwrap().preview_url().to_string();

        let _ = ctrl.select_file(photo()).unwrap();
        assert!(!previews.is_live(&url));
        assert_eq!(previews.live_count(), 1);

        drop(ctrl);
        assert_eq!(previews.live_count(), 0);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn shutdown_from_capturing_stops_camera() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;

        ctrl.shutdown();
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(ctrl.state(), &ViewState::Splash);
    }

    #[tokio::test]
    async fn dropping_controller_stops_camera() {
        let camera = SyntheticCamera::new();
        let mut ctrl = controller();
        open_camera(&mut ctrl, &camera).await;

        drop(ctrl);
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn upload_against_live_service() {
        use axum::Router;
        use axum::http::StatusCode;
        use axum::routing::post;

        let app = Router::new().route(
            "/api/analyze",
            post(|| async {
                (
                    StatusCode::OK,
                    axum::Json(serde_json::json!({
                        "medication_name": "Aspirin",
                        "directions": "Take one tablet daily",
                        "refills": 2,
                        "notes": null
                    })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = AnalysisClient::new(&AnalysisConfig {
            base_url: format!("http://{addr}"),
            ..AnalysisConfig::default()
        })
        .unwrap();
        let analyzer: Arc<dyn Analyzer> = Arc::new(client);

        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        let outcome = request.run(analyzer.as_ref()).await;
        assert!(ctrl.finish_analysis(outcome));

        let fields = ctrl.result_fields();
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels[..2], ["Medication Name", "Directions for Use"]);
        assert!(fields.iter().any(|f| f.key == "refills" && f.value == "2"));
        assert!(fields.iter().all(|f| f.key != "notes"));
    }

    #[tokio::test]
    async fn unreachable_service_through_client() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AnalysisClient::new(&AnalysisConfig {
            base_url: format!("http://{addr}"),
            timeout_secs: 2,
        })
        .unwrap();

        let mut ctrl = controller();
        let request = ctrl.select_file(photo()).unwrap();
        ctrl.finish_analysis(request.run(&client).await);
        assert_eq!(ctrl.error_message(), Some(CONNECTIVITY_MESSAGE));
    }

    #[test]
    fn camera_constraints_follow_config() {
        let config = CaptureConfig {
            width: 640,
            height: 480,
            prefer_rear_camera: false,
            ..CaptureConfig::default()
        };
        let mut ctrl = ViewController::new(&config, PreviewRegistry::new());
        let ticket = ctrl.start_camera().unwrap();
        assert_eq!(ticket.constraints().width, 640);
        assert_eq!(ticket.constraints().height, 480);
        assert_eq!(ticket.constraints().facing, mediscan_bridge::FacingMode::Any);
    }
}
