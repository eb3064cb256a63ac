//! Guarded project registration.
//!
//! Phases are derived from state rather than stored:
//!
//! ```text
//! Idle --(inside click)--> ReadyToSubmit --(submit)--> Submitting
//!   ^                           ^                          |
//!   +-------(success)-----------|----------<---------------+
//!                               +------(failure)-----------+
//! ```
//!
//! The state mutex is never held across an `.await`; the submitter runs with
//! only the in-flight flag set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use geoproj_core::config::LayeredConfig;
use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::{
    CandidateRecord, ClassificationResult, Coordinate, MapViewport, ProjectDraft,
    ProjectedCoordinate, RegionConfig, SubmissionOutcome, SubmissionPayload, ZoneAttributeKeys,
};
use geoproj_core::ports::{MapView, ProjectSubmitter, RecordValidator};
use geoproj_geo::transform::from_web_mercator;
use geoproj_geo::{DatasetSet, PointClassifier};

use crate::selection::SelectionState;

/// Outcome message when a submission future is dropped before completing
pub const CANCELLED_MESSAGE: &str = "Submission cancelled";

/// Server-assigned and fixed values merged into every record
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub owner: String,
    pub code: u64,
    pub region: RegionConfig,
    pub viewport: MapViewport,
    pub keys: ZoneAttributeKeys,
    pub submit_timeout: Option<Duration>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

impl WorkflowSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            owner: config.owner.value.clone(),
            code: config.project_code.value,
            region: config.region.value.clone(),
            viewport: config.viewport.value.clone(),
            keys: config.attribute_keys(),
            submit_timeout: config.submit_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// No confirmed location
    Idle,
    /// A confirmed location is selected
    ReadyToSubmit,
    /// A submission is awaiting the backend
    Submitting,
}

#[derive(Debug, Default)]
struct WorkflowState {
    selection: SelectionState,
    draft: ProjectDraft,
    in_flight: bool,
    last_outcome: Option<SubmissionOutcome>,
    map_configured: bool,
}

/// Clears the in-flight flag if the submission future is dropped mid-flight
struct InFlightGuard<'a> {
    state: &'a Mutex<WorkflowState>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.in_flight = false;
            state.last_outcome = Some(SubmissionOutcome::Failed(CANCELLED_MESSAGE.to_string()));
            tracing::warn!("Submission cancelled before the backend replied");
        }
    }
}

/// Registration state machine over injected collaborators
pub struct RegistrationWorkflow<S, V> {
    settings: WorkflowSettings,
    classifier: PointClassifier,
    datasets: Arc<RwLock<DatasetSet>>,
    map: Arc<dyn MapView>,
    submitter: S,
    validator: V,
    state: Mutex<WorkflowState>,
}

impl<S, V> RegistrationWorkflow<S, V>
where
    S: ProjectSubmitter,
    V: RecordValidator,
{
    pub fn new(
        settings: WorkflowSettings,
        datasets: Arc<RwLock<DatasetSet>>,
        map: Arc<dyn MapView>,
        submitter: S,
        validator: V,
    ) -> Self {
        let classifier = PointClassifier::new(settings.keys.clone());
        Self {
            settings,
            classifier,
            datasets,
            map,
            submitter,
            validator,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Shared dataset set; loaders install into it while the workflow runs
    pub fn datasets(&self) -> Arc<RwLock<DatasetSet>> {
        Arc::clone(&self.datasets)
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Hand the viewport to the map surface, once
    pub fn show_map(&self) {
        {
            let mut state = self.lock_state();
            if state.map_configured {
                return;
            }
            state.map_configured = true;
        }
        self.map.configure(&self.settings.viewport);
    }

    /// Classify a click and update the selection
    ///
    /// Inside the boundary the marker moves to the point. Outside, the marker
    /// is cleared and `OutOfBounds` is returned; the selection has already
    /// been replaced either way.
    pub fn handle_click(&self, coordinate: Coordinate) -> Result<ClassificationResult> {
        self.show_map();

        let result = {
            let datasets = self.datasets.read().unwrap_or_else(PoisonError::into_inner);
            let mut state = self.lock_state();
            state.selection.on_map_click(coordinate, &datasets, &self.classifier)
        };

        if result.inside_boundary {
            self.map.place_marker(coordinate);
            tracing::info!(%coordinate, "Location selected");
            Ok(result)
        } else {
            self.map.clear_marker();
            tracing::info!(%coordinate, "Location rejected");
            Err(GeoprojError::OutOfBounds {
                longitude: coordinate.longitude,
                latitude: coordinate.latitude,
            })
        }
    }

    /// Click reported by the map surface in EPSG:3857
    pub fn handle_projected_click(
        &self,
        projected: ProjectedCoordinate,
    ) -> Result<ClassificationResult> {
        self.handle_click(from_web_mercator(projected))
    }

    pub fn selection(&self) -> SelectionState {
        self.lock_state().selection.clone()
    }

    pub fn phase(&self) -> WorkflowPhase {
        let state = self.lock_state();
        if state.in_flight {
            WorkflowPhase::Submitting
        } else if state.selection.is_confirmed() {
            WorkflowPhase::ReadyToSubmit
        } else {
            WorkflowPhase::Idle
        }
    }

    /// Retained draft (kept after a failed submission)
    pub fn draft(&self) -> ProjectDraft {
        self.lock_state().draft.clone()
    }

    pub fn update_draft(&self, draft: ProjectDraft) {
        self.lock_state().draft = draft;
    }

    /// Displayed period length for the retained draft
    pub fn period_years(&self) -> i32 {
        self.lock_state().draft.period_years()
    }

    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.lock_state().last_outcome.clone()
    }

    fn candidate(&self, state: &WorkflowState) -> CandidateRecord {
        // Unresolved zones are sent as empty strings
        let classification = state.selection.classification();
        let climate_zone =
            classification.and_then(|c| c.climate_zone.clone()).unwrap_or_default();
        let ecological_zone =
            classification.and_then(|c| c.ecological_zone.clone()).unwrap_or_default();

        CandidateRecord {
            name: state.draft.name.clone(),
            owner: self.settings.owner.clone(),
            code: self.settings.code,
            location: state.selection.confirmed_location(),
            country_region: self.settings.region.country_region.clone(),
            climate_zone,
            ecological_zone,
            start_year: state.draft.start_year,
            end_year: state.draft.end_year,
        }
    }

    /// Submit `draft` for the current selection
    ///
    /// Returns `Ok(Pending)` without side effects while another submission is
    /// in flight. Preconditions are checked on every call.
    pub async fn submit(&self, draft: ProjectDraft) -> Result<SubmissionOutcome> {
        let payload = {
            let mut state = self.lock_state();
            if state.in_flight {
                tracing::debug!("Submission already in flight, ignoring");
                return Ok(SubmissionOutcome::Pending);
            }
            state.draft = draft;

            if !state.selection.is_confirmed() {
                return Err(GeoprojError::Precondition {
                    reason: "no confirmed location".to_string(),
                });
            }

            let candidate = self.candidate(&state);
            let record = self.validator.validate(&candidate).map_err(GeoprojError::Validation)?;

            state.in_flight = true;
            state.last_outcome = Some(SubmissionOutcome::Pending);
            SubmissionPayload::from_record(&record, &self.settings.region)
        };

        let guard = InFlightGuard { state: &self.state, armed: true };
        let result = match self.settings.submit_timeout {
            Some(limit) => tokio::time::timeout(limit, self.submitter.submit(&payload))
                .await
                .unwrap_or_else(|_| {
                    Err(GeoprojError::Submission {
                        message: format!("Submission timed out after {:?}", limit),
                    })
                }),
            None => self.submitter.submit(&payload).await,
        };
        guard.disarm();

        let mut state = self.lock_state();
        state.in_flight = false;

        match result {
            Ok(body) => {
                state.selection.reset();
                state.draft = ProjectDraft::default();
                state.last_outcome = Some(SubmissionOutcome::Succeeded(body.clone()));
                drop(state);

                self.map.clear_marker();
                tracing::info!(project = %payload.name, "Project registered");
                Ok(SubmissionOutcome::Succeeded(body))
            }
            Err(e) => {
                let message = match e {
                    GeoprojError::Submission { message } => message,
                    other => other.to_string(),
                };
                state.last_outcome = Some(SubmissionOutcome::Failed(message.clone()));
                tracing::warn!(project = %payload.name, %message, "Project registration failed");
                Err(GeoprojError::Submission { message })
            }
        }
    }

    /// Submit the retained draft again
    pub async fn resubmit(&self) -> Result<SubmissionOutcome> {
        let draft = self.draft();
        self.submit(draft).await
    }

    /// Explicit user clear of selection, draft and marker
    pub fn clear(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            if state.in_flight {
                return Err(GeoprojError::Precondition {
                    reason: "a submission is in flight".to_string(),
                });
            }
            state.selection.reset();
            state.draft = ProjectDraft::default();
            state.last_outcome = None;
        }
        self.map.clear_marker();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapCommand, RecordingMapView};
    use crate::validator::ProjectValidator;
    use geoproj_backend::{MemoryProjectSubmitter, ScriptedResponse};
    use geoproj_core::models::{DatasetKind, Geometry, Zone};
    use geoproj_geo::ZoneDataset;
    use serde_json::{json, Value};

    type TestWorkflow = RegistrationWorkflow<MemoryProjectSubmitter, ProjectValidator>;

    const INSIDE: Coordinate = Coordinate { longitude: -51.5, latitude: -24.5 };
    const OUTSIDE: Coordinate = Coordinate { longitude: -40.0, latitude: -10.0 };

    fn zone(id: &str, min: [f64; 2], max: [f64; 2], properties: Value) -> Zone {
        Zone::new(id, Geometry::rectangle(min, max), properties.as_object().cloned().unwrap_or_default())
    }

    fn datasets() -> Arc<RwLock<DatasetSet>> {
        let mut set = DatasetSet::new_unloaded();
        set.install(ZoneDataset::ready(
            "boundary",
            DatasetKind::Boundary,
            vec![zone("pr", [-54.6, -26.7], [-48.0, -22.5], json!({}))],
            4326,
        ));
        set.install(ZoneDataset::ready(
            "climate-zone",
            DatasetKind::ClimateZone,
            vec![zone("c", [-54.6, -26.7], [-48.0, -22.5], json!({ "CLASS_NAME": "Warm Temperate Moist" }))],
            4326,
        ));
        Arc::new(RwLock::new(set))
    }

    fn workflow(submitter: MemoryProjectSubmitter) -> (TestWorkflow, Arc<RecordingMapView>) {
        let map = Arc::new(RecordingMapView::new());
        let workflow = RegistrationWorkflow::new(
            WorkflowSettings::default(),
            datasets(),
            map.clone(),
            submitter,
            ProjectValidator::with_current_year("Brasil - Paraná", 2026),
        );
        (workflow, map)
    }

    fn draft() -> ProjectDraft {
        ProjectDraft::new("Reforestation", 2026, 2028)
    }

    #[test]
    fn test_phases_follow_clicks() {
        let (workflow, map) = workflow(MemoryProjectSubmitter::new());
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);

        workflow.handle_click(INSIDE).unwrap();
        assert_eq!(workflow.phase(), WorkflowPhase::ReadyToSubmit);
        assert_eq!(map.marker(), Some(INSIDE));

        let err = workflow.handle_click(OUTSIDE).unwrap_err();
        assert!(matches!(err, GeoprojError::OutOfBounds { .. }));
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
        assert_eq!(map.marker(), None);
        assert_eq!(workflow.selection().classification().unwrap().coordinate, OUTSIDE);
    }

    #[test]
    fn test_map_configured_once() {
        let (workflow, map) = workflow(MemoryProjectSubmitter::new());
        workflow.show_map();
        workflow.handle_click(INSIDE).unwrap();

        let configures = map
            .commands()
            .into_iter()
            .filter(|c| matches!(c, MapCommand::Configure(_)))
            .count();
        assert_eq!(configures, 1);
    }

    #[tokio::test]
    async fn test_submit_without_selection_is_refused() {
        let (workflow, _) = workflow(MemoryProjectSubmitter::new());

        let err = workflow.submit(draft()).await.unwrap_err();

        assert!(matches!(err, GeoprojError::Precondition { .. }));
        assert_eq!(workflow.submitter().call_count(), 0);
        assert_eq!(workflow.draft(), draft());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_network() {
        let (workflow, _) = workflow(MemoryProjectSubmitter::new());
        workflow.handle_click(INSIDE).unwrap();

        let err = workflow.submit(ProjectDraft::new("", 2026, 2025)).await.unwrap_err();

        match err {
            GeoprojError::Validation(errors) => {
                assert!(errors.contains("name"));
                assert!(errors.contains("end_year"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(workflow.submitter().call_count(), 0);
        assert_eq!(workflow.phase(), WorkflowPhase::ReadyToSubmit);
    }

    #[tokio::test]
    async fn test_success_resets_selection_and_draft() {
        let (workflow, map) = workflow(MemoryProjectSubmitter::new());
        workflow.handle_click(INSIDE).unwrap();

        let outcome = workflow.submit(draft()).await.unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Succeeded(_)));
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
        assert!(workflow.selection().classification().is_none());
        assert_eq!(workflow.draft(), ProjectDraft::default());
        assert_eq!(map.marker(), None);

        let sent = &workflow.submitter().received()[0];
        assert_eq!(sent.climate_zone, "Warm Temperate Moist");
        assert_eq!(sent.ecological_zone, "");
        assert_eq!(sent.start_period, "2026-01-01");
    }

    #[tokio::test]
    async fn test_failure_retains_state() {
        let submitter =
            MemoryProjectSubmitter::with_script([ScriptedResponse::Reject("Server error".to_string())]);
        let (workflow, map) = workflow(submitter);
        workflow.handle_click(INSIDE).unwrap();

        let err = workflow.submit(draft()).await.unwrap_err();

        assert!(matches!(err, GeoprojError::Submission { ref message } if message == "Server error"));
        assert_eq!(workflow.phase(), WorkflowPhase::ReadyToSubmit);
        assert_eq!(workflow.draft(), draft());
        assert_eq!(workflow.period_years(), 3);
        assert_eq!(map.marker(), Some(INSIDE));
        assert_eq!(
            workflow.last_outcome(),
            Some(SubmissionOutcome::Failed("Server error".to_string()))
        );
    }

    #[tokio::test]
    async fn test_timeout_surfaces_submission_error() {
        let submitter = MemoryProjectSubmitter::new().with_delay(Duration::from_secs(5));
        let map = Arc::new(RecordingMapView::new());
        let settings = WorkflowSettings {
            submit_timeout: Some(Duration::from_millis(20)),
            ..WorkflowSettings::default()
        };
        let workflow = RegistrationWorkflow::new(
            settings,
            datasets(),
            map,
            submitter,
            ProjectValidator::with_current_year("Brasil - Paraná", 2026),
        );
        workflow.handle_click(INSIDE).unwrap();

        let err = workflow.submit(draft()).await.unwrap_err();

        assert!(
            matches!(err, GeoprojError::Submission { ref message } if message == "Submission timed out after 20ms")
        );
        assert_eq!(workflow.phase(), WorkflowPhase::ReadyToSubmit);
        assert_eq!(
            workflow.last_outcome(),
            Some(SubmissionOutcome::Failed("Submission timed out after 20ms".to_string()))
        );
    }

    #[tokio::test]
    async fn test_dropped_submission_clears_in_flight() {
        let submitter = MemoryProjectSubmitter::new().with_delay(Duration::from_secs(5));
        let (workflow, _) = workflow(submitter);
        workflow.handle_click(INSIDE).unwrap();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(20), workflow.submit(draft())).await;

        assert!(cancelled.is_err());
        assert_eq!(workflow.phase(), WorkflowPhase::ReadyToSubmit);
        assert_eq!(
            workflow.last_outcome(),
            Some(SubmissionOutcome::Failed(CANCELLED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_clear_resets_everything() {
        let (workflow, map) = workflow(MemoryProjectSubmitter::new());
        workflow.handle_click(INSIDE).unwrap();
        workflow.update_draft(draft());

        workflow.clear().unwrap();

        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
        assert_eq!(workflow.draft(), ProjectDraft::default());
        assert_eq!(map.marker(), None);
    }

    #[test]
    fn test_projected_click() {
        let (workflow, _) = workflow(MemoryProjectSubmitter::new());
        let projected = geoproj_geo::transform::to_web_mercator(INSIDE);

        let result = workflow.handle_projected_click(projected).unwrap();

        assert!((result.coordinate.longitude - INSIDE.longitude).abs() < 1e-9);
        assert!((result.coordinate.latitude - INSIDE.latitude).abs() < 1e-9);
    }
}
