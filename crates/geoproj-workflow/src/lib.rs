//! geoproj Workflow - Dataset loading and the guarded registration workflow
//!
//! The workflow is a state machine independent of any renderer. Collaborators
//! (map surface, submitter, validator) are injected.

pub mod loader;
pub mod map;
pub mod selection;
pub mod validator;
pub mod workflow;

pub use loader::{DatasetLoader, DatasetSource, DatasetSources};
pub use map::{LazyMapView, MapCommand, RecordingMapView};
pub use selection::SelectionState;
pub use validator::ProjectValidator;
pub use workflow::{RegistrationWorkflow, WorkflowPhase, WorkflowSettings};
