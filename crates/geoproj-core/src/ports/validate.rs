use crate::error::FieldErrors;
use crate::models::{CandidateRecord, ProjectRecord};

/// Port for project record validation
pub trait RecordValidator: Send + Sync {
    /// Accept a candidate as a complete record, or report per-field problems
    fn validate(&self, candidate: &CandidateRecord) -> Result<ProjectRecord, FieldErrors>;
}
