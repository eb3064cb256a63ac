use async_trait::async_trait;

use crate::error::Result;
use crate::models::SubmissionPayload;

/// Port for the project registration backend
#[async_trait]
pub trait ProjectSubmitter: Send + Sync {
    /// Send one registration request
    ///
    /// Returns the backend's JSON body on success. Rejections surface as
    /// `GeoprojError::Submission` carrying the operator-facing message.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<serde_json::Value>;
}
