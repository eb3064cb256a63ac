//! In-memory submitter for dry runs and tests.

use async_trait::async_trait;
use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::SubmissionPayload;
use geoproj_core::ports::ProjectSubmitter;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Scripted reply for the next submission
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Succeed with this body
    Accept(Value),
    /// Fail with this message
    Reject(String),
}

/// Records every payload and replies from a script
///
/// With an empty script every submission is accepted and the payload is
/// echoed back with a sequential `id`.
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectSubmitter {
    received: Arc<RwLock<Vec<SubmissionPayload>>>,
    script: Arc<RwLock<VecDeque<ScriptedResponse>>>,
    delay: Option<Duration>,
}

impl MemoryProjectSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies consumed in order, one per submission
    pub fn with_script(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        let submitter = Self::default();
        submitter
            .script
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(responses);
        submitter
    }

    /// Hold every submission for `delay` before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_response(&self, response: ScriptedResponse) {
        self.script.write().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    /// Payloads received so far, in order
    pub fn received(&self) -> Vec<SubmissionPayload> {
        self.received.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.received.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ProjectSubmitter for MemoryProjectSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Value> {
        let id = {
            let mut received = self.received.write().unwrap_or_else(PoisonError::into_inner);
            received.push(payload.clone());
            received.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.write().unwrap_or_else(PoisonError::into_inner).pop_front();
        match scripted {
            Some(ScriptedResponse::Accept(body)) => Ok(body),
            Some(ScriptedResponse::Reject(message)) => Err(GeoprojError::Submission { message }),
            None => {
                let mut body = serde_json::to_value(payload)
                    .map_err(|e| GeoprojError::Serialization(e.to_string()))?;
                if let Value::Object(fields) = &mut body {
                    fields.insert("id".to_string(), json!(id));
                }
                Ok(body)
            }
        }
    }
}
