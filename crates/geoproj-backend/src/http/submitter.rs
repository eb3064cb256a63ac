use async_trait::async_trait;
use geoproj_core::error::{GeoprojError, Result};
use geoproj_core::models::{SubmissionPayload, GENERIC_SUBMISSION_FAILURE};
use geoproj_core::ports::ProjectSubmitter;
use serde_json::Value;

/// Posts registration payloads to the project endpoint
pub struct HttpProjectSubmitter {
    /// Full endpoint URL (e.g., "http://localhost:8888/project")
    endpoint: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpProjectSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self { endpoint: endpoint.into(), client }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProjectSubmitter for HttpProjectSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Value> {
        tracing::info!(endpoint = %self.endpoint, project = %payload.name, "Submitting project");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| GeoprojError::Submission {
                message: format!("Failed to reach backend at {}: {}", self.endpoint, e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GeoprojError::Submission {
            message: format!("Failed to read backend response: {}", e),
        })?;

        if !status.is_success() {
            let message = failure_message(&body);
            tracing::warn!(%status, %message, "Backend rejected project");
            return Err(GeoprojError::Submission { message });
        }

        // A success status still needs a JSON body
        serde_json::from_str(&body).map_err(|_| {
            tracing::warn!(%status, "Backend returned a non-JSON success body");
            GeoprojError::Submission { message: failure_message(&body) }
        })
    }
}

/// Operator-facing message for a failed registration response
///
/// The body's `message` or `error` string, else the raw body text, else the
/// generic fallback.
pub fn failure_message(body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        let field = ["message", "error"].iter().find_map(|key| {
            fields.get(*key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
        });
        if let Some(message) = field {
            return message.to_string();
        }
    }

    let text = body.trim();
    if text.is_empty() {
        GENERIC_SUBMISSION_FAILURE.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_preferred() {
        assert_eq!(
            failure_message(r#"{"message":"Duplicate project","error":"Conflict"}"#),
            "Duplicate project"
        );
    }

    #[test]
    fn test_error_field_fallback() {
        assert_eq!(failure_message(r#"{"message":"","error":"Invalid zone"}"#), "Invalid zone");
    }

    #[test]
    fn test_raw_text_fallback() {
        assert_eq!(failure_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(failure_message(r#"{"status":500}"#), r#"{"status":500}"#);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(failure_message("   "), GENERIC_SUBMISSION_FAILURE);
    }
}
