//! Error and retry-policy types for sprint board operations.
//!
//! [`BoardError`] is the single failure taxonomy surfaced by every public
//! operation. Predicates such as "is the board empty?" return a definite
//! `bool` on success; a failed resolution or read is always an error, never a
//! `false`.
//!
//! [`RetryPolicy`] lets callers decide whether to re-invoke an operation. The
//! board code itself never retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the board domain and its adapters.
pub type BoardResult<T> = Result<T, BoardError>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable`: network failures, HTTP 5xx, rate-limit responses.
/// - `NonRetryable`: everything that reflects the board's schema or contents
///   (missing project, missing `Status` field, no item to move, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// Retrying will produce the same failure.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Board errors
// ---------------------------------------------------------------------------

/// Failures of board resolution, reads, and mutations.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum BoardError {
    /// The HTTP round trip failed, or the API answered with a non-success
    /// status.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
        /// Seconds from a `Retry-After` header, when the server sent one.
        retry_after_secs: Option<u64>,
    },

    /// The API answered successfully but reported application-level errors.
    #[error("Remote query failed: {}", summarise_errors(.errors))]
    RemoteQuery {
        /// The raw `errors` array from the response.
        errors: Vec<serde_json::Value>,
    },

    /// No project owned by the organization or user has this exact title.
    #[error("Project '{name}' not found for owner '{owner}'")]
    ProjectNotFound { name: String, owner: String },

    /// The project has no single-select field named `Status`.
    #[error("Project '{project}' has no 'Status' field")]
    StatusFieldMissing { project: String },

    /// The project has more than one single-select field named `Status`.
    #[error("Project '{project}' has {count} fields named 'Status'")]
    DuplicateStatusField { project: String, count: usize },

    /// Two `Status` options share a name.
    #[error("Duplicate 'Status' option name: {name}")]
    DuplicateOptionName { name: String },

    /// The requested status is not an option of the project's `Status` field.
    #[error("Status '{status}' not found in project '{project}'")]
    UnknownStatus { status: String, project: String },

    /// No issue-backed item currently holds the requested status.
    #[error("No items found with status '{status}' in project '{project}'")]
    NoSuchItem { status: String, project: String },

    /// The response did not have the expected shape.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl BoardError {
    /// Builds a [`BoardError::MalformedResponse`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Returns how a caller should treat this error when deciding to retry.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport {
                status,
                retry_after_secs,
                ..
            } => {
                let after = retry_after_secs.map(Duration::from_secs);
                match status {
                    None => RetryPolicy::Retryable { after },
                    Some(code) if *code >= 500 || *code == 429 => RetryPolicy::Retryable { after },
                    // GitHub signals secondary rate limits with 403 + Retry-After.
                    Some(403) if after.is_some() => RetryPolicy::Retryable { after },
                    Some(_) => RetryPolicy::NonRetryable,
                }
            }
            _ => RetryPolicy::NonRetryable,
        }
    }
}

fn summarise_errors(errors: &[serde_json::Value]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
        .collect();
    if messages.is_empty() {
        serde_json::Value::Array(errors.to_vec()).to_string()
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn transport(status: Option<u16>, retry_after_secs: Option<u64>) -> BoardError {
        BoardError::Transport {
            status,
            message: String::new(),
            retry_after_secs,
        }
    }

    #[rstest]
    #[case(None, None, RetryPolicy::Retryable { after: None })]
    #[case(Some(502), None, RetryPolicy::Retryable { after: None })]
    #[case(Some(429), Some(30), RetryPolicy::Retryable { after: Some(Duration::from_secs(30)) })]
    #[case(Some(403), Some(60), RetryPolicy::Retryable { after: Some(Duration::from_secs(60)) })]
    #[case(Some(403), None, RetryPolicy::NonRetryable)]
    #[case(Some(401), None, RetryPolicy::NonRetryable)]
    fn transport_retry_policy(
        #[case] status: Option<u16>,
        #[case] retry_after: Option<u64>,
        #[case] expected: RetryPolicy,
    ) {
        assert_eq!(transport(status, retry_after).retry_policy(), expected);
    }

    #[test]
    fn domain_errors_are_not_retryable() {
        let err = BoardError::NoSuchItem {
            status: "Backlog".into(),
            project: "Release 1".into(),
        };
        assert_eq!(err.retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn remote_query_message_lists_error_messages() {
        let err = BoardError::RemoteQuery {
            errors: vec![
                json!({"message": "Could not resolve to an Organization with the login of 'octocat'."}),
                json!({"message": "second"}),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Remote query failed: Could not resolve to an Organization with the login of 'octocat'.; second"
        );
    }

    #[test]
    fn transport_message_includes_status() {
        let err = BoardError::Transport {
            status: Some(401),
            message: "Bad credentials".into(),
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Transport error (HTTP 401): Bad credentials");
    }
}
