use crate::engine::error::Result;
use crate::engine::goal::GoalValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod http;
pub use http::{BlockingHttpGoalSource, HttpGoalSource};

/// Describes how to retrieve one observed value for a step.
///
/// A request without a body is a plain read (GET); a request carrying a JSON
/// body triggers an action on the device and reads back its result (POST).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRequest {
    /// Endpoint to query, e.g. a device status URL
    pub url: String,
    /// JSON payload to submit; `None` means a plain read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl GoalRequest {
    /// A plain read of `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: None,
        }
    }

    /// A submit-then-read of `url` with a JSON payload.
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Blocking goal retrieval: the caller blocks until a value is available or a
/// transport error occurs.
///
/// Each invocation yields exactly one value, comparable against the relevant
/// step's goal. Transport failures (unreachable host, non-success status,
/// timeout) are this collaborator's concern; the task core never sees them —
/// a failed retrieval simply means no `check` happens that cycle.
pub trait GoalSource: Send + Sync {
    /// Retrieve one observed value for the given request
    fn fetch(&self, request: &GoalRequest) -> Result<GoalValue>;
}

/// Non-blocking goal retrieval: the caller suspends and resumes with the
/// value, or fails with a transport error.
///
/// Same one-value-per-invocation contract as [`GoalSource`]. No two retrievals
/// for the same task should be in flight concurrently, since their results
/// would race against a single cursor.
#[async_trait]
pub trait AsyncGoalSource: Send + Sync {
    /// Retrieve one observed value for the given request
    async fn fetch(&self, request: &GoalRequest) -> Result<GoalValue>;
}
