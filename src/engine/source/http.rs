use crate::engine::error::{Result, TaskError};
use crate::engine::goal::GoalValue;
use crate::engine::source::{AsyncGoalSource, GoalRequest, GoalSource};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

/// An async goal source backed by `reqwest`.
///
/// Issues a GET for plain [`GoalRequest`]s and a POST with a JSON body when a
/// payload is present, then parses the response body into a [`GoalValue`]
/// (JSON scalar when possible, trimmed raw text otherwise). Non-success
/// statuses are transport errors, never observed values.
pub struct HttpGoalSource {
    client: reqwest::Client,
}

impl HttpGoalSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TaskError::http(0, format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AsyncGoalSource for HttpGoalSource {
    async fn fetch(&self, request: &GoalRequest) -> Result<GoalValue> {
        debug!("fetching goal value from {}", request.url);

        let pending = match &request.body {
            Some(body) => self.client.post(&request.url).json(body),
            None => self.client.get(&request.url),
        };

        let response = pending.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::http(
                status.as_u16(),
                format!("goal endpoint {} returned {status}", request.url),
            ));
        }

        let body = response.text().await.map_err(|e| {
            TaskError::http(status.as_u16(), format!("failed to read response body: {e}"))
        })?;

        Ok(GoalValue::parse(&body))
    }
}

/// A blocking goal source backed by `reqwest::blocking`.
///
/// Same request and parsing contract as [`HttpGoalSource`], for callers that
/// poll from a plain thread. Must not be used from inside an async runtime;
/// use [`HttpGoalSource`] there instead.
pub struct BlockingHttpGoalSource {
    client: reqwest::blocking::Client,
}

impl BlockingHttpGoalSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TaskError::http(0, format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl GoalSource for BlockingHttpGoalSource {
    fn fetch(&self, request: &GoalRequest) -> Result<GoalValue> {
        debug!("fetching goal value from {}", request.url);

        let pending = match &request.body {
            Some(body) => self.client.post(&request.url).json(body),
            None => self.client.get(&request.url),
        };

        let response = pending.send().map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::http(
                status.as_u16(),
                format!("goal endpoint {} returned {status}", request.url),
            ));
        }

        let body = response.text().map_err(|e| {
            TaskError::http(status.as_u16(), format!("failed to read response body: {e}"))
        })?;

        Ok(GoalValue::parse(&body))
    }
}

fn map_transport_error(e: reqwest::Error) -> TaskError {
    if e.is_timeout() {
        TaskError::Timeout(format!("goal retrieval timed out: {e}"))
    } else if e.is_connect() {
        TaskError::Http {
            status: 0,
            message: format!("connection error: {e}"),
        }
    } else {
        TaskError::Http {
            status: e.status().map_or(0, |s| s.as_u16()),
            message: format!("goal retrieval failed: {e}"),
        }
    }
}
