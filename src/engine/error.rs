use thiserror::Error;

/// Main error type for the step-progression engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskError {
    /// Activation attempted with missing goals or an invalid step count
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configuration call targeted a step index outside `1..=step_count`
    #[error("Step {step} is out of bounds (task has {max} steps)")]
    OutOfBounds { step: usize, max: usize },

    /// `check` invoked before `begin` succeeded
    #[error("Task not initialized (call begin() first)")]
    NotInitialized,

    /// A name query targeted a step with no configured name
    #[error("No name set for step {step}")]
    NameNotFound { step: usize },

    /// `set_all_step_names` called with the wrong number of names
    #[error("Expected {expected} step names, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Goal-retrieval transport errors
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Goal-retrieval timeouts
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// JSON serialization/deserialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// I/O errors (definition file reading, etc.)
    #[error("IO error: {0}")]
    Io(String),
}

impl TaskError {
    /// Creates a new HTTP error
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        TaskError::Http {
            status,
            message: message.into(),
        }
    }

    /// Convert from std::io::Error
    pub fn from_io(err: std::io::Error) -> Self {
        TaskError::Io(err.to_string())
    }

    /// Convert from serde_json::Error
    pub fn from_serde(err: serde_json::Error) -> Self {
        TaskError::Deserialization(err.to_string())
    }

    /// Determines if this error is worth retrying.
    ///
    /// Retryable errors are transient transport failures that might succeed on
    /// a later poll cycle. Configuration and state-machine errors will fail the
    /// same way every time until the caller fixes the task setup.
    pub fn retryable(&self) -> bool {
        match self {
            TaskError::Http { status, .. } => {
                // Retry on server errors (5xx) and transient client errors;
                // status 0 means the connection itself failed
                *status >= 500 || *status == 429 || *status == 408 || *status == 0
            }
            TaskError::Timeout(_) => true,
            TaskError::Io(_) => true,

            TaskError::Configuration(_) => false,
            TaskError::OutOfBounds { .. } => false,
            TaskError::NotInitialized => false,
            TaskError::NameNotFound { .. } => false,
            TaskError::LengthMismatch { .. } => false,
            TaskError::Deserialization(_) => false,
        }
    }
}

/// Type alias for Result with TaskError
pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TaskError::http(500, "Internal Server Error").retryable());
        assert!(TaskError::http(503, "Service Unavailable").retryable());
        assert!(TaskError::http(429, "Too Many Requests").retryable());
        assert!(TaskError::http(408, "Request Timeout").retryable());
        assert!(TaskError::http(0, "Connection Error").retryable());
        assert!(TaskError::Timeout("connect timeout".to_string()).retryable());
        assert!(TaskError::Io("network error".to_string()).retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!TaskError::http(400, "Bad Request").retryable());
        assert!(!TaskError::http(404, "Not Found").retryable());
        assert!(!TaskError::Configuration("no goals".to_string()).retryable());
        assert!(!TaskError::OutOfBounds { step: 5, max: 3 }.retryable());
        assert!(!TaskError::NotInitialized.retryable());
        assert!(!TaskError::NameNotFound { step: 2 }.retryable());
        assert!(
            !TaskError::LengthMismatch {
                expected: 3,
                got: 2
            }
            .retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = TaskError::OutOfBounds { step: 5, max: 3 };
        assert_eq!(
            err.to_string(),
            "Step 5 is out of bounds (task has 3 steps)"
        );

        let err = TaskError::NameNotFound { step: 2 };
        assert_eq!(err.to_string(), "No name set for step 2");
    }
}
