//! Error types for runtime operations.

use crate::types::DataType;

/// The main error type for runtime operations.
#[derive(Debug, thiserror::Error)]
pub enum RtError {
    /// No executor is installed in the registry slot
    #[error("no model executor registered")]
    NoExecutorRegistered,

    /// The model graph itself is inconsistent
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// Tensor dimensions did not match what an operation required
    #[error("shape mismatch for '{name}': expected {expected}, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Tensor element type did not match the declared type
    #[error("dtype mismatch for '{name}': expected {expected}, got {actual}")]
    DTypeMismatch {
        name: String,
        expected: DataType,
        actual: DataType,
    },

    /// The executor does not implement the requested operator
    #[error("unsupported operator: {0}")]
    UnsupportedOp(String),

    /// A declared model input was not supplied
    #[error("missing input tensor: {0}")]
    MissingInput(String),

    /// Generic executor failure
    #[error("execution error: {0}")]
    Execution(String),

    /// Builder or registration misuse
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RtError {
    /// Create a malformed model error
    pub fn malformed_model(msg: impl Into<String>) -> Self {
        Self::MalformedModel(msg.into())
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unsupported operator error
    pub fn unsupported_op(msg: impl Into<String>) -> Self {
        Self::UnsupportedOp(msg.into())
    }

    /// Create a missing input error
    pub fn missing_input(name: impl Into<String>) -> Self {
        Self::MissingInput(name.into())
    }

    /// Create a generic execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this error came out of an executor's `run`
    ///
    /// Execution failures propagate to whoever requested the run and are
    /// never retried automatically.
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            RtError::MalformedModel(_)
                | RtError::ShapeMismatch { .. }
                | RtError::DTypeMismatch { .. }
                | RtError::UnsupportedOp(_)
                | RtError::MissingInput(_)
                | RtError::Execution(_)
        )
    }
}

impl From<String> for RtError {
    fn from(s: String) -> Self {
        Self::Execution(s)
    }
}

impl From<&str> for RtError {
    fn from(s: &str) -> Self {
        Self::Execution(s.to_string())
    }
}
