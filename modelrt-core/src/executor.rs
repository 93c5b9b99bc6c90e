//! Executor trait and core abstractions.

use crate::error::RtError;
use crate::types::{ExecutorInfo, ModelGraph, TensorMap};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core executor trait: the inference capability the runtime invokes.
///
/// An executor runs a model over named inputs and produces named outputs,
/// typically for shape or value inference during graph simplification.
/// Implementations take their arguments by reference and must not retain
/// them beyond the call. They must be safe to invoke zero or many times,
/// including after other executors have been registered and cleared.
#[async_trait]
pub trait ModelExecutor: Send + Sync + Debug + 'static {
    /// Get executor information
    fn info(&self) -> Arc<ExecutorInfo>;

    /// Run the model over the given inputs
    ///
    /// Failures (malformed model, shape mismatch, unsupported operator)
    /// surface as `RtError` values and propagate to whoever requested the
    /// run; they never abort the process and are never retried here.
    async fn run(&self, model: &ModelGraph, inputs: &TensorMap) -> Result<TensorMap, RtError>;
}
