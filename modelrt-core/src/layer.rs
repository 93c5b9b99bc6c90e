//! Layer trait and abstractions.
//!
//! Layers provide a composable way to wrap executors with cross-cutting
//! concerns like logging and input validation before they are handed to
//! the registry.

use crate::error::RtError;
use crate::executor::ModelExecutor;
use crate::types::{ExecutorInfo, ModelGraph, TensorMap};
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping executors.
///
/// Each layer wraps an inner executor and returns a new executor with
/// enhanced capabilities. Composition is statically dispatched: stacking
/// layers builds a concrete nested type before the result is boxed into
/// the registry.
pub trait Layer<E: ModelExecutor> {
    /// The type of the layered executor
    type LayeredExecutor: ModelExecutor;

    /// Wrap the inner executor with this layer
    fn layer(&self, inner: E) -> Self::LayeredExecutor;
}

/// Helper trait for layered executors.
///
/// Provides default forwarding implementations, so implementers only need
/// to override the methods they want to intercept.
#[async_trait]
pub trait LayeredExecutor: Sized + ModelExecutor {
    /// The inner executor type
    type Inner: ModelExecutor;

    /// Get a reference to the inner executor
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<ExecutorInfo> {
        self.inner().info()
    }

    /// Default implementation for run - forwards to inner
    async fn layered_run(
        &self,
        model: &ModelGraph,
        inputs: &TensorMap,
    ) -> Result<TensorMap, RtError> {
        self.inner().run(model, inputs).await
    }
}
