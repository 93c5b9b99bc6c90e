//! Logging layer for executor runs.

use async_trait::async_trait;
use modelrt_core::error::RtError;
use modelrt_core::executor::ModelExecutor;
use modelrt_core::layer::{Layer, LayeredExecutor};
use modelrt_core::types::*;
use std::sync::Arc;

/// Logging layer that traces executor runs.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[modelrt]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ModelExecutor> Layer<E> for LoggingLayer {
    type LayeredExecutor = LoggingExecutor<E>;

    fn layer(&self, inner: E) -> Self::LayeredExecutor {
        LoggingExecutor {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Executor wrapped with logging
#[derive(Debug)]
pub struct LoggingExecutor<E> {
    inner: E,
    prefix: String,
}

#[async_trait]
impl<E: ModelExecutor> LayeredExecutor for LoggingExecutor<E> {
    type Inner = E;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_run(
        &self,
        model: &ModelGraph,
        inputs: &TensorMap,
    ) -> Result<TensorMap, RtError> {
        tracing::debug!(
            "{} run request: model={}, nodes={}, inputs={}",
            self.prefix,
            model.name,
            model.nodes.len(),
            inputs.len()
        );

        let start = std::time::Instant::now();
        let result = self.inner.run(model, inputs).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(outputs) => {
                tracing::debug!(
                    "{} run success: model={}, outputs={}, elapsed={:?}",
                    self.prefix,
                    model.name,
                    outputs.len(),
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!(
                    "{} run error: model={}, error={:?}, elapsed={:?}",
                    self.prefix,
                    model.name,
                    e,
                    elapsed
                );
            }
        }

        result
    }
}

#[async_trait]
impl<E: ModelExecutor> ModelExecutor for LoggingExecutor<E> {
    fn info(&self) -> Arc<ExecutorInfo> {
        LayeredExecutor::layered_info(self)
    }

    async fn run(&self, model: &ModelGraph, inputs: &TensorMap) -> Result<TensorMap, RtError> {
        LayeredExecutor::layered_run(self, model, inputs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EchoExecutor;

    #[async_trait]
    impl ModelExecutor for EchoExecutor {
        fn info(&self) -> Arc<ExecutorInfo> {
            Arc::new(ExecutorInfo {
                id: "echo".to_string(),
                name: "Echo".to_string(),
            })
        }

        async fn run(
            &self,
            _model: &ModelGraph,
            inputs: &TensorMap,
        ) -> Result<TensorMap, RtError> {
            Ok(inputs.clone())
        }
    }

    #[tokio::test]
    async fn test_logging_layer_forwards() {
        let executor = LoggingLayer::new().layer(EchoExecutor);
        assert_eq!(executor.info().id, "echo");

        let mut inputs = TensorMap::new();
        inputs.insert("x".to_string(), Tensor::scalar_f32(1.5));

        let outputs = executor
            .run(&ModelGraph::new("m"), &inputs)
            .await
            .unwrap();
        assert_eq!(outputs, inputs);
    }
}
