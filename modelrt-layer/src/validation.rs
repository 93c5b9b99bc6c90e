//! Input validation layer.
//!
//! Checks supplied inputs against the model's declared tensor specs
//! before the inner executor runs, so malformed feeds are rejected with a
//! precise error instead of surfacing mid-graph.

use async_trait::async_trait;
use modelrt_core::error::RtError;
use modelrt_core::executor::ModelExecutor;
use modelrt_core::layer::{Layer, LayeredExecutor};
use modelrt_core::types::*;
use std::sync::Arc;

/// Validation layer checking inputs against declared model specs.
#[derive(Debug, Clone, Default)]
pub struct ValidationLayer;

impl ValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<E: ModelExecutor> Layer<E> for ValidationLayer {
    type LayeredExecutor = ValidatingExecutor<E>;

    fn layer(&self, inner: E) -> Self::LayeredExecutor {
        ValidatingExecutor { inner }
    }
}

/// Executor wrapped with input validation
#[derive(Debug)]
pub struct ValidatingExecutor<E> {
    inner: E,
}

impl<E> ValidatingExecutor<E> {
    fn validate(model: &ModelGraph, inputs: &TensorMap) -> Result<(), RtError> {
        for spec in &model.inputs {
            let tensor = inputs
                .get(&spec.name)
                .ok_or_else(|| RtError::missing_input(&spec.name))?;
            if !tensor.is_well_formed() {
                return Err(RtError::shape_mismatch(
                    &spec.name,
                    format!("{} elements", tensor.element_count()),
                    format!("{} elements", tensor.data.len()),
                ));
            }
            spec.matches(tensor)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<E: ModelExecutor> LayeredExecutor for ValidatingExecutor<E> {
    type Inner = E;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_run(
        &self,
        model: &ModelGraph,
        inputs: &TensorMap,
    ) -> Result<TensorMap, RtError> {
        Self::validate(model, inputs)?;
        self.inner.run(model, inputs).await
    }
}

#[async_trait]
impl<E: ModelExecutor> ModelExecutor for ValidatingExecutor<E> {
    fn info(&self) -> Arc<ExecutorInfo> {
        LayeredExecutor::layered_info(self)
    }

    async fn run(&self, model: &ModelGraph, inputs: &TensorMap) -> Result<TensorMap, RtError> {
        LayeredExecutor::layered_run(self, model, inputs).await
    }
}
