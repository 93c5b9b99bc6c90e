//! ModelRuntime implementation.
//!
//! The runtime is the explicitly constructed owner of the executor
//! registry. Host code installs an executor once at startup, registers the
//! deferred clear on its shutdown sequence, and from then on every model
//! run goes through [`ModelRuntime::execute`], which borrows the slot
//! occupant for exactly one call.

use crate::error::RtError;
use crate::executor::ModelExecutor;
use crate::lifecycle::ShutdownSequence;
use crate::registry::ExecutorRegistry;
use crate::types::{ModelGraph, RunContext, TensorMap};
use std::sync::Arc;

/// Name under which the runtime registers its deferred clear hook.
pub const CLEAR_EXECUTOR_HOOK: &str = "clear-model-executor";

/// Runtime engine owning the executor registry.
///
/// There is no implicit global instance: the host constructs exactly one
/// runtime, and its lifetime brackets every executor registration.
///
/// # Example
///
/// ```ignore
/// let runtime = ModelRuntime::new();
/// let mut shutdown = ShutdownSequence::new();
///
/// runtime.set_model_executor(executor);
/// runtime.register_shutdown(&mut shutdown);
/// // ... later hooks tear down whatever the executor depends on
///
/// let outputs = runtime.execute(&model, &inputs).await?;
/// shutdown.run();
/// ```
#[derive(Debug, Clone)]
pub struct ModelRuntime {
    registry: Arc<ExecutorRegistry>,
}

impl ModelRuntime {
    /// Create a runtime with an empty registry slot
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ExecutorRegistry::new()),
        }
    }

    /// Get a reference to the registry
    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    /// Install an executor as the active occupant
    ///
    /// Replaces and releases any previous occupant. The caller does not
    /// need to keep its own handle after this call; the registry holds
    /// the long-lived ownership share.
    pub fn set_model_executor<E: ModelExecutor>(&self, executor: E) {
        self.registry.set(executor);
    }

    /// Release the active occupant, if any
    ///
    /// Safe to call at any point, including repeatedly and from teardown
    /// context.
    pub fn clear_model_executor(&self) {
        self.registry.clear();
    }

    /// Register the deferred clear on the host's shutdown sequence
    ///
    /// The hook holds its own registry handle, so at teardown time it
    /// depends on nothing beyond the slot's storage. Register it before
    /// the hooks that tear down whatever the executor references, and the
    /// slot is guaranteed empty when those later hooks fire.
    pub fn register_shutdown(&self, shutdown: &mut ShutdownSequence) {
        let registry = self.registry.clone();
        shutdown.register(CLEAR_EXECUTOR_HOOK, move || registry.clear());
    }

    /// Run a model through the registered executor
    ///
    /// Borrows the slot occupant for the duration of this one call. Fails
    /// fast with [`RtError::NoExecutorRegistered`] when invoked before
    /// registration or after teardown.
    pub async fn execute(
        &self,
        model: &ModelGraph,
        inputs: &TensorMap,
    ) -> Result<TensorMap, RtError> {
        let executor = self.registry.borrow()?;
        let ctx = RunContext::new(executor.info().id.clone(), model.name.clone());

        tracing::debug!(
            run_id = %ctx.run_id,
            executor = %ctx.executor_id,
            model = %ctx.model,
            nodes = model.nodes.len(),
            inputs = inputs.len(),
            "executing model"
        );

        let result = executor.run(model, inputs).await;

        match &result {
            Ok(outputs) => {
                tracing::debug!(
                    run_id = %ctx.run_id,
                    outputs = outputs.len(),
                    "model execution finished"
                );
            }
            Err(err) => {
                tracing::error!(
                    run_id = %ctx.run_id,
                    error = %err,
                    "model execution failed"
                );
            }
        }

        result
    }
}

impl Default for ModelRuntime {
    fn default() -> Self {
        Self::new()
    }
}
