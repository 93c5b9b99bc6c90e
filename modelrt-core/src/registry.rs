//! Single-slot executor registry.
//!
//! The registry is the process-wide holder of the active model executor.
//! It stores one shared, reference-counted handle; the runtime borrows it
//! for the duration of a single run, and the host replaces or releases it
//! at well-defined lifecycle points.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::error::RtError;
use crate::executor::ModelExecutor;

/// Shared handle to the registered executor.
///
/// The registry holds the long-lived ownership share; handles returned by
/// [`ExecutorRegistry::borrow`] are transient and keep an in-flight run
/// valid even if the slot is cleared concurrently.
pub type ExecutorHandle = Arc<Box<dyn ModelExecutor>>;

/// Single-slot, shared-ownership holder for the active executor.
///
/// At most one executor is registered at a time: `set` replaces and
/// releases any prior occupant, `clear` empties the slot. Reads go through
/// an atomic shared-pointer swap, so `borrow` is lock-free and safe under
/// concurrent access.
pub struct ExecutorRegistry {
    slot: ArcSwapOption<Box<dyn ModelExecutor>>,
}

impl ExecutorRegistry {
    /// Create a registry with an empty slot
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::const_empty(),
        }
    }

    /// Install an executor as the slot occupant
    ///
    /// Takes shared ownership; the caller needs no handle of its own after
    /// this call. Replacing an existing occupant releases the old
    /// ownership share.
    pub fn set<E: ModelExecutor>(&self, executor: E) {
        self.set_boxed(Box::new(executor));
    }

    /// Install an already-boxed executor
    pub fn set_boxed(&self, executor: Box<dyn ModelExecutor>) {
        let id = executor.info().id.clone();
        let previous = self.slot.swap(Some(Arc::new(executor)));
        match previous {
            Some(old) => tracing::debug!(
                executor = %id,
                replaced = %old.info().id,
                "replaced model executor"
            ),
            None => tracing::debug!(executor = %id, "registered model executor"),
        }
    }

    /// Release the current occupant, if any
    ///
    /// A no-op on an empty slot. Depends on nothing but the slot's own
    /// storage, so it is safe to call from a teardown context.
    pub fn clear(&self) {
        if let Some(old) = self.slot.swap(None) {
            tracing::debug!(executor = %old.info().id, "cleared model executor");
        }
    }

    /// Borrow the current occupant for the duration of one call
    pub fn borrow(&self) -> Result<ExecutorHandle, RtError> {
        self.slot.load_full().ok_or(RtError::NoExecutorRegistered)
    }

    /// Whether the slot currently holds an executor
    pub fn is_registered(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl Drop for ExecutorRegistry {
    fn drop(&mut self) {
        // Teardown-ordering diagnostic: the slot should have been cleared
        // through the shutdown sequence before the registry itself goes away.
        if let Some(executor) = self.slot.load().as_ref() {
            tracing::warn!(
                executor = %executor.info().id,
                "executor still registered at registry teardown; \
                 clear was not invoked before drop"
            );
        }
    }
}
