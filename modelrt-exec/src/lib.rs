//! # modelrt executors
//!
//! Executor implementations for modelrt.

pub mod eval;

// Re-exports
pub use eval::{EvalExecutor, EvalExecutorBuilder, OpHandler};

/// Create the reference executor with the built-in operator set
///
/// This is the executor a simplifier's value-inference pass registers by
/// default.
///
/// # Example
///
/// ```ignore
/// use modelrt_exec::reference;
///
/// runtime.set_model_executor(reference());
/// ```
pub fn reference() -> EvalExecutor {
    EvalExecutor::new()
}
