//! # modelrt core
//!
//! Core abstractions and runtime for the modelrt executor-lifecycle
//! contract.
//!
//! This crate provides the executor capability trait, the single-slot
//! shared-ownership registry, the runtime engine that borrows the
//! registered executor per call, and the ordered shutdown sequencing
//! that releases the registry slot before later teardown steps run.

pub mod error;
pub mod executor;
pub mod layer;
pub mod lifecycle;
pub mod registry;
pub mod runtime;
pub mod types;

// Re-exports
pub use error::RtError;
pub use executor::ModelExecutor;
pub use layer::{Layer, LayeredExecutor};
pub use lifecycle::ShutdownSequence;
pub use registry::{ExecutorHandle, ExecutorRegistry};
pub use runtime::ModelRuntime;
pub use types::*;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RtError>;
