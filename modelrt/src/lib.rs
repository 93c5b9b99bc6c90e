//! # modelrt
//!
//! Executor registration and lifecycle runtime for model inference.
//!
//! modelrt implements the contract between a host process and a runtime
//! that holds a persistent, shared-ownership reference to a model
//! executor: install the executor once at startup, borrow it per run, and
//! release the registry slot through an ordered shutdown sequence before
//! later teardown steps fire.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! modelrt = { version = "0.1", features = ["exec", "layers"] }
//! ```
//!
//! ```ignore
//! use modelrt::{ModelRuntime, ShutdownSequence};
//! use modelrt::exec::reference;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = ModelRuntime::new();
//! let mut shutdown = ShutdownSequence::new();
//!
//! // Install the executor; the registry now holds the only ownership
//! // share. Register the deferred clear before any later teardown hooks.
//! runtime.set_model_executor(reference());
//! runtime.register_shutdown(&mut shutdown);
//!
//! let outputs = runtime.execute(&model, &inputs).await?;
//!
//! // At exit: the clear hook runs first, then everything registered
//! // after it.
//! shutdown.run();
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Includes `exec` and `layers`
//! - `exec`: Reference executor implementation
//! - `layers`: Built-in layers (logging, validation)
//! - `full`: All features enabled

// Re-export core types and traits
pub use modelrt_core::*;

// Re-export executors under `exec` module
#[cfg(feature = "modelrt-exec")]
pub mod exec {
    //! Executor implementations.
    pub use modelrt_exec::*;
}

// Re-export layers under `layer` module
#[cfg(feature = "modelrt-layer")]
pub mod layer {
    //! Built-in middleware layers.
    pub use modelrt_layer::*;
}

// Convenience re-exports at root level for common types
pub use modelrt_core::{
    error::RtError,
    executor::ModelExecutor,
    layer::{Layer, LayeredExecutor},
    lifecycle::ShutdownSequence,
    registry::{ExecutorHandle, ExecutorRegistry},
    runtime::ModelRuntime,
    types::{
        DataType, ExecutorInfo, ModelGraph, Node, RunContext, Tensor, TensorData, TensorMap,
        TensorSpec,
    },
    Result,
};

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use modelrt::prelude::*;
    //! ```

    pub use crate::{
        DataType, Layer, ModelExecutor, ModelGraph, ModelRuntime, Node, Result, RtError,
        ShutdownSequence, Tensor, TensorMap, TensorSpec,
    };

    #[cfg(feature = "modelrt-exec")]
    pub use crate::exec::*;

    #[cfg(feature = "modelrt-layer")]
    pub use crate::layer::*;
}
