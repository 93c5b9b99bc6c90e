//! # modelrt layers
//!
//! Built-in layers for modelrt executors.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs all executor runs with timing information
//! - `ValidationLayer`: Checks inputs against the model's declared specs
//!   before running
//!
//! ## Usage
//!
//! ```ignore
//! use modelrt_core::Layer;
//! use modelrt_layer::{LoggingLayer, ValidationLayer};
//!
//! let executor = LoggingLayer::new()
//!     .layer(ValidationLayer::new().layer(inner_executor));
//! runtime.set_model_executor(executor);
//! ```

pub mod logging;
pub mod validation;

// Re-exports
pub use logging::LoggingLayer;
pub use validation::ValidationLayer;
