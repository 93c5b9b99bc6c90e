//! Runtime layer for modelrt.
//!
//! This module provides the runtime engine that sits between the host
//! process and the registered executor. The engine owns the registry
//! slot, exposes the registration entry points
//! (set_model_executor / clear_model_executor), runs models through the
//! current occupant, and wires its own clear hook into the host's
//! shutdown sequence.

pub mod engine;

pub use engine::ModelRuntime;
