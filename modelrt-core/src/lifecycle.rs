//! Ordered shutdown sequencing.
//!
//! The host process owns one [`ShutdownSequence`] and registers named
//! teardown hooks on it in the order they must fire. Running the sequence
//! executes every hook exactly once; a sequence that is dropped without
//! being run executes its pending hooks on drop, so registered hooks fire
//! at the latest when the host's shutdown object unwinds.
//!
//! This is what guarantees the registry slot is cleared before any
//! teardown step sequenced after it runs.

struct ShutdownHook {
    name: String,
    hook: Box<dyn FnOnce() + Send>,
}

/// Explicit, host-owned shutdown order.
///
/// Hooks run in registration order, exactly once per process lifetime.
pub struct ShutdownSequence {
    hooks: Vec<ShutdownHook>,
    ran: bool,
}

impl ShutdownSequence {
    /// Create an empty shutdown sequence
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            ran: false,
        }
    }

    /// Register a named hook at the end of the sequence
    ///
    /// Hooks registered earlier run before hooks registered later.
    pub fn register(&mut self, name: impl Into<String>, hook: impl FnOnce() + Send + 'static) {
        let name = name.into();
        if self.ran {
            tracing::warn!(hook = %name, "hook registered after shutdown already ran; ignoring");
            return;
        }
        tracing::debug!(hook = %name, "registered shutdown hook");
        self.hooks.push(ShutdownHook {
            name,
            hook: Box::new(hook),
        });
    }

    /// Run all registered hooks in order
    ///
    /// Running a sequence twice is a logged no-op.
    pub fn run(&mut self) {
        if self.ran {
            tracing::warn!("shutdown sequence already ran");
            return;
        }
        self.ran = true;
        for hook in self.hooks.drain(..) {
            tracing::debug!(hook = %hook.name, "running shutdown hook");
            (hook.hook)();
        }
    }

    /// Whether the sequence has already run
    pub fn has_run(&self) -> bool {
        self.ran
    }

    /// Number of hooks still pending
    pub fn pending(&self) -> usize {
        self.hooks.len()
    }
}

impl Default for ShutdownSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSequence")
            .field("pending", &self.hooks.len())
            .field("ran", &self.ran)
            .finish()
    }
}

impl Drop for ShutdownSequence {
    fn drop(&mut self) {
        if !self.ran && !self.hooks.is_empty() {
            tracing::debug!(
                pending = self.hooks.len(),
                "shutdown sequence dropped without an explicit run; running pending hooks"
            );
            self.run();
        }
    }
}
