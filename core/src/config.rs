use serde::Serialize;

/// Live-object count at which a fresh heap runs its first collection.
pub const DEFAULT_INITIAL_THRESHOLD: usize = 8;

/// Maximum number of roots the operand stack can hold.
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Tunables for a [`Context`](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GcConfig {
    /// Floor for the collection threshold. An empty heap resets to this.
    pub initial_threshold: usize,
    pub stack_capacity: usize,
}

impl GcConfig {
    pub fn new() -> Self {
        Self {
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
            stack_capacity: DEFAULT_STACK_CAPACITY,
        }
    }

    /// Sets the initial threshold. Zero is raised to one, otherwise every
    /// allocation into an empty heap would try to collect first.
    pub fn with_initial_threshold(mut self, threshold: usize) -> Self {
        self.initial_threshold = threshold.max(1);
        self
    }

    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }
}

impl Default for GcConfig {
    fn default() -> Self {
        Self::new()
    }
}
