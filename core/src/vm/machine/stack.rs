use crate::config::DEFAULT_STACK_CAPACITY;
use crate::errors::GcError;
use crate::runtime::gc::ObjectRef;

/// Fixed-capacity operand stack. Its contents are the collector's entire
/// root set; it never allocates or frees heap objects itself.
#[derive(Debug, Clone)]
pub struct RootStack {
    values: Vec<ObjectRef>,
    capacity: usize,
}

impl RootStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STACK_CAPACITY)
    }

    /// `capacity` is only a limit; storage grows on demand up to it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity.min(DEFAULT_STACK_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, value: ObjectRef) -> Result<(), GcError> {
        self.ensure_room()?;
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<ObjectRef, GcError> {
        self.values.pop().ok_or(GcError::StackUnderflow {
            needed: 1,
            available: 0,
        })
    }

    pub fn peek(&self) -> Result<ObjectRef, GcError> {
        self.peek_at(0)
    }

    /// Returns the entry `offset` places below the top.
    pub fn peek_at(&self, offset: usize) -> Result<ObjectRef, GcError> {
        self.require(offset + 1)?;
        Ok(self.values[self.values.len() - 1 - offset])
    }

    /// Returns the entry at `index`, counted from the bottom.
    pub fn get(&self, index: usize) -> Result<ObjectRef, GcError> {
        self.values
            .get(index)
            .copied()
            .ok_or(GcError::InvalidStackSlot {
                index,
                len: self.values.len(),
            })
    }

    pub(crate) fn ensure_room(&self) -> Result<(), GcError> {
        if self.values.len() >= self.capacity {
            return Err(GcError::StackOverflow {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub(crate) fn require(&self, needed: usize) -> Result<(), GcError> {
        if self.values.len() < needed {
            return Err(GcError::StackUnderflow {
                needed,
                available: self.values.len(),
            });
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn roots(&self) -> &[ObjectRef] {
        &self.values
    }
}

impl Default for RootStack {
    fn default() -> Self {
        Self::new()
    }
}
