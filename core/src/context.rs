use crate::config::GcConfig;
use crate::errors::GcError;
use crate::runtime::gc::{CollectStats, Heap, HeapObject, HeapStats, InvariantViolation, ObjectRef, Payload};
use crate::vm::machine::RootStack;

/// A heap together with the operand stack that roots it.
///
/// All operations take the context explicitly; there is no global VM.
/// Any allocation may run a full collection before it returns.
#[derive(Debug)]
pub struct Context {
    config: GcConfig,
    heap: Heap,
    stack: RootStack,
}

impl Context {
    pub fn new() -> Self {
        Self::with_config(GcConfig::default())
    }

    pub fn with_config(config: GcConfig) -> Self {
        Self {
            heap: Heap::with_threshold(config.initial_threshold),
            stack: RootStack::with_capacity(config.stack_capacity),
            config,
        }
    }

    /// Allocates a leaf and pushes it. A full stack is reported before
    /// anything is allocated.
    pub fn push_leaf(&mut self, value: i64) -> Result<ObjectRef, GcError> {
        self.stack.ensure_room()?;
        let leaf = self.heap.alloc(Payload::Leaf(value), self.stack.roots())?;
        self.stack.push(leaf)?;
        Ok(leaf)
    }

    /// Replaces the top two entries with a pair of them. The top entry
    /// becomes the tail and the one below it the head, so the head is the
    /// operand pushed first.
    ///
    /// The pair is allocated while both operands are still on the stack,
    /// which keeps them rooted if the allocation triggers a collection.
    pub fn push_pair(&mut self) -> Result<ObjectRef, GcError> {
        self.stack.require(2)?;
        let tail = self.stack.peek_at(0)?;
        let head = self.stack.peek_at(1)?;
        let pair = self.heap.alloc(Payload::Pair { head, tail }, self.stack.roots())?;
        self.stack.pop()?;
        self.stack.pop()?;
        self.stack.push(pair)?;
        Ok(pair)
    }

    pub fn pop(&mut self) -> Result<ObjectRef, GcError> {
        self.stack.pop()
    }

    /// Collects regardless of the threshold.
    pub fn force_collect(&mut self) -> CollectStats {
        self.heap.collect(self.stack.roots())
    }

    pub fn live_object_count(&self) -> usize {
        self.heap.live_count()
    }

    pub fn set_head(&mut self, pair: ObjectRef, target: ObjectRef) -> Result<(), GcError> {
        self.heap.set_head(pair, target)
    }

    pub fn set_tail(&mut self, pair: ObjectRef, target: ObjectRef) -> Result<(), GcError> {
        self.heap.set_tail(pair, target)
    }

    pub fn get(&self, object: ObjectRef) -> Option<&HeapObject> {
        self.heap.get(object)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stack(&self) -> &RootStack {
        &self.stack
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    pub fn stats(&self) -> HeapStats {
        self.heap.stats()
    }

    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.heap.verify(self.stack.roots())
    }

    /// Empties the stack and collects, which reclaims the whole heap.
    pub fn destroy(mut self) -> CollectStats {
        self.stack.clear();
        let stats = self.heap.collect(&[]);
        log::info!(
            "context destroyed: {} object(s) reclaimed over {} collection(s)",
            stats.collected,
            self.heap.total_collections()
        );
        stats
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
