use serde::Serialize;

use crate::config::DEFAULT_INITIAL_THRESHOLD;
use crate::errors::GcError;

use super::marker;
use super::object::{HeapObject, ObjectKind, ObjectRef, Payload};
use super::sweeper;
use super::trace::{Trace, Tracer};

/// Arena slot. The generation is bumped each time the slot is freed.
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) object: Option<HeapObject>,
}

/// Result of one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectStats {
    pub before: usize,
    pub after: usize,
    pub collected: usize,
    /// Threshold in effect once the cycle finished.
    pub threshold: usize,
}

/// Point-in-time summary of heap state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    pub live: usize,
    pub leaves: usize,
    pub pairs: usize,
    pub threshold: usize,
    pub initial_threshold: usize,
    pub slots: usize,
    pub free_slots: usize,
    pub total_allocations: usize,
    pub total_collections: usize,
    pub total_freed: usize,
}

/// Stop-the-world mark-and-sweep heap.
///
/// Objects live in a slot arena; freed slots are recycled through a free
/// list. Allocation runs a full collection first whenever the live count
/// has reached the threshold. After each sweep the threshold becomes twice
/// the surviving count, or the initial threshold if nothing survived.
#[derive(Debug)]
pub struct Heap {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live_count: usize,
    collect_threshold: usize,
    initial_threshold: usize,
    total_allocations: usize,
    total_collections: usize,
    total_freed: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_INITIAL_THRESHOLD)
    }

    pub fn with_threshold(initial_threshold: usize) -> Self {
        let initial_threshold = initial_threshold.max(1);
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live_count: 0,
            collect_threshold: initial_threshold,
            initial_threshold,
            total_allocations: 0,
            total_collections: 0,
            total_freed: 0,
        }
    }

    /// Allocates `payload`, collecting first if the threshold was reached.
    ///
    /// `roots` is the complete root set for that collection. References held
    /// by `payload` itself are kept alive too, since the new object will own
    /// them as soon as it exists.
    pub fn alloc(&mut self, payload: Payload, roots: &[ObjectRef]) -> Result<ObjectRef, GcError> {
        self.check_payload(&payload)?;

        if self.should_collect() {
            let mut pending = Tracer::new();
            payload.trace(&mut pending);
            let pending: Vec<ObjectRef> = pending.drain().collect();
            self.collect_from(roots.iter().chain(pending.iter()).copied());
        }

        let index = match self.free_list.pop() {
            Some(index) => index,
            None => self.grow()?,
        };

        let slot = &mut self.slots[index as usize];
        slot.object = Some(HeapObject::new(payload));
        let handle = ObjectRef::new(index, slot.generation);

        self.live_count += 1;
        self.total_allocations += 1;
        log::trace!("allocated {} {handle} (live {})", payload.kind(), self.live_count);
        Ok(handle)
    }

    fn grow(&mut self) -> Result<u32, GcError> {
        let failure = GcError::AllocationFailure {
            live: self.live_count,
        };
        let index = u32::try_from(self.slots.len()).map_err(|_| failure.clone())?;
        self.slots.try_reserve(1).map_err(|_| failure.clone())?;
        // The free list must be able to take this slot back during a sweep.
        self.free_list.try_reserve(self.slots.len() + 1).map_err(|_| failure)?;
        self.slots.push(Slot {
            generation: 0,
            object: None,
        });
        Ok(index)
    }

    fn check_payload(&self, payload: &Payload) -> Result<(), GcError> {
        if let Payload::Pair { head, tail } = payload {
            self.object(*head)?;
            self.object(*tail)?;
        }
        Ok(())
    }

    pub fn get(&self, object: ObjectRef) -> Option<&HeapObject> {
        self.slots
            .get(object.index() as usize)
            .filter(|slot| slot.generation == object.generation())
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn contains(&self, object: ObjectRef) -> bool {
        self.get(object).is_some()
    }

    fn object(&self, object: ObjectRef) -> Result<&HeapObject, GcError> {
        self.get(object).ok_or(GcError::InvalidReference {
            index: object.index(),
        })
    }

    fn object_mut(&mut self, object: ObjectRef) -> Result<&mut HeapObject, GcError> {
        self.slots
            .get_mut(object.index() as usize)
            .filter(|slot| slot.generation == object.generation())
            .and_then(|slot| slot.object.as_mut())
            .ok_or(GcError::InvalidReference {
                index: object.index(),
            })
    }

    pub fn set_head(&mut self, pair: ObjectRef, target: ObjectRef) -> Result<(), GcError> {
        self.object(target)?;
        match self.object_mut(pair)?.payload_mut() {
            Payload::Pair { head, .. } => {
                *head = target;
                Ok(())
            }
            Payload::Leaf(_) => Err(GcError::NotAPair {
                index: pair.index(),
            }),
        }
    }

    pub fn set_tail(&mut self, pair: ObjectRef, target: ObjectRef) -> Result<(), GcError> {
        self.object(target)?;
        match self.object_mut(pair)?.payload_mut() {
            Payload::Pair { tail, .. } => {
                *tail = target;
                Ok(())
            }
            Payload::Leaf(_) => Err(GcError::NotAPair {
                index: pair.index(),
            }),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn collect_threshold(&self) -> usize {
        self.collect_threshold
    }

    pub fn initial_threshold(&self) -> usize {
        self.initial_threshold
    }

    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    pub fn should_collect(&self) -> bool {
        self.live_count >= self.collect_threshold
    }

    /// Runs a full collection with `roots` as the only root set.
    ///
    /// An empty heap is left untouched: no marking, no sweeping, and the
    /// threshold keeps its current value.
    pub fn collect(&mut self, roots: &[ObjectRef]) -> CollectStats {
        self.collect_from(roots.iter().copied())
    }

    fn collect_from(&mut self, roots: impl IntoIterator<Item = ObjectRef>) -> CollectStats {
        let before = self.live_count;
        if before == 0 {
            return CollectStats {
                before,
                after: 0,
                collected: 0,
                threshold: self.collect_threshold,
            };
        }

        let marked = marker::mark_from_roots(self, roots);
        log::trace!(
            "marked {} object(s), peak worklist {}",
            marked.marked,
            marked.peak_worklist
        );

        let collected = sweeper::sweep(&mut self.slots, &mut self.free_list);
        self.live_count -= collected;
        self.total_freed += collected;
        self.total_collections += 1;
        self.collect_threshold = if self.live_count > 0 {
            self.live_count * 2
        } else {
            self.initial_threshold
        };

        log::debug!("{before} - {collected} = {}", self.live_count);
        CollectStats {
            before,
            after: self.live_count,
            collected,
            threshold: self.collect_threshold,
        }
    }

    /// Iterates live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &HeapObject)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object
                .as_ref()
                .map(|object| (ObjectRef::new(index as u32, slot.generation), object))
        })
    }

    pub fn stats(&self) -> HeapStats {
        let (leaves, pairs) = self
            .iter()
            .fold((0, 0), |(leaves, pairs), (_, object)| match object.kind() {
                ObjectKind::Leaf => (leaves + 1, pairs),
                ObjectKind::Pair => (leaves, pairs + 1),
            });
        HeapStats {
            live: self.live_count,
            leaves,
            pairs,
            threshold: self.collect_threshold,
            initial_threshold: self.initial_threshold,
            slots: self.slots.len(),
            free_slots: self.free_list.len(),
            total_allocations: self.total_allocations,
            total_collections: self.total_collections,
            total_freed: self.total_freed,
        }
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn free_list(&self) -> &[u32] {
        &self.free_list
    }

    /// Marks `object` if it is live and not yet marked. Returns whether the
    /// mark bit changed.
    pub(crate) fn try_mark(&mut self, object: ObjectRef) -> bool {
        match self.object_mut(object) {
            Ok(entry) if !entry.is_marked() => {
                entry.set_marked(true);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn trace_object(&self, object: ObjectRef, tracer: &mut Tracer) {
        if let Some(entry) = self.get(object) {
            entry.trace(tracer);
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
