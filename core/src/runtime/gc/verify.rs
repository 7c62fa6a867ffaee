//! Heap consistency checks.
//!
//! These walk the arena without touching mark bits, so they can run at any
//! point between operations. The stress driver calls them after every round.

use std::collections::HashSet;

use thiserror::Error;

use super::heap::Heap;
use super::object::ObjectRef;
use super::trace::{Trace, Tracer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("object in slot {index} is still marked outside a collection")]
    LeakedMark { index: u32 },

    #[error("live count is {recorded} but the arena holds {actual} objects")]
    LiveCountMismatch { recorded: usize, actual: usize },

    #[error("threshold {threshold} is below the live count {live}")]
    ThresholdBelowLive { threshold: usize, live: usize },

    #[error("root at stack position {position} refers to freed slot {index}")]
    DanglingRoot { position: usize, index: u32 },

    #[error("pair in slot {parent} refers to freed slot {child}")]
    DanglingChild { parent: u32, child: u32 },

    #[error("free list entry {index} names an occupied or missing slot")]
    CorruptFreeList { index: u32 },

    #[error("object in slot {index} survived a collection without being reachable")]
    UnreachableSurvivor { index: u32 },
}

impl Heap {
    /// Checks the invariants that hold between any two operations.
    pub fn verify(&self, roots: &[ObjectRef]) -> Result<(), InvariantViolation> {
        let mut actual = 0;
        for (object, entry) in self.iter() {
            actual += 1;
            if entry.is_marked() {
                return Err(InvariantViolation::LeakedMark {
                    index: object.index(),
                });
            }
            if let Some((head, tail)) = entry.as_pair() {
                for child in [head, tail] {
                    if !self.contains(child) {
                        return Err(InvariantViolation::DanglingChild {
                            parent: object.index(),
                            child: child.index(),
                        });
                    }
                }
            }
        }

        if actual != self.live_count() {
            return Err(InvariantViolation::LiveCountMismatch {
                recorded: self.live_count(),
                actual,
            });
        }

        if self.collect_threshold() < self.live_count() {
            return Err(InvariantViolation::ThresholdBelowLive {
                threshold: self.collect_threshold(),
                live: self.live_count(),
            });
        }

        for (position, root) in roots.iter().enumerate() {
            if !self.contains(*root) {
                return Err(InvariantViolation::DanglingRoot {
                    position,
                    index: root.index(),
                });
            }
        }

        let slots = self.slots();
        for &index in self.free_list() {
            let occupied = slots
                .get(index as usize)
                .is_none_or(|slot| slot.object.is_some());
            if occupied {
                return Err(InvariantViolation::CorruptFreeList { index });
            }
        }

        Ok(())
    }

    /// Checks [`Heap::verify`] plus the post-collection guarantee: every live
    /// object is reachable from `roots`. Only meaningful right after a
    /// collection, since garbage is allowed to linger between cycles.
    pub fn verify_collected(&self, roots: &[ObjectRef]) -> Result<(), InvariantViolation> {
        self.verify(roots)?;

        let reachable = self.reachable_from(roots);
        match self.iter().find(|(object, _)| !reachable.contains(object)) {
            Some((object, _)) => Err(InvariantViolation::UnreachableSurvivor {
                index: object.index(),
            }),
            None => Ok(()),
        }
    }

    /// Computes the reachable set without using mark bits.
    pub fn reachable_from(&self, roots: &[ObjectRef]) -> HashSet<ObjectRef> {
        let mut seen = HashSet::new();
        let mut worklist: Vec<ObjectRef> = roots.to_vec();
        let mut tracer = Tracer::new();

        while let Some(object) = worklist.pop() {
            let Some(entry) = self.get(object) else {
                continue;
            };
            if !seen.insert(object) {
                continue;
            }
            entry.trace(&mut tracer);
            worklist.extend(tracer.drain());
        }

        seen
    }
}
