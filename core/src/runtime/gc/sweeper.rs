use super::heap::Slot;

/// Frees every unmarked object in one pass and clears the mark on the
/// survivors. Returns the number of objects freed.
///
/// A freed slot whose generation cannot be bumped any further is retired:
/// it stays empty and never returns to the free list, so no old handle can
/// ever match a new object in it.
pub(crate) fn sweep(slots: &mut [Slot], free_list: &mut Vec<u32>) -> usize {
    let mut freed = 0;
    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(object) = slot.object.as_mut() else {
            continue;
        };
        if object.is_marked() {
            object.set_marked(false);
            continue;
        }

        slot.object = None;
        freed += 1;
        match slot.generation.checked_add(1) {
            Some(generation) => {
                slot.generation = generation;
                free_list.push(index as u32);
            }
            None => log::debug!("slot {index} retired after exhausting its generations"),
        }
    }
    freed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::gc::object::{HeapObject, Payload};

    fn occupied(generation: u32) -> Slot {
        Slot {
            generation,
            object: Some(HeapObject::new(Payload::Leaf(0))),
        }
    }

    #[test]
    fn freed_slot_returns_to_free_list_with_next_generation() {
        let mut slots = vec![occupied(3)];
        let mut free_list = Vec::new();

        assert_eq!(sweep(&mut slots, &mut free_list), 1);
        assert_eq!(slots[0].generation, 4);
        assert!(slots[0].object.is_none());
        assert_eq!(free_list, vec![0]);
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut slots = vec![occupied(u32::MAX), occupied(0)];
        let mut free_list = Vec::new();

        assert_eq!(sweep(&mut slots, &mut free_list), 2);
        assert_eq!(slots[0].generation, u32::MAX);
        assert!(slots[0].object.is_none());
        assert_eq!(free_list, vec![1]);
    }
}
