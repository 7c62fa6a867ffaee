use super::heap::Heap;
use super::object::ObjectRef;
use super::trace::Tracer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MarkStats {
    pub marked: usize,
    pub peak_worklist: usize,
}

/// Marks everything reachable from `roots`.
///
/// Uses an explicit worklist so deep or cyclic pair graphs never grow the
/// native call stack. An object is marked before its children are queued,
/// so each object is traced at most once.
pub(crate) fn mark_from_roots(heap: &mut Heap, roots: impl IntoIterator<Item = ObjectRef>) -> MarkStats {
    let mut stats = MarkStats::default();
    let mut worklist = Vec::new();

    for root in roots {
        if heap.try_mark(root) {
            stats.marked += 1;
            worklist.push(root);
        }
    }
    stats.peak_worklist = worklist.len();

    let mut tracer = Tracer::new();
    while let Some(object) = worklist.pop() {
        heap.trace_object(object, &mut tracer);
        for child in tracer.drain() {
            if heap.try_mark(child) {
                stats.marked += 1;
                worklist.push(child);
            }
        }
        stats.peak_worklist = stats.peak_worklist.max(worklist.len());
    }

    stats
}
