use super::object::{HeapObject, ObjectRef, Payload};

/// Reports the heap references held by a value.
pub trait Trace {
    fn trace(&self, tracer: &mut Tracer);
}

#[derive(Default)]
pub struct Tracer {
    discovered: Vec<ObjectRef>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, object: ObjectRef) {
        self.discovered.push(object);
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ObjectRef> {
        self.discovered.drain(..)
    }
}

impl Trace for ObjectRef {
    fn trace(&self, tracer: &mut Tracer) {
        tracer.mark(*self);
    }
}

impl Trace for Payload {
    fn trace(&self, tracer: &mut Tracer) {
        match self {
            Payload::Leaf(_) => {}
            Payload::Pair { head, tail } => {
                head.trace(tracer);
                tail.trace(tracer);
            }
        }
    }
}

impl Trace for HeapObject {
    fn trace(&self, tracer: &mut Tracer) {
        self.payload().trace(tracer);
    }
}
