use std::fmt;

/// Non-owning handle to an object on the [`Heap`](super::Heap).
///
/// The generation distinguishes a live object from whatever later reuses
/// its slot, so a handle kept past the object's collection stays detectably
/// stale instead of aliasing a newer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

impl ObjectRef {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Leaf(i64),
    Pair { head: ObjectRef, tail: ObjectRef },
}

impl Payload {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Payload::Leaf(_) => ObjectKind::Leaf,
            Payload::Pair { .. } => ObjectKind::Pair,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Leaf,
    Pair,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Leaf => f.write_str("leaf"),
            ObjectKind::Pair => f.write_str("pair"),
        }
    }
}

/// A node on the managed heap.
#[derive(Debug, Clone)]
pub struct HeapObject {
    marked: bool,
    payload: Payload,
}

impl HeapObject {
    pub(crate) fn new(payload: Payload) -> Self {
        Self {
            marked: false,
            payload,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn kind(&self) -> ObjectKind {
        self.payload.kind()
    }

    /// Only ever `true` while a collection is in progress.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn as_leaf(&self) -> Option<i64> {
        match self.payload {
            Payload::Leaf(value) => Some(value),
            Payload::Pair { .. } => None,
        }
    }

    pub fn as_pair(&self) -> Option<(ObjectRef, ObjectRef)> {
        match self.payload {
            Payload::Pair { head, tail } => Some((head, tail)),
            Payload::Leaf(_) => None,
        }
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub(crate) fn set_marked(&mut self, marked: bool) {
        self.marked = marked;
    }
}
