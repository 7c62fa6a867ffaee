pub mod heap;
pub(crate) mod marker;
pub mod object;
mod sweeper;
pub mod trace;
pub mod verify;

pub use heap::{CollectStats, Heap, HeapStats};
pub use object::{HeapObject, ObjectKind, ObjectRef, Payload};
pub use trace::{Trace, Tracer};
pub use verify::InvariantViolation;
