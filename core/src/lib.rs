//! A small tracing garbage collector driven by a bounded operand stack.
//!
//! Objects are leaves or pairs allocated on a [`Heap`](runtime::gc::Heap).
//! The [`RootStack`](vm::machine::RootStack) holds the only roots; once the
//! live count reaches the collection threshold, the next allocation runs a
//! stop-the-world mark-and-sweep first.

pub mod config;
pub mod context;
pub mod errors;
pub mod runtime;
pub mod vm;

pub use config::GcConfig;
pub use context::Context;
pub use errors::{BabyGcError, GcError};
pub use runtime::gc::{CollectStats, HeapStats, ObjectRef, Payload};
pub use vm::bytecode::{Instruction, Program};
pub use vm::machine::Outcome;

/// Convenience function to run an instruction script end-to-end.
pub fn run(source: &str) -> Result<Context, BabyGcError> {
    vm::run_source(source)
}
