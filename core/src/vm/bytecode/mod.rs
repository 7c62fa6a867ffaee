mod instruction;
mod program;

pub use instruction::Instruction;
pub use program::Program;
