mod stack;

pub use stack::RootStack;

use crate::context::Context;
use crate::errors::{BabyGcError, GcError};
use crate::runtime::gc::{CollectStats, ObjectRef};
use crate::vm::bytecode::{Instruction, Program};

/// What a single instruction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pushed(ObjectRef),
    Popped(ObjectRef),
    Collected(CollectStats),
    Rewired,
    Count(usize),
}

impl Context {
    pub fn execute(&mut self, instruction: Instruction) -> Result<Outcome, GcError> {
        match instruction {
            Instruction::PushLeaf(value) => self.push_leaf(value).map(Outcome::Pushed),
            Instruction::PushPair => self.push_pair().map(Outcome::Pushed),
            Instruction::Pop => self.pop().map(Outcome::Popped),
            Instruction::Collect => Ok(Outcome::Collected(self.force_collect())),
            Instruction::Count => Ok(Outcome::Count(self.live_object_count())),
            Instruction::SetHead { pair, target } => {
                let (pair, target) = (self.stack().get(pair)?, self.stack().get(target)?);
                self.set_head(pair, target)?;
                Ok(Outcome::Rewired)
            }
            Instruction::SetTail { pair, target } => {
                let (pair, target) = (self.stack().get(pair)?, self.stack().get(target)?);
                self.set_tail(pair, target)?;
                Ok(Outcome::Rewired)
            }
        }
    }

    /// Executes every instruction in order, stopping at the first failure.
    pub fn run_program(&mut self, program: &Program) -> Result<Vec<Outcome>, BabyGcError> {
        let mut outcomes = Vec::with_capacity(program.len());
        for (instruction, &line) in program.instructions.iter().zip(&program.lines) {
            let outcome = self
                .execute(*instruction)
                .map_err(|source| BabyGcError::Execution { line, source })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
