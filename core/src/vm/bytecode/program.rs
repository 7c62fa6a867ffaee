use std::fmt::Write;

use crate::errors::ParseError;

use super::Instruction;

/// A parsed instruction script with the source line of each instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub lines: Vec<usize>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, instruction: Instruction, line: usize) {
        self.instructions.push(instruction);
        self.lines.push(line);
    }

    /// Parses one instruction per line. Blank lines and `#` comments are
    /// skipped.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut program = Self::new();
        let mut line_offset = 0;

        for (number, raw) in source.split('\n').enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim_end_matches('\r');
            if !line.trim().is_empty() {
                let instruction = line
                    .parse::<Instruction>()
                    .map_err(|err| err.at_line(number + 1, line_offset))?;
                program.write(instruction, number + 1);
            }
            line_offset += raw.len() + 1;
        }

        Ok(program)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (idx, (instruction, line)) in self.instructions.iter().zip(&self.lines).enumerate() {
            let _ = writeln!(out, "{idx:04} {line:>4}  {instruction}");
        }
        out
    }
}
