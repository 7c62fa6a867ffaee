use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// One stack-machine instruction.
///
/// Stack slots in `SetHead`/`SetTail` are counted from the bottom of the
/// stack, so they stay stable while values are pushed above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    PushLeaf(i64),
    /// Pops tail then head and pushes the new pair.
    PushPair,
    Pop,
    Collect,
    Count,
    SetHead { pair: usize, target: usize },
    SetTail { pair: usize, target: usize },
}

impl Instruction {
    pub const MNEMONICS: [&'static str; 7] =
        ["push", "pair", "pop", "gc", "count", "sethead", "settail"];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::PushLeaf(_) => "push",
            Instruction::PushPair => "pair",
            Instruction::Pop => "pop",
            Instruction::Collect => "gc",
            Instruction::Count => "count",
            Instruction::SetHead { .. } => "sethead",
            Instruction::SetTail { .. } => "settail",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Instruction::PushLeaf(_) => 1,
            Instruction::SetHead { .. } | Instruction::SetTail { .. } => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushLeaf(value) => write!(f, "push {value}"),
            Instruction::SetHead { pair, target } | Instruction::SetTail { pair, target } => {
                write!(f, "{} {pair} {target}", self.mnemonic())
            }
            _ => f.write_str(self.mnemonic()),
        }
    }
}

impl FromStr for Instruction {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_words(line);
        let Some(&(name_offset, name)) = words.first() else {
            return Err(ParseError::new("expected an instruction", 0, line.len()));
        };
        let operands = &words[1..];
        let name_at = (name, name_offset);

        let instruction = match name.to_ascii_lowercase().as_str() {
            "push" => Instruction::PushLeaf(operand(operands, 0, name_at)?),
            "pair" => Instruction::PushPair,
            "pop" => Instruction::Pop,
            "gc" | "collect" => Instruction::Collect,
            "count" => Instruction::Count,
            "sethead" => Instruction::SetHead {
                pair: operand(operands, 0, name_at)?,
                target: operand(operands, 1, name_at)?,
            },
            "settail" => Instruction::SetTail {
                pair: operand(operands, 0, name_at)?,
                target: operand(operands, 1, name_at)?,
            },
            _ => {
                return Err(ParseError::new(
                    format!("unknown instruction '{name}'"),
                    name_offset,
                    name.len(),
                ));
            }
        };

        if let Some(&(offset, extra)) = operands.get(instruction.arity()) {
            return Err(ParseError::new(
                format!("unexpected operand '{extra}' for '{}'", instruction.mnemonic()),
                offset,
                extra.len(),
            ));
        }

        Ok(instruction)
    }
}

fn operand<T: FromStr>(
    operands: &[(usize, &str)],
    position: usize,
    (name, name_offset): (&str, usize),
) -> Result<T, ParseError> {
    let Some(&(offset, word)) = operands.get(position) else {
        return Err(ParseError::new(
            format!("'{name}' is missing operand {}", position + 1),
            name_offset,
            name.len(),
        ));
    };
    word.parse()
        .map_err(|_| ParseError::new(format!("invalid operand '{word}'"), offset, word.len()))
}

fn split_words(line: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (idx, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(begin)) => {
                words.push((begin, &line[begin..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(begin) = start {
        words.push((begin, &line[begin..]));
    }
    words
}
