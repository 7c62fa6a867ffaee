use babygc::Instruction;
use rustyline::completion::Pair;

const DOT_COMMANDS: [&str; 7] = [
    ".clear", ".exit", ".heap", ".help", ".load", ".stack", ".verify",
];

pub fn complete_line(line: &str, pos: usize) -> (usize, Vec<Pair>) {
    let safe_pos = pos.min(line.len());
    let prefix = &line[..safe_pos];
    let start = word_start(prefix);
    let needle = &prefix[start..];

    // only the first word on a line is a command name
    if !prefix[..start].trim().is_empty() {
        return (start, Vec::new());
    }

    let words = if needle.starts_with('.') {
        DOT_COMMANDS
            .iter()
            .copied()
            .filter(|cmd| cmd.starts_with(needle))
            .collect::<Vec<_>>()
    } else {
        Instruction::MNEMONICS
            .iter()
            .copied()
            .filter(|name| name.starts_with(needle))
            .collect::<Vec<_>>()
    };

    (start, pairs(&words))
}

fn pairs(values: &[&str]) -> Vec<Pair> {
    values
        .iter()
        .map(|v| Pair {
            display: (*v).to_string(),
            replacement: (*v).to_string(),
        })
        .collect()
}

fn word_start(prefix: &str) -> usize {
    prefix
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(idx, ch)| idx + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(line: &str) -> Vec<String> {
        complete_line(line, line.len())
            .1
            .into_iter()
            .map(|pair| pair.replacement)
            .collect()
    }

    #[test]
    fn completes_instruction_prefix() {
        assert_eq!(replacements("se"), vec!["sethead", "settail"]);
        assert_eq!(replacements("pa"), vec!["pair"]);
    }

    #[test]
    fn completes_dot_commands() {
        assert_eq!(replacements(".he"), vec![".heap", ".help"]);
    }

    #[test]
    fn operands_are_not_completed() {
        assert!(replacements("push p").is_empty());
    }
}
