use std::borrow::Cow;

use babygc::Instruction;
use owo_colors::OwoColorize;

pub fn highlight_line(line: &str) -> Cow<'_, str> {
    let (code, comment) = match line.find('#') {
        Some(idx) => line.split_at(idx),
        None => (line, ""),
    };

    let mut out = String::with_capacity(line.len() * 2);
    let mut first = true;
    for piece in code.split_inclusive(char::is_whitespace) {
        let word = piece.trim_end();
        let gap = &piece[word.len()..];
        if word.is_empty() {
            out.push_str(gap);
            continue;
        }
        if first && is_mnemonic(word) {
            out.push_str(&word.blue().bold().to_string());
        } else if first && word.starts_with('.') {
            out.push_str(&word.magenta().to_string());
        } else if word.parse::<i64>().is_ok() {
            out.push_str(&word.yellow().to_string());
        } else {
            out.push_str(word);
        }
        out.push_str(gap);
        first = false;
    }
    if !comment.is_empty() {
        out.push_str(&comment.bright_black().to_string());
    }
    Cow::Owned(out)
}

fn is_mnemonic(word: &str) -> bool {
    Instruction::MNEMONICS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(word))
}

pub fn highlight_prompt(prompt: &str) -> Cow<'_, str> {
    if prompt == "> " {
        return Cow::Owned(format!("{} ", ">".bright_green().bold()));
    }
    if prompt == "... " {
        return Cow::Owned(format!("{} ", "...".yellow().bold()));
    }
    Cow::Borrowed(prompt)
}

pub fn highlight_hint(hint: &str) -> Cow<'_, str> {
    Cow::Owned(hint.bright_black().to_string())
}
