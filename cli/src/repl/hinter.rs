pub fn hint_for(line: &str, pos: usize) -> Option<String> {
    if pos < line.len() {
        return None;
    }

    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let name = words.next()?;
    let given = words.count();
    let expected = operands_for(name)?;
    let remaining = expected.get(given..)?;
    if remaining.is_empty() {
        return None;
    }

    let sep = if line.ends_with(char::is_whitespace) { "" } else { " " };
    Some(format!("{sep}{}", remaining.join(" ")))
}

fn operands_for(name: &str) -> Option<&'static [&'static str]> {
    match name.to_ascii_lowercase().as_str() {
        "push" => Some(&["<int>"]),
        "sethead" | "settail" => Some(&["<pair-slot>", "<target-slot>"]),
        ".load" => Some(&["<file>"]),
        _ => None,
    }
}
