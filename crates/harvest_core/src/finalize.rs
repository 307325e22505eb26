use std::collections::HashSet;

/// Trims every line, drops blank and duplicate lines (first occurrence wins)
/// and optionally reverses the order.
pub fn finalize(text: &str, reverse: bool) -> String {
    let mut seen = HashSet::new();
    let mut lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .collect();
    if reverse {
        lines.reverse();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::finalize;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(finalize("", false), "");
        assert_eq!(finalize("\n\n  \n", true), "");
    }

    #[test]
    fn surrounding_whitespace_does_not_make_lines_distinct() {
        assert_eq!(finalize("  a\na  \nb", false), "a\nb");
    }
}
