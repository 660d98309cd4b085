//! Rendering of command documentation

/// Removes the leading whitespace shared by the non-blank lines of `doc`
///
/// The shared run is measured from the first non-blank line against every later
/// non-blank line. Blank lines are kept verbatim.
pub fn strip_common_indent(doc: &str) -> String {
    let lines: Vec<&str> = doc.split('\n').collect();
    let prefix = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .map(|first| shared_indent(lines[first], &lines[first + 1..]))
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                line.chars().skip(prefix).collect()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn shared_indent(first: &str, rest: &[&str]) -> usize {
    let others: Vec<Vec<char>> = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().collect())
        .collect();

    for (i, c) in first.chars().enumerate() {
        if !c.is_whitespace() || others.iter().any(|other| other.get(i) != Some(&c)) {
            return i;
        }
    }
    first.chars().count()
}
