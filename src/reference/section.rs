//! Markdown section extraction by heading boundaries.

use regex::Regex;

/// Marker character of a markdown heading.
pub const HEADING_MARKER: char = '#';

/// Number of leading heading markers on an already-trimmed line.
pub fn heading_level(trimmed: &str) -> usize {
    trimmed.len() - trimmed.trim_start_matches(HEADING_MARKER).len()
}

fn matches_at_start(pattern: &Regex, text: &str) -> bool {
    pattern.find(text).is_some_and(|m| m.start() == 0)
}

/// Extract the section whose heading matches `pattern`.
///
/// The section starts at the first line whose trimmed text matches `pattern`
/// at its beginning and runs up to, not including, the next heading of equal
/// or shallower depth. Deeper headings stay inside the section. Returns an
/// empty string when no line matches.
pub fn extract_section(content: &str, pattern: &Regex) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut start: Option<(usize, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        match start {
            None => {
                if matches_at_start(pattern, trimmed) {
                    start = Some((i, heading_level(trimmed)));
                }
            }
            Some((first, level)) => {
                if trimmed.starts_with(HEADING_MARKER) && heading_level(trimmed) <= level {
                    return lines[first..i].join("\n").trim().to_string();
                }
            }
        }
    }

    start
        .map(|(first, _)| lines[first..].join("\n").trim().to_string())
        .unwrap_or_default()
}
