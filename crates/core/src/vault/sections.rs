//! Removal of sections under excluded headings.
//!
//! A heading whose text contains an excluded substring hides every line up to
//! the next heading of the same or a higher level (fewer `#`). Deeper headings
//! inside the hidden section are swallowed without being evaluated.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // 1-6 hashes, whitespace, then the heading text
    Regex::new(r"^(#{1,6})\s+(.*)$").unwrap()
});

/// Parse a heading line into its level and text.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2).map_or("", |m| m.as_str());
    Some((level, text))
}

/// Drop the sections of `text` that sit under an excluded heading.
///
/// Matching is a case-insensitive substring test against the trimmed heading
/// text. With no usable header patterns the input is returned untouched.
pub fn filter_excluded_sections<'a>(text: &'a str, excluded_headers: &[String]) -> Cow<'a, str> {
    let needles: Vec<String> = excluded_headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();

    if needles.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut skip_level: Option<usize> = None;

    for line in text.lines() {
        match parse_heading(line) {
            Some((level, heading)) => {
                if let Some(active) = skip_level {
                    if level > active {
                        continue;
                    }
                    skip_level = None;
                }

                let heading = heading.trim().to_lowercase();
                if needles.iter().any(|n| heading.contains(n.as_str())) {
                    skip_level = Some(level);
                } else {
                    kept.push(line);
                }
            }
            None if skip_level.is_none() => kept.push(line),
            None => {}
        }
    }

    Cow::Owned(kept.join("\n"))
}
