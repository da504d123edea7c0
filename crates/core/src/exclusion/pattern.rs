//! Wildcard matching for file exclusion patterns.

use regex::{Regex, RegexBuilder};

/// A compiled file pattern.
///
/// Patterns without `*` compare for case-insensitive equality. Each `*`
/// matches any run of characters (including none) and the whole candidate
/// must match.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Wildcard(Regex),
}

impl FilePattern {
    /// Compile a pattern. Returns `None` for patterns that are empty after
    /// trimming, so they can never match every candidate.
    pub fn new(pattern: &str) -> Option<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_lowercase();
        let matcher = if lower.contains('*') {
            let body =
                lower.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
            // Escaped literals and `.*` always form a valid expression.
            let re = RegexBuilder::new(&format!("^{body}$"))
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .ok()?;
            Matcher::Wildcard(re)
        } else {
            Matcher::Exact(lower)
        };

        Some(Self { source: trimmed.to_string(), matcher })
    }

    /// The trimmed pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => candidate.to_lowercase() == *expected,
            Matcher::Wildcard(re) => re.is_match(candidate),
        }
    }
}

/// Match `candidate` against a single pattern without keeping the compiled form.
pub fn matches_pattern(candidate: &str, pattern: &str) -> bool {
    FilePattern::new(pattern).is_some_and(|p| p.matches(candidate))
}
