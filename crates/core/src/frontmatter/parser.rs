//! Frontmatter parsing from markdown documents.

use super::types::{Frontmatter, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Parse frontmatter from markdown content.
///
/// Frontmatter is delimited by `---` at the start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let trimmed = content.trim_start();

    let Some(after_first) = trimmed.strip_prefix("---") else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    // Skip the newline after opening ---
    let after_newline = after_first
        .strip_prefix('\n')
        .or_else(|| after_first.strip_prefix("\r\n"))
        .unwrap_or(after_first);

    let Some((yaml_end, body_start)) = find_closing_delimiter(after_newline) else {
        // No closing ---, treat as no frontmatter
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let yaml_content = &after_newline[..yaml_end];
    let body = after_newline[body_start..].to_string();

    let frontmatter: Frontmatter = if yaml_content.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content.trim())?
    };

    Ok(ParsedDocument { frontmatter: Some(frontmatter), body })
}

/// Find the closing `---` line. Returns the byte offset where it starts and
/// the offset just past its line ending.
fn find_closing_delimiter(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim() == "---" {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "# Hello\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_frontmatter() {
        let content = "---\ntitle: Hello\n---\n# Content";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_typed_values() {
        let content = "---\nprivate: true\nrank: 1\nstate: \"1\"\n---\nBody";
        let fm = parse(content).unwrap().frontmatter.unwrap();
        assert_eq!(fm.fields.get("private").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(fm.fields.get("rank").and_then(|v| v.as_i64()), Some(1));
        assert_eq!(fm.fields.get("state").and_then(|v| v.as_str()), Some("1"));
    }

    #[test]
    fn parse_crlf_frontmatter() {
        let content = "---\r\ntitle: Win\r\n---\r\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Win"));
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn parse_empty_frontmatter() {
        let content = "---\n---\n# Content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.unwrap().fields.is_empty());
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn unterminated_frontmatter_is_body() {
        let content = "---\ntitle: Oops\n# Content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(matches!(parse(content), Err(FrontmatterParseError::InvalidYaml(_))));
    }
}
