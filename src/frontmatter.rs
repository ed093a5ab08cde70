//! Front-matter parsing.
//!
//! A document may open with a metadata block:
//!
//! ```text
//! ---                    +++
//! title: Authentication  title = "Authentication"
//! tags: [api, auth]      tags = ["api", "auth"]
//! ---                    +++
//! ```
//!
//! YAML (`---`) and TOML (`+++`) blocks are recognized. A block that cannot
//! be parsed never fails the document: [`parse_document`] logs a warning and
//! treats the whole file as body.

use serde_json::Value;

use crate::models::{ContentDocument, FrontMatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Yaml,
    Toml,
}

impl Delimiter {
    fn closes(self, line: &str) -> bool {
        match self {
            Delimiter::Yaml => line == "---" || line == "...",
            Delimiter::Toml => line == "+++",
        }
    }
}

/// Why a front-matter block was discarded.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("front-matter block is not terminated")]
    Unterminated,
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML front matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front matter is not a key/value mapping")]
    NotAMapping,
}

const BOM: char = '\u{feff}';

/// Parse file content into a [`ContentDocument`], degrading malformed front
/// matter to "no front matter".
pub fn parse_document(path: &str, content: &str) -> ContentDocument {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let (front_matter, body) = match split_front_matter(content) {
        Ok((front_matter, body)) => (front_matter, body),
        Err(e) => {
            tracing::warn!(path, error = %e, "ignoring malformed front matter");
            (FrontMatter::default(), content)
        }
    };

    ContentDocument {
        path: path.to_string(),
        front_matter,
        raw_body: body.to_string(),
    }
}

/// Split `content` into front matter and body.
///
/// Content without a leading delimiter line is all body.
pub fn split_front_matter(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let Some(block) = find_block(content) else {
        return Ok((FrontMatter::default(), content));
    };
    let (delimiter, raw, body) = block?;

    let value: Value = match delimiter {
        Delimiter::Yaml => serde_yaml::from_str(raw)?,
        Delimiter::Toml => toml::from_str(raw)?,
    };

    let front_matter = match value {
        // An empty block (`---\n---`) is valid and declares nothing.
        Value::Null => FrontMatter::default(),
        Value::Object(map) => FrontMatter {
            title: map.get("title").and_then(scalar_string),
            sidebar_label: map
                .get("sidebar_label")
                .or_else(|| map.get("sidebarLabel"))
                .and_then(scalar_string),
            description: map.get("description").and_then(scalar_string),
            keywords: map.get("keywords").map(string_list).unwrap_or_default(),
            tags: map.get("tags").map(string_list).unwrap_or_default(),
        },
        _ => return Err(FrontMatterError::NotAMapping),
    };

    Ok((front_matter, body))
}

/// Locate the delimited block at the top of `content`.
///
/// Returns `None` when the first line is not an opening delimiter, otherwise
/// the delimiter kind, the raw block text and the remaining body.
fn find_block(content: &str) -> Option<Result<(Delimiter, &str, &str), FrontMatterError>> {
    let text = content.strip_prefix(BOM).unwrap_or(content);

    let (first, rest) = match text.find('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    };
    let delimiter = match first.trim_end() {
        "---" => Delimiter::Yaml,
        "+++" => Delimiter::Toml,
        _ => return None,
    };

    let mut offset = 0;
    loop {
        let (line, next) = match rest[offset..].find('\n') {
            Some(i) => (&rest[offset..offset + i], Some(offset + i + 1)),
            None => (&rest[offset..], None),
        };

        if delimiter.closes(line.trim_end()) {
            let raw = &rest[..offset];
            let body = next.map(|n| &rest[n..]).unwrap_or("");
            return Some(Ok((delimiter, raw, body)));
        }

        match next {
            Some(n) => offset = n,
            None => return Some(Err(FrontMatterError::Unterminated)),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list of scalars, or a single scalar treated as a one-element list.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_block() {
        let content = "---\ntitle: Auth\nsidebar_label: Login\ndescription: How to log in\nkeywords: [auth, login]\ntags:\n  - api\n---\n# Body\n\nText.";
        let (fm, body) = split_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Auth"));
        assert_eq!(fm.sidebar_label.as_deref(), Some("Login"));
        assert_eq!(fm.description.as_deref(), Some("How to log in"));
        assert_eq!(fm.keywords, vec!["auth", "login"]);
        assert_eq!(fm.tags, vec!["api"]);
        assert_eq!(body, "# Body\n\nText.");
    }

    #[test]
    fn toml_block() {
        let content = "+++\ntitle = \"Setup\"\ntags = [\"install\"]\n+++\nBody";
        let (fm, body) = split_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Setup"));
        assert_eq!(fm.tags, vec!["install"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn no_block_means_all_body() {
        let content = "# Title\n\n---\n\nAfter a rule.";
        let (fm, body) = split_front_matter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn crlf_and_bom_are_tolerated() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nBody";
        let (fm, body) = split_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn empty_block_is_valid() {
        let (fm, body) = split_front_matter("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn scalars_are_coerced_and_single_values_become_lists() {
        let content = "---\ntitle: 2024\nsidebarLabel: Release\nkeywords: changelog\ntags: release\n---\n";
        let (fm, body) = split_front_matter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert_eq!(fm.sidebar_label.as_deref(), Some("Release"));
        assert_eq!(fm.keywords, vec!["changelog"]);
        assert_eq!(fm.tags, vec!["release"]);
        assert_eq!(body, "");
    }

    #[test]
    fn unterminated_block_is_an_error() {
        assert!(matches!(
            split_front_matter("---\ntitle: x\nno end"),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn non_mapping_is_an_error() {
        assert!(matches!(
            split_front_matter("---\n- a\n- b\n---\nBody"),
            Err(FrontMatterError::NotAMapping)
        ));
    }

    #[test]
    fn malformed_front_matter_degrades_to_body() {
        let content = "---\ntitle: [unclosed\n---\nBody text";
        let doc = parse_document("guide/page.md", content);
        assert_eq!(doc.path, "guide/page.md");
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.raw_body, content);
    }

    #[test]
    fn parse_document_keeps_body_only() {
        let doc = parse_document("a.md", "---\ntitle: A\n---\nHello");
        assert_eq!(doc.front_matter.title.as_deref(), Some("A"));
        assert_eq!(doc.raw_body, "Hello");
    }

    #[test]
    fn byte_order_mark_never_reaches_the_body() {
        let plain = parse_document("a.md", "\u{feff}Just text");
        assert_eq!(plain.raw_body, "Just text");

        let malformed = parse_document("b.md", "\u{feff}---\ntitle: [unclosed\n---\nBody");
        assert!(malformed.front_matter.is_empty());
        assert_eq!(malformed.raw_body, "---\ntitle: [unclosed\n---\nBody");
    }
}
