//! Search record synthesis.
//!
//! Maps one parsed document plus its normalized body to exactly one
//! [`SearchRecord`]. Nothing here touches the filesystem, the network or
//! the clock; the synthesis timestamp is passed in.

use chrono::{DateTime, Utc};

use crate::config::CategoryRule;
use crate::models::{ContentDocument, Hierarchy, SearchRecord};

/// Object id used for the document that canonicalizes to the site root.
pub const ROOT_OBJECT_ID: &str = "intro";
pub const FALLBACK_TITLE: &str = "Documentation";
pub const FALLBACK_CATEGORY: &str = "Documentation";
pub const RECORD_TYPE: &str = "content";

/// Body tokens folded into the keyword string.
const KEYWORD_BODY_TOKENS: usize = 20;
/// Length of the description derived from the body when none is declared.
const DESCRIPTION_CHARS: usize = 160;
const TRUNCATION_MARKER: &str = "...";

/// Build the record for `doc`.
///
/// `extensions` are the document extensions stripped from the path when
/// deriving the object id and url.
pub fn synthesize_record(
    doc: &ContentDocument,
    normalized_body: &str,
    categories: &[CategoryRule],
    extensions: &[String],
    now: DateTime<Utc>,
) -> SearchRecord {
    let fm = &doc.front_matter;

    let slug = canonical_slug(&doc.path, extensions);
    let (object_id, url) = if slug.is_empty() {
        (ROOT_OBJECT_ID.to_string(), "/".to_string())
    } else {
        (slug.clone(), format!("/{}", slug))
    };

    let title = first_non_empty(&[fm.title.as_deref(), fm.sidebar_label.as_deref()])
        .unwrap_or(FALLBACK_TITLE)
        .to_string();
    let category = infer_category(&doc.path, categories).to_string();

    let declared_description = fm.description.as_deref().filter(|d| !is_blank(d));
    let description = match declared_description {
        Some(d) => d.to_string(),
        None => excerpt(normalized_body),
    };

    SearchRecord {
        object_id,
        title: title.clone(),
        content: normalized_body.to_string(),
        url,
        hierarchy: Hierarchy {
            lvl0: category.clone(),
            lvl1: title.clone(),
            lvl2: declared_description.unwrap_or_default().to_string(),
        },
        record_type: RECORD_TYPE.to_string(),
        category,
        keywords: build_keywords(doc, normalized_body),
        description,
        tags: fm.tags.clone(),
        last_modified: now,
    }
}

/// Reduce a relative document path to its canonical url form.
///
/// `guide/index.md` → `guide`, `index.mdx` → `` (root),
/// `docs/api/auth.md` → `api/auth`.
pub fn canonical_slug(path: &str, extensions: &[String]) -> String {
    let path = path.replace('\\', "/");
    let mut slug = path.as_str();

    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        if let Some(stripped) = slug
            .strip_suffix(ext)
            .and_then(|s| s.strip_suffix('.'))
        {
            slug = stripped;
            break;
        }
    }

    slug = slug.trim_start_matches('/');
    while let Some(rest) = slug.strip_prefix("docs/") {
        slug = rest.trim_start_matches('/');
    }

    if slug == "index" {
        slug = "";
    } else if let Some(parent) = slug.strip_suffix("/index") {
        slug = parent;
    }

    slug.trim_matches('/').to_string()
}

/// First rule whose needle occurs in `path`, in declaration order.
pub fn infer_category<'a>(path: &str, rules: &'a [CategoryRule]) -> &'a str {
    rules
        .iter()
        .find(|rule| path.contains(rule.needle.as_str()))
        .map(|rule| rule.label.as_str())
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Only declared front-matter fields contribute; the fallback title does not.
fn build_keywords(doc: &ContentDocument, normalized_body: &str) -> String {
    let fm = &doc.front_matter;
    let mut parts: Vec<&str> = Vec::new();

    parts.extend(fm.title.as_deref());
    parts.extend(fm.sidebar_label.as_deref());
    parts.extend(fm.keywords.iter().map(String::as_str));

    // Directory segments only; the file name itself is not a keyword.
    let segments: Vec<&str> = doc.path.split('/').collect();
    if let Some((_file, dirs)) = segments.split_last() {
        parts.extend(dirs.iter().copied());
    }

    parts.extend(normalized_body.split_whitespace().take(KEYWORD_BODY_TOKENS));

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !is_blank(p))
        .collect::<Vec<_>>()
        .join(" ")
}

fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(DESCRIPTION_CHARS).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !is_blank(s))
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
