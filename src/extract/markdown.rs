// Markdown link extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::span::Span;

/// Simple single-line `[text](url)` links, plus a bracket/paren-bounded
/// form that may span newlines.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]\(.*?\)|\[[^\]]*\]\([^)]*\)").expect("markdown link regex")
});

/// The URL portion of a markdown link.
static MARKDOWN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(([^)]*)\)").expect("markdown url regex"));

/// Embedded scheme or `www.` prefix, for the relative-URL check.
static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(?:https?|ftp|mailto|tel|file|data|ssh|git):?//)|(?:www\.)")
        .expect("url scheme regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkdownLink {
    pub link: String,
    pub span: Span,
    /// 1-based order of occurrence among identical literals.
    pub appearance: usize,
}

/// All markdown link constructs, with appearance indices grouped by literal.
pub(crate) fn extract(text: &str) -> Vec<MarkdownLink> {
    let mut appearances: HashMap<&str, usize> = HashMap::new();
    MARKDOWN_LINK
        .find_iter(text)
        .map(|m| {
            let count = appearances.entry(m.as_str()).or_insert(0);
            *count += 1;
            MarkdownLink {
                link: m.as_str().to_owned(),
                span: Span::new(m.start(), m.end()),
                appearance: *count,
            }
        })
        .collect()
}

/// Whether the link's URL portion is a root-relative path with no embedded
/// scheme or `www.` URL. Such links stay unescaped.
pub(crate) fn safe_relative_url(link: &str) -> bool {
    let Some(captures) = MARKDOWN_URL.captures(link) else {
        return false;
    };
    let url = &captures[1];
    url.starts_with('/') && !URL_SCHEME.is_match(url)
}
