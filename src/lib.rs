// linkfence: backtick-escapes untrusted links in AI chat answers.
//
// Markdown renderers do not linkify or interpret HTML inside inline code
// spans, so wrapping a link in backticks displays it as harmless text. The
// pipeline runs four passes over the answer:
//
//   HTML links -> markdown links -> plain URLs -> backtick normalization
//
// Plain URLs must run last: the URL patterns are a superset that would
// otherwise re-match the links earlier phases already escaped. Every phase
// shares one escaped-span ledger so nothing is escaped twice, and fenced
// code blocks are exempt throughout.

mod blocks;
mod escape;
mod extract;
mod hosts;
mod normalize;
mod span;

use std::collections::HashSet;

use escape::EscapedLinks;
use hosts::HostAuthorizer;

/// HTML tag names whose elements are treated as link-bearing by default.
const WATCHED_HTML_TAGS: &[&str] = &[
    "a",
    "img",
    "source",
    "tool",
    "tool_name",
    "description",
    "example",
    "src",
    "script",
    "picture",
];

/// Attribute names that mark an element as dangerous regardless of its tag.
const DANGEROUS_ATTRIBUTES: &[&str] = &["onerror", "onload", "onmouseover", "onclick", "alert"];

/// Sanitizer configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// The hosting instance's own URL; links to its host are never escaped.
    pub base_url: Option<String>,
    /// Additional hosts whose links are never escaped.
    pub allowed_hosts: Vec<String>,
    /// HTML tag names watched by the HTML-link phase.
    pub watched_tags: Vec<String>,
    /// Attribute names that force-escape an element.
    pub dangerous_attributes: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: None,
            allowed_hosts: Vec::new(),
            watched_tags: WATCHED_HTML_TAGS.iter().map(|s| s.to_string()).collect(),
            dangerous_attributes: DANGEROUS_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the instance base URL used for host authorization.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Allow-lists an external host.
    pub fn with_allowed_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.push(host.into());
        self
    }

    /// Watches an additional HTML tag name.
    pub fn with_watched_tag(mut self, tag: impl Into<String>) -> Self {
        self.watched_tags.push(tag.into());
        self
    }

    /// Treats an additional attribute name as dangerous.
    pub fn with_dangerous_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.dangerous_attributes.push(attribute.into());
        self
    }
}

/// Sanitizes a final answer with default options. `None` passes through.
pub fn sanitize(final_answer: Option<&str>) -> Option<String> {
    sanitize_with(final_answer, &Options::default())
}

/// Sanitizes a final answer with the given options. `None` passes through.
pub fn sanitize_with(final_answer: Option<&str>, options: &Options) -> Option<String> {
    let text = final_answer?;
    Some(Sanitizer::new(options).run(text))
}

/// One sanitize call's pipeline state.
struct Sanitizer<'a> {
    options: &'a Options,
    hosts: HostAuthorizer,
    escaped_links: EscapedLinks,
}

impl<'a> Sanitizer<'a> {
    fn new(options: &'a Options) -> Self {
        let hosts = HostAuthorizer::new(options.base_url.as_deref(), &options.allowed_hosts);
        Self {
            options,
            hosts,
            escaped_links: EscapedLinks::new(),
        }
    }

    fn run(mut self, text: &str) -> String {
        let text = self.escape_html_links(text);
        let text = self.escape_markdown_links(&text);
        let text = self.escape_plain_urls(&text);

        // Split adjacent backticks so a renderer cannot pair a fence with a
        // different-length closer, then detach backslashes from backticks.
        let text = normalize::space_between_backticks(&text);
        normalize::space_escaped_backticks(&text)
    }

    fn escape_html_links(&mut self, text: &str) -> String {
        let markdown_blocks = blocks::extract(text);
        let candidates = extract::html::extract(
            text,
            &self.options.watched_tags,
            &self.options.dangerous_attributes,
            &self.hosts,
            &markdown_blocks,
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(candidates = candidates.len(), "html link phase");
        let entries =
            escape::analyzer::analyze(text, &markdown_blocks, &candidates, &self.escaped_links);
        let text = escape::apply::apply(text, entries, &mut self.escaped_links);
        // The HTML5 parser entity-encodes stray angle brackets; put them
        // back before the later phases look at the text.
        text.replace("&lt;", "<").replace("&gt;", ">")
    }

    fn escape_markdown_links(&mut self, text: &str) -> String {
        let markdown_blocks = blocks::extract(text);
        // Identical literals are told apart by their appearance index, so
        // each occurrence of a repeated link is escaped exactly once.
        let mut seen: HashSet<(String, usize)> = HashSet::new();
        let mut candidates = Vec::new();
        for link in extract::markdown::extract(text) {
            if self.hosts.url_authorized(&link.link)
                || blocks::within(&markdown_blocks, link.span)
                || extract::markdown::safe_relative_url(&link.link)
            {
                continue;
            }
            if seen.insert((link.link.clone(), link.appearance)) {
                candidates.push(extract::LinkCandidate {
                    text: link.link,
                    span: link.span,
                });
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(candidates = candidates.len(), "markdown link phase");
        let entries =
            escape::analyzer::analyze(text, &markdown_blocks, &candidates, &self.escaped_links);
        escape::apply::apply(text, entries, &mut self.escaped_links)
    }

    fn escape_plain_urls(&mut self, text: &str) -> String {
        let markdown_blocks = blocks::extract(text);
        let mut set = extract::CandidateSet::default();
        for url in extract::urls::extract(text) {
            if extract::urls::scheme_only(&url) || self.hosts.url_authorized(&url) {
                continue;
            }
            let wrapped = extract::urls::within_escaped_link(text, &url);
            for occurrence in extract::urls::occurrences(text, &url) {
                if wrapped.iter().any(|span| span.contains(occurrence))
                    || blocks::within(&markdown_blocks, occurrence)
                {
                    continue;
                }
                set.push(&url, occurrence);
            }
        }
        let candidates = extract::urls::longest_per_start(set.into_sorted());
        #[cfg(feature = "tracing")]
        tracing::debug!(candidates = candidates.len(), "plain url phase");
        let entries =
            escape::analyzer::analyze(text, &markdown_blocks, &candidates, &self.escaped_links);
        escape::apply::apply(text, entries, &mut self.escaped_links)
    }
}
