// HTML link extraction.
//
// Runs the HTML5 parser over the answer text and walks the resulting
// elements in document order. An element becomes a candidate when its name
// is on the watch-list or it carries a dangerous attribute; the candidate's
// spans are every literal occurrence of the element's serialized form in
// the pre-parse text.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use super::{CandidateSet, LinkCandidate};
use crate::blocks;
use crate::hosts::HostAuthorizer;
use crate::span::Span;

pub(crate) fn extract(
    text: &str,
    watched_tags: &[String],
    dangerous_attributes: &[String],
    hosts: &HostAuthorizer,
    markdown_blocks: &[Span],
) -> Vec<LinkCandidate> {
    let dom = parse_html(text);
    let mut elements = Vec::new();
    collect_elements(&dom.document, &mut elements);

    let mut set = CandidateSet::default();
    // The parser closes a bare `<a>` with an implicit `</a>`. When the
    // anchor is explanatory prose (its serialization continues with a
    // backtick, as in "a `<a>` tag has two parts") it is skipped, but those
    // four phantom characters still shift every later element's offsets.
    let mut addition_index = 0usize;

    for element in &elements {
        let (name, harmful) = name_and_harm(element, dangerous_attributes);
        let watched = watched_tags.iter().any(|tag| tag == &name);
        if !watched && !harmful {
            continue;
        }
        let Some(serialized) = serialize_element(element) else {
            continue;
        };
        if serialized.starts_with("<a>`") {
            addition_index += 4;
            continue;
        }

        // The serializer entity-encodes ampersands; revert so the literal
        // matches the pre-parse text.
        let literal = serialized.replace("&amp;", "&");
        if hosts.url_authorized(&literal) {
            continue;
        }
        for occurrence in super::find_occurrences(text, &literal) {
            let start = occurrence.start + addition_index;
            let mut end = occurrence.end + addition_index;
            if harmful {
                end += 1;
            }
            let span = Span::new(start, end);
            if blocks::within(markdown_blocks, span) {
                continue;
            }
            set.push(&literal, span);
        }
    }

    set.into_sorted()
}

fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Element handles in document (preorder) order.
fn collect_elements(handle: &Handle, out: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { .. } = child.data {
            out.push(child.clone());
        }
        collect_elements(child, out);
    }
}

fn name_and_harm(element: &Handle, dangerous_attributes: &[String]) -> (String, bool) {
    match &element.data {
        NodeData::Element { name, attrs, .. } => {
            let harmful = attrs.borrow().iter().any(|attr| {
                dangerous_attributes
                    .iter()
                    .any(|dangerous| dangerous == attr.name.local.as_ref())
            });
            (name.local.as_ref().to_string(), harmful)
        }
        _ => (String::new(), false),
    }
}

fn serialize_element(element: &Handle) -> Option<String> {
    let mut buf = Vec::new();
    let serializable = SerializableHandle::from(element.clone());
    serialize(
        &mut buf,
        &serializable,
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )
    .ok()?;
    String::from_utf8(buf).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(text: &str) -> Vec<LinkCandidate> {
        let options = crate::Options::default();
        let hosts = HostAuthorizer::new(None, &[]);
        extract(
            text,
            &options.watched_tags,
            &options.dangerous_attributes,
            &hosts,
            &blocks::extract(text),
        )
    }

    #[test]
    fn test_anchor_becomes_candidate() {
        let text = r#"Check <a href="http://example.com">Link</a> out"#;
        let found = candidates(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, r#"<a href="http://example.com">Link</a>"#);
        assert_eq!(found[0].span.start, 6);
        assert_eq!(found[0].span.end, 6 + found[0].text.len());
    }

    #[test]
    fn test_dangerous_attribute_extends_span() {
        let text = r#"<img src="x" onerror="alert(1)">"#;
        let found = candidates(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.end, text.len() + 1);
    }

    #[test]
    fn test_unwatched_tag_is_ignored() {
        assert!(candidates("<div>plain prose</div>").is_empty());
    }

    #[test]
    fn test_anchor_inside_code_block_is_ignored() {
        let text = "```\n<a href=\"http://example.com\">Link</a>\n```\n";
        assert!(candidates(text).is_empty());
    }

    #[test]
    fn test_explanatory_bare_anchor_shifts_offsets() {
        let text = "A `<a>` tag link.\nReal: <a>http://example.com</a>";
        let found = candidates(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "<a>http://example.com</a>");
        let real = text.find("<a>h").unwrap();
        assert_eq!(found[0].span.start, real + 4);
    }

    #[test]
    fn test_authorized_href_is_skipped() {
        let text = r#"<a href="https://docs.example.test">Docs</a>"#;
        let options = crate::Options::default();
        let hosts = HostAuthorizer::new(None, &["docs.example.test".to_string()]);
        let found = extract(
            text,
            &options.watched_tags,
            &options.dangerous_attributes,
            &hosts,
            &[],
        );
        assert!(found.is_empty());
    }
}
