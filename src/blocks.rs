// Fenced code block detection.
//
// Code blocks are exempt from every escaping rule: link candidates inside a
// fence are never touched and the backtick-spacing normalization leaves
// fence contents alone. Each pipeline phase re-extracts blocks from its
// current text, since earlier phases may have inserted characters.

use std::sync::LazyLock;

use regex::Regex;

use crate::span::Span;

/// Opening ``` with an optional info string, a newline, any content
/// (non-greedy), then a closing ``` followed by a newline or end of input.
static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\S*\n[\s\S]*?```(?:\n|$)").expect("code block regex"));

/// Byte spans of every fenced code block, left to right.
pub(crate) fn extract(text: &str) -> Vec<Span> {
    CODE_BLOCK
        .find_iter(text)
        .map(|m| Span::new(m.start(), m.end()))
        .collect()
}

/// Whether `span` falls entirely inside one of the (sorted) blocks.
pub(crate) fn within(blocks: &[Span], span: Span) -> bool {
    if blocks.is_empty() {
        return false;
    }
    let idx = blocks.partition_point(|block| block.start <= span.start);
    idx > 0 && blocks[idx - 1].contains(span)
}

/// Greatest block end at or before `pos`, if any.
pub(crate) fn nearest_end_before(blocks: &[Span], pos: usize) -> Option<usize> {
    blocks.iter().rev().map(|block| block.end).find(|&end| end <= pos)
}
