// Escape-needs analysis.
//
// Walks candidates left to right and decides which side(s) of each link
// need a backtick. The beginning decision counts backtick parity between
// the previous candidate (or the nearest code-fence boundary) and the link:
// an odd count means the link already sits inside an open inline-code span,
// so adding a front backtick would close it early.

use crate::blocks;
use crate::escape::{EscapeEntry, EscapeMethod, EscapedLinks};
use crate::extract::LinkCandidate;
use crate::span::Span;

struct PreviousUrl {
    end: usize,
    required_ending: bool,
}

pub(crate) fn analyze(
    text: &str,
    markdown_blocks: &[Span],
    candidates: &[LinkCandidate],
    escaped_links: &EscapedLinks,
) -> Vec<EscapeEntry> {
    let mut entries = Vec::new();
    let mut previous: Option<PreviousUrl> = None;

    for candidate in candidates {
        let already = already_escaped(text, candidate);
        // For a link that already reads `link`, its wrapping backtick is
        // the left boundary: the parity scan must not reopen it, or every
        // sanitize pass would prepend another backtick. Only an in-call
        // record ending exactly here can still demand a fresh opener.
        let beginning = if already {
            escaped_links
                .iter()
                .any(|record| record[1] == candidate.span.start)
        } else {
            beginning_required(
                text,
                markdown_blocks,
                candidate,
                previous.as_ref(),
                escaped_links,
            )
        };
        let ending = ending_required(text, candidate);
        let covered = escaped_links
            .iter()
            .any(|record| candidate.span.start >= record[0] && candidate.span.end <= record[1]);

        if (already && !beginning && !ending) || covered {
            previous = None;
            continue;
        }

        let method = match (beginning, ending) {
            (true, true) => EscapeMethod::Both,
            (true, false) => EscapeMethod::Front,
            (false, true) => EscapeMethod::End,
            (false, false) => EscapeMethod::None,
        };
        entries.push(EscapeEntry {
            method,
            link: candidate.text.clone(),
            span: candidate.span,
        });
        previous = Some(PreviousUrl {
            end: candidate.span.end,
            required_ending: ending,
        });
    }

    entries
}

fn beginning_required(
    text: &str,
    markdown_blocks: &[Span],
    candidate: &LinkCandidate,
    previous: Option<&PreviousUrl>,
    escaped_links: &EscapedLinks,
) -> bool {
    // An earlier escape ending exactly here supplies the left boundary; a
    // fresh opening backtick is still needed to pair with its closer.
    if escaped_links
        .iter()
        .any(|record| record[1] == candidate.span.start)
    {
        return true;
    }

    let mut window_start = match previous {
        Some(prev) => prev.end + usize::from(prev.required_ending),
        None => 0,
    };
    if let Some(block_end) = blocks::nearest_end_before(markdown_blocks, candidate.span.start) {
        window_start = window_start.max(block_end);
    }
    let window_start = window_start.min(candidate.span.start);
    let window_end = candidate.span.end.min(text.len());
    if window_start >= window_end
        || !text.is_char_boundary(window_start)
        || !text.is_char_boundary(window_end)
    {
        return true;
    }

    match line_prefix(&text[window_start..window_end], &candidate.text) {
        Some(prefix) => prefix.matches('`').count() % 2 == 0,
        None => true,
    }
}

/// Prefix of the line holding the link's occurrence inside `window`, up to
/// the last occurrence that starts on that line.
fn line_prefix<'t>(window: &'t str, link: &str) -> Option<&'t str> {
    let first = window.find(link)?;
    let line_start = window[..first].rfind('\n').map_or(0, |pos| pos + 1);
    let line_end = window[first..].find('\n').map_or(window.len(), |pos| first + pos);

    let mut occurrence = first;
    let mut from = first + 1;
    while let Some(found) = window.get(from..).and_then(|rest| rest.find(link)) {
        let abs = from + found;
        if abs >= line_end {
            break;
        }
        occurrence = abs;
        from = abs + 1;
    }
    Some(&window[line_start..occurrence])
}

fn ending_required(text: &str, candidate: &LinkCandidate) -> bool {
    text.as_bytes().get(candidate.span.end) != Some(&b'`')
}

fn already_escaped(text: &str, candidate: &LinkCandidate) -> bool {
    let Span { start, end } = candidate.span;
    if start == 0 {
        return false;
    }
    let bytes = text.as_bytes();
    bytes.get(start - 1) == Some(&b'`')
        && bytes.get(end) == Some(&b'`')
        && text.get(start..end) == Some(candidate.text.as_str())
}
