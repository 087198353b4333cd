// Link candidate extraction.
//
// Three extractors feed the escape pipeline: HTML elements, markdown link
// constructs, and bare URLs. Each produces `LinkCandidate`s holding the
// literal link text and its byte span in the current answer text.

pub(crate) mod html;
pub(crate) mod markdown;
pub(crate) mod urls;

use std::collections::HashSet;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkCandidate {
    pub text: String,
    pub span: Span,
}

/// Collects candidates, dropping duplicate `(start, end)` positions.
#[derive(Default)]
pub(crate) struct CandidateSet {
    candidates: Vec<LinkCandidate>,
    seen: HashSet<(usize, usize)>,
}

impl CandidateSet {
    pub fn push(&mut self, text: &str, span: Span) {
        if self.seen.insert((span.start, span.end)) {
            self.candidates.push(LinkCandidate {
                text: text.to_owned(),
                span,
            });
        }
    }

    /// Candidates sorted ascending by start offset.
    pub fn into_sorted(self) -> Vec<LinkCandidate> {
        let mut candidates = self.candidates;
        candidates.sort_by_key(|c| (c.span.start, c.span.end));
        candidates
    }
}

/// Byte spans of every literal occurrence of `needle` in `haystack`.
pub(crate) fn find_occurrences(haystack: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(needle)
        .map(|(i, m)| Span::new(i, i + m.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_set_dedups_positions() {
        let mut set = CandidateSet::default();
        set.push("a", Span::new(0, 1));
        set.push("a", Span::new(0, 1));
        set.push("b", Span::new(4, 5));
        assert_eq!(set.into_sorted().len(), 2);
    }

    #[test]
    fn test_into_sorted_orders_by_start() {
        let mut set = CandidateSet::default();
        set.push("b", Span::new(4, 5));
        set.push("a", Span::new(0, 1));
        let sorted = set.into_sorted();
        assert_eq!(sorted[0].text, "a");
        assert_eq!(sorted[1].text, "b");
    }

    #[test]
    fn test_find_occurrences() {
        let spans = find_occurrences("ab ab", "ab");
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(3, 5)]);
        assert!(find_occurrences("ab", "").is_empty());
    }
}
