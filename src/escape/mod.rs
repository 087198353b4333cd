// Escape decision and application.
//
// The analyzer decides, per candidate, which side(s) need a backtick; the
// pattern handler renders the replacement for the surrounding context; the
// applicator splices replacements left to right while keeping every
// previously recorded span valid.

pub(crate) mod analyzer;
pub(crate) mod apply;
pub(crate) mod pattern;

use crate::span::Span;

/// Which side(s) of a link need an escaping backtick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeMethod {
    /// Leading and trailing backtick.
    Both,
    /// Leading backtick only; the link is already closed on the right.
    Front,
    /// Trailing backtick only; an earlier backtick already opens the span.
    End,
    /// No backticks needed, but the span is still tracked for chaining.
    None,
}

/// One unit of rewrite work: a link, its span, and the escape it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EscapeEntry {
    pub method: EscapeMethod,
    pub link: String,
    pub span: Span,
}

/// Spans already rewritten with escaping during this sanitize call,
/// in current-text coordinates. Records shift in place as later rewrites
/// insert or remove characters to their left.
pub(crate) type EscapedLinks = Vec<[usize; 2]>;
