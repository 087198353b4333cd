// Escape replacement rendering.
//
// Given the escape method and the two bytes immediately preceding the link
// in the current text, renders the literal replacement. A `\`` pair or a
// bare `\` before the link forces a space so the inserted backtick cannot
// merge into an adjacent escape sequence; the backslash itself stays
// outside the replaced region.

use crate::escape::EscapeMethod;

/// What sits immediately before the candidate in the current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PreEscapeContext {
    /// The two preceding bytes are `\` then a backtick.
    pub escaped_backtick: bool,
    /// The preceding byte is a bare backslash.
    pub backslash: bool,
}

impl PreEscapeContext {
    pub fn at(text: &str, start: usize) -> Self {
        let bytes = text.as_bytes();
        let prev = start.checked_sub(1).and_then(|i| bytes.get(i)).copied();
        let prev2 = start.checked_sub(2).and_then(|i| bytes.get(i)).copied();
        Self {
            escaped_backtick: prev2 == Some(b'\\') && prev == Some(b'`'),
            backslash: prev == Some(b'\\'),
        }
    }
}

/// A rendered replacement for a link, plus how far left of the link's
/// current start its escaped-span record should begin.
#[derive(Debug)]
pub(crate) struct Rewrite {
    pub replacement: String,
    pub record_start_delta: usize,
}

pub(crate) fn generate(method: EscapeMethod, link: &str, context: PreEscapeContext) -> Rewrite {
    let (replacement, record_start_delta) = match method {
        EscapeMethod::Both => {
            if context.escaped_backtick {
                (format!(" `{link}`"), 0)
            } else if context.backslash {
                (format!(" `{link}`"), 1)
            } else {
                (format!("`{link}`"), 0)
            }
        }
        EscapeMethod::Front => {
            if context.escaped_backtick || context.backslash {
                (format!(" `{link}"), 1)
            } else {
                (format!("`{link}"), 0)
            }
        }
        EscapeMethod::End => {
            if context.backslash {
                // The space keeps the backslash from escaping the link's
                // first character.
                (format!(" {link}`"), 2)
            } else if context.escaped_backtick {
                (format!("{link}`"), 1)
            } else {
                (format!("{link}`"), 0)
            }
        }
        EscapeMethod::None => (link.to_owned(), 0),
    };
    Rewrite {
        replacement,
        record_start_delta,
    }
}
