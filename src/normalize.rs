// Backtick-spacing normalization.
//
// Last line of defense against fence-length ambiguity: outside code blocks,
// runs of adjacent backticks are split with spaces, and a backslash run
// directly before a backtick gets a space so the backslash cannot swallow
// the fence.

use std::sync::LazyLock;

use regex::Regex;

use crate::blocks;
use crate::span::Span;

static BACKTICK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{2,}").expect("backtick run regex"));

static ESCAPED_BACKTICK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+`").expect("escaped backtick regex"));

/// ```` ``` ```` becomes `` ` ` ` `` outside code blocks.
pub(crate) fn space_between_backticks(text: &str) -> String {
    rewrite_outside_blocks(text, &BACKTICK_RUN, |run| {
        vec!["`"; run.len()].join(" ")
    })
}

/// `\`` becomes `\ ``; the backslash run is kept intact.
pub(crate) fn space_escaped_backticks(text: &str) -> String {
    rewrite_outside_blocks(text, &ESCAPED_BACKTICK, |m| {
        format!("{} `", &m[..m.len() - 1])
    })
}

fn rewrite_outside_blocks(
    text: &str,
    pattern: &Regex,
    replace: impl Fn(&str) -> String,
) -> String {
    let markdown_blocks = blocks::extract(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in pattern.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if blocks::within(&markdown_blocks, Span::new(m.start(), m.end())) {
            out.push_str(m.as_str());
        } else {
            out.push_str(&replace(m.as_str()));
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_splits_backtick_runs() {
        assert_eq!(space_between_backticks("see ``bad``"), "see ` `bad` `");
        assert_eq!(space_between_backticks("a ``` b"), "a ` ` ` b");
    }

    #[test]
    fn test_single_backticks_untouched() {
        assert_eq!(space_between_backticks("a `code` b"), "a `code` b");
    }

    #[test]
    fn test_code_fences_survive() {
        let text = "```\nlet x = 1;\n```\n";
        assert_eq!(space_between_backticks(text), text);
    }

    #[test]
    fn test_backtick_run_outside_block_still_split() {
        let text = "```\ncode\n```\ntail ``";
        assert_eq!(space_between_backticks(text), "```\ncode\n```\ntail ` `");
    }

    #[test]
    fn test_spaces_escaped_backticks() {
        assert_eq!(space_escaped_backticks(r"a \` b"), r"a \ ` b");
        assert_eq!(space_escaped_backticks(r"a \\\` b"), r"a \\\ ` b");
    }

    #[test]
    fn test_escaped_backtick_inside_block_untouched() {
        let text = "```\nputs \"\\`\"\n```\n";
        assert_eq!(space_escaped_backticks(text), text);
    }
}
