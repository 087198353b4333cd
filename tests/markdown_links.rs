// Markdown link escaping end to end.

use pretty_assertions::assert_eq;

fn sanitized(text: &str) -> String {
    linkfence::sanitize(Some(text)).unwrap()
}

#[test]
fn test_wraps_markdown_link() {
    assert_eq!(
        sanitized("Here is [GitLab](https://gitlab.com)"),
        "Here is `[GitLab](https://gitlab.com)`"
    );
}

#[test]
fn test_relative_link_is_left_alone() {
    let text = "See [docs](/help/user) for details";
    assert_eq!(sanitized(text), text);
}

#[test]
fn test_relative_link_hiding_a_scheme_is_escaped() {
    assert_eq!(
        sanitized("[trick](/redirect?to=https://evil.test)"),
        "`[trick](/redirect?to=https://evil.test)`"
    );
}

#[test]
fn test_relative_link_hiding_www_is_escaped() {
    assert_eq!(
        sanitized("[trick](/go/www.evil.test)"),
        "`[trick](/go/www.evil.test)`"
    );
}

#[test]
fn test_authorized_markdown_link_is_untouched() {
    let options = linkfence::Options::new().with_allowed_host("docs.example.test");
    let text = "read [the docs](https://docs.example.test/install)";
    assert_eq!(
        linkfence::sanitize_with(Some(text), &options).unwrap(),
        text
    );
}

#[test]
fn test_markdown_link_inside_code_block_is_exempt() {
    let text = "```\n[evil](http://evil.test)\n```\n";
    assert_eq!(sanitized(text), text);
}

#[test]
fn test_link_text_spanning_lines() {
    assert_eq!(
        sanitized("[split\ntext](https://example.com)"),
        "`[split\ntext](https://example.com)`"
    );
}

#[test]
fn test_markdown_link_followed_by_bare_url() {
    assert_eq!(
        sanitized("[google](https://google.com)https://google.com"),
        "`[google](https://google.com)` `https://google.com`"
    );
}

#[test]
fn test_repeated_identical_links() {
    assert_eq!(
        sanitized("[a](http://x.test) and [a](http://x.test)"),
        "`[a](http://x.test)` and `[a](http://x.test)`"
    );
}

#[test]
fn test_idempotent() {
    let once = sanitized("Mix [one](http://one.test) and [two](http://two.test) with http://three.test");
    assert_eq!(sanitized(&once), once);
}
