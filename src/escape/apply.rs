// Rewrite application.
//
// Applies escape entries left to right, splicing by byte index and keeping
// a running correction so spans computed against the pre-rewrite text keep
// landing on the right characters, however many backticks earlier links
// shed or gained.

use std::collections::HashSet;

use crate::escape::pattern::{self, PreEscapeContext};
use crate::escape::{EscapeEntry, EscapedLinks};

/// Cumulative offset corrections for one application pass.
#[derive(Debug, Default)]
struct RunningIndexState {
    /// Characters inserted by escapes so far.
    added: usize,
    /// Backticks stripped out of link interiors so far.
    backticks_removed: usize,
}

impl RunningIndexState {
    fn current(&self, index: usize) -> usize {
        (index + self.added).saturating_sub(self.backticks_removed)
    }
}

pub(crate) fn apply(
    text: &str,
    mut entries: Vec<EscapeEntry>,
    escaped_links: &mut EscapedLinks,
) -> String {
    entries.sort_by_key(|entry| entry.span.start);

    let mut text = text.to_owned();
    let mut state = RunningIndexState::default();
    let mut unique_links: HashSet<(usize, usize)> = HashSet::new();

    for entry in &entries {
        let start = state.current(entry.span.start);
        let end = state.current(entry.span.end).min(text.len());

        if covered(escaped_links, start, end) || unique_links.contains(&(start, end)) {
            continue;
        }
        let Some(region) = region_at(&text, start, end) else {
            continue;
        };
        if !region.contains(entry.link.as_str()) {
            // The link no longer sits where the span says (offsets drifted
            // around a skipped element); leave the text alone.
            continue;
        }

        // A backtick inside the link text would terminate the new span.
        let backtick_count = entry.link.matches('`').count();
        let stripped = if backtick_count > 0 {
            entry.link.replace('`', "")
        } else {
            entry.link.clone()
        };

        let context = PreEscapeContext::at(&text, start);
        let rewrite = pattern::generate(entry.method, &stripped, context);
        let new_region = region.replacen(entry.link.as_str(), &rewrite.replacement, 1);
        let delta = new_region.len() as isize - region.len() as isize;

        let mut rebuilt = String::with_capacity(text.len().saturating_add_signed(delta));
        rebuilt.push_str(&text[..start]);
        rebuilt.push_str(&new_region);
        rebuilt.push_str(&text[end..]);
        text = rebuilt;

        let record_start = start.saturating_sub(rewrite.record_start_delta);
        escaped_links.push([record_start, end]);
        unique_links.insert((record_start, end));
        shift_records(escaped_links, record_start, delta);

        // Net insertions, before the stripped backticks are discounted.
        state.added += usize::try_from(delta + backtick_count as isize).unwrap_or(0);
        state.backticks_removed += backtick_count;
    }

    text
}

fn covered(records: &EscapedLinks, start: usize, end: usize) -> bool {
    records
        .iter()
        .any(|record| start >= record[0] && end <= record[1])
}

fn region_at(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    text.get(start..end)
}

/// Shifts every record at or right of `from` by `delta`. With a single
/// record only its end moves; once more records exist their starts shift
/// too, keeping chained side-by-side escapes aligned.
fn shift_records(records: &mut EscapedLinks, from: usize, delta: isize) {
    if delta == 0 {
        return;
    }
    let shift_start = records.len() > 1;
    for record in records.iter_mut() {
        if record[0] < from {
            continue;
        }
        if shift_start {
            record[0] = record[0].saturating_add_signed(delta);
        }
        record[1] = record[1].saturating_add_signed(delta);
    }
}
