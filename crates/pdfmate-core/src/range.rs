//! Page range parsing and serialization
//!
//! Converts between human-entered range strings ("1-5, 8, 11-13", 1-based)
//! and 0-based page indices. Parsing never fails: tokens that are malformed
//! or fall outside the document are dropped, and the caller decides what an
//! empty result means.

use std::collections::BTreeSet;

/// Full-width comma typed by CJK input methods
const FULL_WIDTH_COMMA: char = '\u{FF0C}';

/// Parse a range string into 0-based page indices.
///
/// Order follows the input, duplicates are kept and descending ranges walk
/// backwards, so `"5-1"` yields `[4, 3, 2, 1, 0]`. Indices are always within
/// `[0, total_pages)`.
pub fn parse_page_range(range: &str, total_pages: u32) -> Vec<u32> {
    let total = i64::from(total_pages);
    let normalized = range.replace(FULL_WIDTH_COMMA, ",");
    let mut indices = Vec::new();

    for part in normalized.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.contains('-') {
            let bounds: Vec<&str> = part.split('-').map(str::trim).collect();
            if bounds.len() != 2 {
                continue;
            }
            let (Some(start), Some(end)) = (parse_int(bounds[0]), parse_int(bounds[1])) else {
                continue;
            };

            if start <= end {
                for page in start.max(1)..=end.min(total) {
                    indices.push((page - 1) as u32);
                }
            } else {
                for page in (end.max(1)..=start.min(total)).rev() {
                    indices.push((page - 1) as u32);
                }
            }
        } else if let Some(page) = parse_int(part) {
            if (1..=total).contains(&page) {
                indices.push((page - 1) as u32);
            }
        }
    }

    indices
}

/// Serialize 0-based indices into the shortest 1-based range string.
///
/// Runs are emitted in ascending order regardless of input order; duplicates
/// collapse. An empty input yields an empty string.
pub fn format_page_selection<I>(indices: I) -> String
where
    I: IntoIterator<Item = u32>,
{
    let sorted: BTreeSet<u32> = indices.into_iter().collect();
    let mut runs: Vec<String> = Vec::new();
    let mut iter = sorted.into_iter();

    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut run_start = first;
    let mut prev = first;
    for current in iter {
        if current == prev + 1 {
            prev = current;
            continue;
        }
        runs.push(format_run(run_start, prev));
        run_start = current;
        prev = current;
    }
    runs.push(format_run(run_start, prev));

    runs.join(", ")
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        format!("{}", u64::from(start) + 1)
    } else {
        format!("{}-{}", u64::from(start) + 1, u64::from(end) + 1)
    }
}

/// Lenient integer parse: an optional sign followed by leading ASCII digits.
/// Anything after the digits is ignored ("3abc" is 3); no digits means None.
fn parse_int(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
