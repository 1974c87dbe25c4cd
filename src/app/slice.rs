//! Query-string bounded slicing.
//!
//! Bounds follow permissive array-slice rules: a missing or non-numeric
//! bound falls back to its default (0 for `begin`, the length for `end`),
//! negative bounds count back from the end, and everything is clamped to
//! the collection. `begin >= end` yields an empty slice.

/// Resolve raw `begin`/`end` strings into a valid `start..stop` range.
pub fn slice_bounds(begin: Option<&str>, end: Option<&str>, len: usize) -> (usize, usize) {
    let start = resolve(begin, len).unwrap_or(0);
    let stop = resolve(end, len).unwrap_or(len);
    if start >= stop {
        (start, start)
    } else {
        (start, stop)
    }
}

/// Slice `items` by raw query bounds.
pub fn slice_by_query<'a, T>(items: &'a [T], begin: Option<&str>, end: Option<&str>) -> &'a [T] {
    let (start, stop) = slice_bounds(begin, end, items.len());
    &items[start..stop]
}

fn resolve(raw: Option<&str>, len: usize) -> Option<usize> {
    let value: i64 = raw?.trim().parse().ok()?;
    let len = len as i64;
    let index = if value < 0 { len + value } else { value };
    Some(index.clamp(0, len) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSOLES: [&str; 3] = ["Nintendo Switch", "Playstation 4", "Xbox One"];

    #[test]
    fn test_defaults_cover_everything() {
        assert_eq!(slice_by_query(&CONSOLES, None, None), &CONSOLES[..]);
    }

    #[test]
    fn test_both_bounds() {
        assert_eq!(slice_by_query(&CONSOLES, Some("1"), Some("2")), &["Playstation 4"]);
        assert_eq!(slice_by_query(&CONSOLES, Some("0"), Some("3")), &CONSOLES[..]);
    }

    #[test]
    fn test_single_bound() {
        assert_eq!(slice_by_query(&CONSOLES, Some("2"), None), &["Xbox One"]);
        assert_eq!(slice_by_query(&CONSOLES, None, Some("1")), &["Nintendo Switch"]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(slice_bounds(Some("10"), None, 3), (3, 3));
        assert_eq!(slice_bounds(None, Some("99"), 3), (0, 3));
        assert_eq!(slice_bounds(Some("2"), Some("1"), 3), (2, 2));
    }

    #[test]
    fn test_negative_counts_from_end() {
        assert_eq!(slice_by_query(&CONSOLES, Some("-1"), None), &["Xbox One"]);
        assert_eq!(slice_by_query(&CONSOLES, None, Some("-1")), &CONSOLES[..2]);
        assert_eq!(slice_bounds(Some("-10"), None, 3), (0, 3));
    }

    #[test]
    fn test_malformed_falls_back_to_default() {
        assert_eq!(slice_bounds(Some("abc"), Some("xyz"), 3), (0, 3));
        assert_eq!(slice_bounds(Some(""), Some("2"), 3), (0, 2));
    }
}
