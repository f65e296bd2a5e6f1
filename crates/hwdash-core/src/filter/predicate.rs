// ── Filter predicates ──
//
// Reusable, total matching primitives shared by every list filter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Numeric column filtered as a two-valued category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NumericBucket {
    /// The value is `0`.
    NotExist,
    /// The value is `1` or more.
    Exist,
}

/// Calendar-day range, inclusive on both ends, open when a bound is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// `true` when every token of `query` is a substring of `candidate`.
///
/// Tokens are split on whitespace and commas; matching ignores case.
/// An empty (or all-separator) query matches everything.
pub fn is_all_string_included(candidate: &str, query: &str) -> bool {
    let haystack = candidate.to_lowercase();
    query
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .all(|token| haystack.contains(&token.to_lowercase()))
}

/// `true` when `selected` is empty, or `value` falls in a selected bucket.
pub fn numeric_bucket_match(value: u64, selected: &[NumericBucket]) -> bool {
    if selected.is_empty() {
        return true;
    }
    let bucket = if value == 0 {
        NumericBucket::NotExist
    } else {
        NumericBucket::Exist
    };
    selected.contains(&bucket)
}

/// `true` when `range` is unbounded, or `value` lies within it.
///
/// A missing `value` never matches a bounded range. Bounds compare on the
/// UTC calendar date, so the start bound includes its whole first day and
/// the end bound its whole last day.
pub fn is_date_in_range(value: Option<DateTime<Utc>>, range: &DateRange) -> bool {
    if range.is_unbounded() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    let day = value.date_naive();
    range.start.is_none_or(|start| day >= start) && range.end.is_none_or(|end| day <= end)
}

/// `true` when `selected` is empty or contains `value`.
pub fn categorical_match<T: PartialEq>(value: &T, selected: &[T]) -> bool {
    selected.is_empty() || selected.contains(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn empty_query_matches_anything() {
        assert!(is_all_string_included("", ""));
        assert!(is_all_string_included("node-1", ""));
        assert!(is_all_string_included("node-1", "  , "));
    }

    #[test]
    fn every_token_must_match() {
        assert!(is_all_string_included("rack1-node-03", "rack1 03"));
        assert!(is_all_string_included("rack1-node-03", "node,rack"));
        assert!(!is_all_string_included("rack1-node-03", "rack2 03"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(is_all_string_included("CXL11", "cxl"));
        assert!(is_all_string_included("memory", "MEM"));
    }

    #[test]
    fn repeated_calls_agree() {
        let first = is_all_string_included("gpu-0007", "gpu 7");
        let second = is_all_string_included("gpu-0007", "gpu 7");
        assert_eq!(first, second);
    }

    // ── Numeric buckets ──────────────────────────────────────────────

    #[test]
    fn numeric_bucket_partition() {
        for value in [0_u64, 1, 2, 17, u64::MAX] {
            let not_exist = numeric_bucket_match(value, &[NumericBucket::NotExist]);
            let exist = numeric_bucket_match(value, &[NumericBucket::Exist]);
            assert!(not_exist ^ exist, "value {value} must match exactly one bucket");
            assert_eq!(not_exist, value == 0);
        }
    }

    #[test]
    fn empty_selection_matches_everything() {
        assert!(numeric_bucket_match(0, &[]));
        assert!(numeric_bucket_match(5, &[]));
    }

    #[test]
    fn both_buckets_match_everything() {
        let both = [NumericBucket::NotExist, NumericBucket::Exist];
        assert!(numeric_bucket_match(0, &both));
        assert!(numeric_bucket_match(3, &both));
    }

    #[test]
    fn bucket_wire_names() {
        assert_eq!(NumericBucket::NotExist.to_string(), "notExist");
        assert_eq!("exist".parse::<NumericBucket>().unwrap(), NumericBucket::Exist);
    }

    // ── Date ranges ──────────────────────────────────────────────────

    #[test]
    fn unbounded_range_matches_missing_value() {
        assert!(is_date_in_range(None, &DateRange::default()));
    }

    #[test]
    fn missing_value_never_matches_bounded_range() {
        let range = DateRange::new(Some(day(2024, 1, 1)), None);
        assert!(!is_date_in_range(None, &range));
        let range = DateRange::new(None, Some(day(2024, 1, 1)));
        assert!(!is_date_in_range(None, &range));
    }

    #[test]
    fn boundaries_are_inclusive() {
        let range = DateRange::new(Some(day(2024, 3, 10)), Some(day(2024, 3, 20)));
        assert!(is_date_in_range(Some(at(2024, 3, 10, 0, 0, 0)), &range));
        assert!(is_date_in_range(Some(at(2024, 3, 20, 23, 59, 59)), &range));
        assert!(!is_date_in_range(Some(at(2024, 3, 9, 23, 59, 59)), &range));
        assert!(!is_date_in_range(Some(at(2024, 3, 21, 0, 0, 0)), &range));
    }

    #[test]
    fn one_sided_ranges() {
        let from = DateRange::new(Some(day(2024, 3, 10)), None);
        assert!(is_date_in_range(Some(at(2030, 1, 1, 0, 0, 0)), &from));
        assert!(!is_date_in_range(Some(at(2024, 3, 9, 12, 0, 0)), &from));

        let until = DateRange::new(None, Some(day(2024, 3, 10)));
        assert!(is_date_in_range(Some(at(2000, 1, 1, 0, 0, 0)), &until));
        assert!(!is_date_in_range(Some(at(2024, 3, 11, 0, 0, 0)), &until));
    }

    #[test]
    fn categorical_semantics() {
        assert!(categorical_match(&3, &[]));
        assert!(categorical_match(&3, &[1, 3]));
        assert!(!categorical_match(&2, &[1, 3]));
    }
}
