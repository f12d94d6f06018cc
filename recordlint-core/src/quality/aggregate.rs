//! Issue aggregation: affected-record union, per-issue share and the
//! whole-table quality score.

use std::collections::BTreeSet;

use crate::table::RecordIndex;
use crate::temporal::round_to;

use super::models::Issue;

/// Score of a table with no records.
pub const PERFECT_SCORE: f64 = 100.0;

/// Distinct records touched by at least one issue.
pub fn affected_union<'a, I>(issues: I) -> BTreeSet<RecordIndex>
where
    I: IntoIterator<Item = &'a Issue>,
{
    issues
        .into_iter()
        .flat_map(|issue| issue.affected_records.iter().copied())
        .collect()
}

/// Share of the table implicated by an issue's count, in percent with two
/// decimals.
///
/// The count is used as-is, so an issue whose count exceeds its affected
/// record set is reported accordingly.
pub fn affected_percentage(count: usize, total_records: usize) -> f64 {
    if total_records == 0 {
        return 0.0;
    }
    round_to(count as f64 / total_records as f64 * 100.0, 2)
}

/// Quality score from 0 to 100 with one decimal.
///
/// Each record touched by any issue lowers the score by the same amount,
/// however many issues touch it.
pub fn quality_score(affected_records: usize, total_records: usize) -> f64 {
    if total_records == 0 {
        return PERFECT_SCORE;
    }
    let score = PERFECT_SCORE - affected_records as f64 / total_records as f64 * 100.0;
    round_to(score.max(0.0), 1)
}
