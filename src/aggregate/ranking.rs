use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::{ContentKind, MetricRecord};

use super::in_window;

/// Default ranking length for top content.
pub const DEFAULT_TOP_N: usize = 5;

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub label: String,
    pub value: f64,
}

/// Returns the `n` in-window records with the highest `rank_by`, descending.
///
/// The sort is stable: records that rank equally keep their input order.
pub fn top_n<'r, F>(
    records: &'r [MetricRecord],
    window: &DateWindow,
    n: usize,
    rank_by: F,
) -> Vec<&'r MetricRecord>
where
    F: Fn(&MetricRecord) -> f64,
{
    let mut ranked: Vec<(f64, &MetricRecord)> = in_window(records, window)
        .map(|record| (rank_by(record), record))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(n);
    ranked.into_iter().map(|(_, record)| record).collect()
}

/// One row of the top content table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopContentRow {
    pub id: String,
    pub kind: ContentKind,
    pub engagement_score: f64,
    pub likes: u64,
    pub comments: u64,
}

/// The `n` in-window posts with the highest engagement score, in [`top_n`]
/// order, with their per-post counts.
pub fn top_content(records: &[MetricRecord], window: &DateWindow, n: usize) -> Vec<TopContentRow> {
    top_n(records, window, n, |r| r.engagement_score)
        .into_iter()
        .map(|record| TopContentRow {
            id: record.id.clone(),
            kind: record.kind,
            engagement_score: record.engagement_score,
            likes: record.likes,
            comments: record.comments,
        })
        .collect()
}

/// Sorts labelled values descending, keeping input order for ties, and keeps
/// the first `limit`.
pub(crate) fn rank_entries(mut entries: Vec<RankEntry>, limit: usize) -> Vec<RankEntry> {
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(limit);
    entries
}
