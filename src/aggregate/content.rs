use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::{ContentKind, MetricRecord};

use super::in_window;
use super::ranking::{rank_entries, RankEntry};

/// Whether a calendar entry has gone out yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Published,
    Scheduled,
}

/// One row of the content calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEntry {
    pub timestamp: DateTime<Utc>,
    pub id: String,
    pub kind: ContentKind,
    pub status: PublishStatus,
}

/// In-window posts in chronological order; equal timestamps keep input order.
/// Posts after `as_of` are reported as scheduled.
pub fn content_calendar(
    records: &[MetricRecord],
    window: &DateWindow,
    as_of: DateTime<Utc>,
) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = in_window(records, window)
        .map(|record| CalendarEntry {
            timestamp: record.timestamp,
            id: record.id.clone(),
            kind: record.kind,
            status: if record.timestamp <= as_of {
                PublishStatus::Published
            } else {
                PublishStatus::Scheduled
            },
        })
        .collect();
    entries.sort_by_key(|entry| entry.timestamp);
    entries
}

/// Hashtags ranked by how many in-window posts use them.
pub fn hashtag_usage(records: &[MetricRecord], window: &DateWindow, limit: usize) -> Vec<RankEntry> {
    let entries = tally_hashtags(records, window)
        .into_iter()
        .map(|(tag, stats)| RankEntry {
            label: format!("#{tag}"),
            value: f64::from(stats.uses),
        })
        .collect();
    rank_entries(entries, limit)
}

/// Hashtags ranked by the mean engagement score of the posts using them.
pub fn hashtag_engagement(
    records: &[MetricRecord],
    window: &DateWindow,
    limit: usize,
) -> Vec<RankEntry> {
    let entries = tally_hashtags(records, window)
        .into_iter()
        .map(|(tag, stats)| RankEntry {
            label: format!("#{tag}"),
            value: stats.engagement / f64::from(stats.uses),
        })
        .collect();
    rank_entries(entries, limit)
}

#[derive(Debug, Default, Clone, Copy)]
struct TagStats {
    uses: u32,
    engagement: f64,
}

/// Per-hashtag stats in order of first appearance.
fn tally_hashtags<'r>(records: &'r [MetricRecord], window: &DateWindow) -> Vec<(&'r str, TagStats)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut tally: Vec<(&str, TagStats)> = Vec::new();

    for record in in_window(records, window) {
        for tag in &record.hashtags {
            let idx = *position.entry(tag.as_str()).or_insert_with(|| {
                tally.push((tag.as_str(), TagStats::default()));
                tally.len() - 1
            });
            let stats = &mut tally[idx].1;
            stats.uses += 1;
            stats.engagement += record.engagement_score;
        }
    }

    tally
}
