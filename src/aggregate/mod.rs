//! Pure reductions from raw records to the summary shapes each view renders.
//!
//! Every function here filters its input by the supplied [`DateWindow`]
//! itself, so a record outside the window can never reach an output. No
//! function mutates its input, and "no data" is always an empty result
//! rather than an error, with the single exception of [`histogram`].

pub mod breakdown;
pub mod content;
pub mod headline;
pub mod histogram;
pub mod ranking;
pub mod series;

use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::MetricRecord;

pub use self::breakdown::{
    by_category, count_by, percentage_breakdown, BreakdownEntry, CategoryValue,
};
pub use self::content::{
    content_calendar, hashtag_engagement, hashtag_usage, CalendarEntry, PublishStatus,
};
pub use self::headline::{headline_metrics, HeadlineMetric};
pub use self::histogram::{histogram, HistogramBin, HistogramError};
pub use self::ranking::{top_content, top_n, RankEntry, TopContentRow, DEFAULT_TOP_N};
pub use self::series::{hourly_activity, time_series_by_day, HourPoint, Reduction, SeriesPoint};

/// One computed view slot. Recomputed on every render, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SummaryResult {
    /// One point per UTC day, ascending.
    TimeSeries(Vec<SeriesPoint>),
    /// Descending by value, ties in input order.
    Ranking(Vec<RankEntry>),
    /// Top posts by engagement score, ties in input order.
    TopContent(Vec<TopContentRow>),
    Histogram(Vec<HistogramBin>),
    /// Integer percentages summing to 100.
    CategoryBreakdown(Vec<BreakdownEntry>),
    /// Mean metric per observed category.
    CategoryMetric(Vec<CategoryValue>),
    /// One point per UTC hour of day, 0 through 23.
    HourlyActivity(Vec<HourPoint>),
    Headline(Vec<HeadlineMetric>),
    Calendar(Vec<CalendarEntry>),
}

impl SummaryResult {
    /// Number of entries in the result.
    pub fn len(&self) -> usize {
        match self {
            Self::TimeSeries(v) => v.len(),
            Self::Ranking(v) => v.len(),
            Self::TopContent(v) => v.len(),
            Self::Histogram(v) => v.len(),
            Self::CategoryBreakdown(v) => v.len(),
            Self::CategoryMetric(v) => v.len(),
            Self::HourlyActivity(v) => v.len(),
            Self::Headline(v) => v.len(),
            Self::Calendar(v) => v.len(),
        }
    }

    /// Whether the result holds nothing to show.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records whose timestamp falls inside `window`, in input order.
pub(crate) fn in_window<'r>(
    records: &'r [MetricRecord],
    window: &DateWindow,
) -> impl Iterator<Item = &'r MetricRecord> + 'r {
    let window = *window;
    records.iter().filter(move |r| window.contains(r.timestamp))
}
