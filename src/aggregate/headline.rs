use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::MetricRecord;

use super::in_window;

/// A top-line metric card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetric {
    pub name: &'static str,
    pub value: f64,
    /// Percent change from the first half of the window to the second half.
    /// `None` when the first half is zero or the window is too short to split.
    pub delta_pct: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    posts: u64,
    likes: u64,
    engagement: f64,
}

impl Totals {
    fn collect(records: &[MetricRecord], window: &DateWindow) -> Self {
        in_window(records, window).fold(Self::default(), |mut acc, r| {
            acc.posts += 1;
            acc.likes = acc.likes.saturating_add(r.likes);
            acc.engagement += r.engagement_score;
            acc
        })
    }

    fn per_post(&self, total: f64) -> f64 {
        if self.posts == 0 {
            0.0
        } else {
            total / self.posts as f64
        }
    }

    fn cards(&self) -> [(&'static str, f64); 4] {
        [
            ("Total Posts", self.posts as f64),
            ("Total Likes", self.likes as f64),
            ("Avg. Likes", self.per_post(self.likes as f64)),
            ("Avg. Engagement", self.per_post(self.engagement)),
        ]
    }
}

/// Top-line metrics over the window, each with its trend across the window.
///
/// The trend compares the window's second half against its first half, so it
/// never looks at records outside the window. Returns nothing when the window
/// holds no posts.
pub fn headline_metrics(records: &[MetricRecord], window: &DateWindow) -> Vec<HeadlineMetric> {
    let current = Totals::collect(records, window);
    if current.posts == 0 {
        return Vec::new();
    }

    let trend = window.halves().map(|(first_half, second_half)| {
        (
            Totals::collect(records, &first_half).cards(),
            Totals::collect(records, &second_half).cards(),
        )
    });

    current
        .cards()
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| HeadlineMetric {
            name,
            value,
            delta_pct: trend
                .as_ref()
                .and_then(|(before, after)| percent_change(before[i].1, after[i].1)),
        })
        .collect()
}

fn percent_change(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        None
    } else {
        Some((new - old) / old * 100.0)
    }
}
