use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::SummaryResult;
use crate::filter::DateWindow;

use super::View;

/// Slot names used in [`RenderPayload::slots`].
pub mod slots {
    pub const HEADLINE_METRICS: &str = "headlineMetrics";
    pub const ENGAGEMENT_TIME_SERIES: &str = "engagementTimeSeries";
    pub const TOP_CONTENT: &str = "topContent";

    pub const ENGAGEMENT_BY_TYPE: &str = "engagementByType";
    pub const ENGAGEMENT_DISTRIBUTION: &str = "engagementDistribution";

    pub const CONTENT_CALENDAR: &str = "contentCalendar";
    pub const HASHTAG_USAGE: &str = "hashtagUsage";
    pub const HASHTAG_ENGAGEMENT: &str = "hashtagEngagement";

    pub const AGE_BREAKDOWN: &str = "ageBreakdown";
    pub const GENDER_BREAKDOWN: &str = "genderBreakdown";
    pub const HOURLY_ACTIVITY: &str = "hourlyActivity";
}

/// Everything a renderer needs to draw one view. Never carries raw records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    pub view: View,
    pub title: &'static str,
    pub window: DateWindow,
    pub slots: BTreeMap<&'static str, SummaryResult>,
}

impl RenderPayload {
    pub(crate) fn new(view: View, window: DateWindow) -> Self {
        Self {
            view,
            title: view.title(),
            window,
            slots: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, slot: &'static str, result: SummaryResult) {
        self.slots.insert(slot, result);
    }

    /// Returns the result stored in `slot`, if this view fills it.
    pub fn slot(&self, slot: &str) -> Option<&SummaryResult> {
        self.slots.get(slot)
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(SummaryResult::is_empty)
    }
}
