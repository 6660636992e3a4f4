use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::aggregate::{
    self, by_category, content_calendar, count_by, hashtag_engagement, hashtag_usage,
    headline_metrics, histogram, hourly_activity, percentage_breakdown, time_series_by_day,
    top_content, HistogramError, Reduction, SummaryResult, DEFAULT_TOP_N,
};
use crate::filter::{DateRangeFilter, DateWindow, InvalidRangeError};
use crate::record::AudienceEvent;
use crate::store::MetricStore;

use super::payload::{slots, RenderPayload};
use super::{View, ViewState};

/// Tunables for the per-view aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Length of the top content ranking.
    pub top_n: usize,
    /// Bin count of the engagement distribution.
    pub histogram_bins: usize,
    /// Length of each hashtag ranking.
    pub hashtag_limit: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            histogram_bins: 10,
            hashtag_limit: 5,
        }
    }
}

/// Tracks the active view and turns the current window into a
/// [`RenderPayload`] for it.
///
/// Views form a flat, fully connected state machine with no terminal
/// state. Navigation and window changes are the only mutations; rendering
/// only reads.
#[derive(Debug)]
pub struct ViewRouter<'s> {
    store: &'s MetricStore,
    active: View,
    filter: DateRangeFilter,
    settings: RenderSettings,
}

impl<'s> ViewRouter<'s> {
    /// Creates a router starting at `initial`.
    pub fn new(
        store: &'s MetricStore,
        filter: DateRangeFilter,
        initial: View,
        settings: RenderSettings,
    ) -> Self {
        Self {
            store,
            active: initial,
            filter,
            settings,
        }
    }

    /// Switches to `view`. Never touches the date window.
    pub fn navigate_to(&mut self, view: View) {
        if self.active != view {
            debug!(from = %self.active, to = %view, "navigated");
        }
        self.active = view;
    }

    pub fn active_view(&self) -> View {
        self.active
    }

    pub fn current_window(&self) -> Arc<DateWindow> {
        self.filter.current_window()
    }

    /// Returns a snapshot of the active view and window.
    pub fn state(&self) -> ViewState {
        ViewState {
            active_view: self.active,
            window: self.filter.current_window(),
        }
    }

    /// Replaces the date window. The filter's error is returned as is.
    pub fn update_window(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), InvalidRangeError> {
        self.filter.set_window(start, end).inspect_err(|err| {
            warn!(%err, "rejected date window update");
        })
    }

    /// Re-anchors the default trailing window at `now`.
    pub fn refresh_window(&mut self, now: DateTime<Utc>) {
        self.filter.refresh(now);
    }

    /// Computes every slot of the active view over the current window.
    pub fn render(&self) -> RenderPayload {
        let window = self.filter.current_window();
        let mut payload = RenderPayload::new(self.active, *window);

        match self.active {
            View::Overview => self.render_overview(&window, &mut payload),
            View::Engagement => self.render_engagement(&window, &mut payload),
            View::Content => self.render_content(&window, &mut payload),
            View::Audience => self.render_audience(&window, &mut payload),
        }

        debug!(
            view = %self.active,
            slots = payload.slots.len(),
            empty = payload.is_empty(),
            "rendered view",
        );

        payload
    }

    fn render_overview(&self, window: &DateWindow, payload: &mut RenderPayload) {
        let records = self.store.load_all();

        payload.insert(
            slots::HEADLINE_METRICS,
            SummaryResult::Headline(headline_metrics(records, window)),
        );
        payload.insert(
            slots::ENGAGEMENT_TIME_SERIES,
            SummaryResult::TimeSeries(time_series_by_day(
                records,
                window,
                |r| r.engagement_score,
                Reduction::Mean,
            )),
        );
        payload.insert(
            slots::TOP_CONTENT,
            SummaryResult::TopContent(top_content(records, window, self.settings.top_n)),
        );
    }

    fn render_engagement(&self, window: &DateWindow, payload: &mut RenderPayload) {
        let records = self.store.load_all();

        payload.insert(
            slots::ENGAGEMENT_BY_TYPE,
            SummaryResult::CategoryMetric(by_category(
                records,
                window,
                |r| r.kind,
                |r| r.engagement_score,
            )),
        );

        let scores: Vec<f64> = aggregate::in_window(records, window)
            .map(|r| r.engagement_score)
            .collect();
        let bins = match histogram(&scores, self.settings.histogram_bins) {
            Ok(bins) => bins,
            // Nothing in range: hand the renderer an empty chart.
            Err(HistogramError::EmptyInput) => Vec::new(),
            Err(err) => {
                warn!(%err, bins = self.settings.histogram_bins, "engagement distribution skipped");
                Vec::new()
            }
        };
        payload.insert(slots::ENGAGEMENT_DISTRIBUTION, SummaryResult::Histogram(bins));
    }

    fn render_content(&self, window: &DateWindow, payload: &mut RenderPayload) {
        let records = self.store.load_all();
        let limit = self.settings.hashtag_limit;

        payload.insert(
            slots::CONTENT_CALENDAR,
            SummaryResult::Calendar(content_calendar(records, window, self.filter.anchor())),
        );
        payload.insert(
            slots::HASHTAG_USAGE,
            SummaryResult::Ranking(hashtag_usage(records, window, limit)),
        );
        payload.insert(
            slots::HASHTAG_ENGAGEMENT,
            SummaryResult::Ranking(hashtag_engagement(records, window, limit)),
        );
    }

    fn render_audience(&self, window: &DateWindow, payload: &mut RenderPayload) {
        let events = self.store.audience();
        let in_range = move || events.iter().filter(move |e| window.contains(e.timestamp));

        payload.insert(
            slots::AGE_BREAKDOWN,
            SummaryResult::CategoryBreakdown(percentage_breakdown(count_by(
                in_range(),
                |e: &AudienceEvent| e.age_group,
            ))),
        );
        payload.insert(
            slots::GENDER_BREAKDOWN,
            SummaryResult::CategoryBreakdown(percentage_breakdown(count_by(
                in_range(),
                |e: &AudienceEvent| e.gender,
            ))),
        );
        payload.insert(
            slots::HOURLY_ACTIVITY,
            SummaryResult::HourlyActivity(hourly_activity(events, window)),
        );
    }
}
