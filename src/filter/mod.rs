use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::record::MetricRecord;

/// Returned when a window update would end before it starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid date range: start {start} is after end {end}")]
pub struct InvalidRangeError {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Inclusive `[start, end]` time window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Creates a window, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidRangeError> {
        if start > end {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering whole UTC days, from `start_day` 00:00 through the
    /// last nanosecond of `end_day`.
    pub fn from_days(start_day: NaiveDate, end_day: NaiveDate) -> Result<Self, InvalidRangeError> {
        let start = Utc.from_utc_datetime(&start_day.and_time(NaiveTime::MIN));
        let last = end_day
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
            .unwrap_or(NaiveDateTime::MAX);
        Self::new(start, Utc.from_utc_datetime(&last))
    }

    /// Window of `lookback` ending at `now`. The start saturates at the
    /// earliest representable instant and never passes `now`.
    pub fn trailing(now: DateTime<Utc>, lookback: Duration) -> Self {
        let start = now
            .checked_sub_signed(lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .min(now);
        Self { start, end: now }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// UTC calendar days touched by the window, first and last inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(move |day| *day <= last)
    }

    /// Splits the window at its midpoint into two disjoint halves inside the
    /// window. `None` when the window is too short to split.
    pub fn halves(&self) -> Option<(Self, Self)> {
        let mid = self.start + (self.end - self.start) / 2;
        if mid <= self.start {
            return None;
        }
        Some((
            Self {
                start: self.start,
                end: mid - Duration::nanoseconds(1),
            },
            Self {
                start: mid,
                end: self.end,
            },
        ))
    }
}

/// Owns the active [`DateWindow`] and validates updates to it.
///
/// The window lives behind an `Arc` and is swapped wholesale on every
/// update, so a reader holding a captured window never sees it change.
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    window: Arc<DateWindow>,
    lookback: Duration,
    anchor: DateTime<Utc>,
}

impl DateRangeFilter {
    /// Initializes the window to `[now - lookback, now]`. `now` is frozen
    /// until [`DateRangeFilter::refresh`] is called.
    pub fn new(now: DateTime<Utc>, lookback: Duration) -> Self {
        let window = DateWindow::trailing(now, lookback);
        debug!(start = %window.start, end = %window.end, "initialized date window");
        Self {
            window: Arc::new(window),
            lookback,
            anchor: now,
        }
    }

    /// Replaces the window. On error the previous window is kept.
    pub fn set_window(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), InvalidRangeError> {
        let window = DateWindow::new(start, end)?;
        if *self.window != window {
            info!(%start, %end, "date window updated");
            self.window = Arc::new(window);
        }
        Ok(())
    }

    /// Re-anchors the default trailing window at a new `now`.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let window = DateWindow::trailing(now, self.lookback);
        info!(start = %window.start, end = %window.end, "date window refreshed");
        self.window = Arc::new(window);
        self.anchor = now;
    }

    /// The frozen "now" the default window was last anchored at.
    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    /// Returns the current window.
    pub fn current_window(&self) -> Arc<DateWindow> {
        Arc::clone(&self.window)
    }

    /// Whether the record's timestamp falls inside the current window.
    pub fn matches(&self, record: &MetricRecord) -> bool {
        self.window.contains(record.timestamp)
    }
}
