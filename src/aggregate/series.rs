use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::{AudienceEvent, MetricRecord};

use super::in_window;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// How values falling into the same bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
}

/// A single day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub day: NaiveDate,
    pub value: f64,
}

/// A single hour-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourPoint {
    pub hour: u8,
    pub value: f64,
}

/// Buckets in-window records by UTC calendar day.
///
/// Every day from the window's first to last day appears exactly once, in
/// ascending order. Days without records are reported as `0`.
pub fn time_series_by_day<F>(
    records: &[MetricRecord],
    window: &DateWindow,
    selector: F,
    reduction: Reduction,
) -> Vec<SeriesPoint>
where
    F: Fn(&MetricRecord) -> f64,
{
    let first_day = window.start().date_naive();
    let mut buckets: Vec<(NaiveDate, f64, u32)> =
        window.days().map(|day| (day, 0.0, 0)).collect();

    for record in in_window(records, window) {
        let offset = (record.timestamp.date_naive() - first_day).num_days();
        let Ok(idx) = usize::try_from(offset) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(idx) {
            bucket.1 += selector(record);
            bucket.2 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(day, sum, count)| SeriesPoint {
            day,
            value: reduce(sum, count, reduction),
        })
        .collect()
}

/// Counts in-window audience events per UTC hour of day. All 24 hours are
/// always present.
pub fn hourly_activity(events: &[AudienceEvent], window: &DateWindow) -> Vec<HourPoint> {
    let mut counts = [0u32; HOURS_PER_DAY];
    for event in events.iter().filter(|e| window.contains(e.timestamp)) {
        if let Some(slot) = counts.get_mut(event.timestamp.hour() as usize) {
            *slot += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourPoint {
            hour: hour as u8,
            value: f64::from(count),
        })
        .collect()
}

fn reduce(sum: f64, count: u32, reduction: Reduction) -> f64 {
    match reduction {
        Reduction::Sum => sum,
        Reduction::Mean if count == 0 => 0.0,
        Reduction::Mean => sum / f64::from(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AgeGroup, ContentKind, Gender};
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::BTreeSet;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn post(id: &str, ts: DateTime<Utc>, kind: ContentKind, score: f64) -> MetricRecord {
        MetricRecord {
            id: id.to_string(),
            timestamp: ts,
            kind,
            likes: 0,
            comments: 0,
            engagement_score: score,
            hashtags: BTreeSet::new(),
        }
    }

    fn sample() -> Vec<MetricRecord> {
        vec![
            post("a", at(1, 9), ContentKind::Image, 10.0),
            post("b", at(1, 17), ContentKind::Video, 20.0),
            post("c", at(3, 8), ContentKind::Image, 5.0),
        ]
    }

    #[test]
    fn test_mean_engagement_fills_gaps() {
        let window = DateWindow::from_days(day(1), day(3)).expect("valid");
        let series = time_series_by_day(&sample(), &window, |r| r.engagement_score, Reduction::Mean);

        assert_eq!(
            series,
            vec![
                SeriesPoint {
                    day: day(1),
                    value: 15.0
                },
                SeriesPoint {
                    day: day(2),
                    value: 0.0
                },
                SeriesPoint {
                    day: day(3),
                    value: 5.0
                },
            ]
        );
    }

    #[test]
    fn test_sum_reduction() {
        let window = DateWindow::from_days(day(1), day(3)).expect("valid");
        let series = time_series_by_day(&sample(), &window, |r| r.engagement_score, Reduction::Sum);
        assert_eq!(series[0].value, 30.0);
        assert_eq!(series[2].value, 5.0);
    }

    #[test]
    fn test_series_covers_every_window_day_once() {
        let window = DateWindow::new(at(2, 13), at(9, 1)).expect("valid");
        let series = time_series_by_day(&sample(), &window, |r| r.engagement_score, Reduction::Mean);

        let days: Vec<NaiveDate> = series.iter().map(|p| p.day).collect();
        let expected: Vec<NaiveDate> = (2..=9).map(day).collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn test_series_ignores_records_outside_window() {
        let window = DateWindow::new(at(1, 12), at(3, 23)).expect("valid");
        let series = time_series_by_day(&sample(), &window, |r| r.engagement_score, Reduction::Mean);
        // The 09:00 record on day 1 is before the window start.
        assert_eq!(series[0].value, 20.0);
    }

    #[test]
    fn test_series_empty_input_is_all_zero() {
        let window = DateWindow::from_days(day(1), day(5)).expect("valid");
        let series = time_series_by_day(&[], &window, |r| r.engagement_score, Reduction::Mean);
        assert_eq!(series.len(), 5);
        assert!(series.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_hourly_activity_has_all_hours() {
        let events = vec![
            AudienceEvent {
                timestamp: at(1, 18),
                age_group: AgeGroup::From18To24,
                gender: Gender::Female,
            },
            AudienceEvent {
                timestamp: at(2, 18),
                age_group: AgeGroup::From25To34,
                gender: Gender::Male,
            },
            AudienceEvent {
                timestamp: at(2, 7),
                age_group: AgeGroup::Over55,
                gender: Gender::Other,
            },
            AudienceEvent {
                timestamp: at(20, 7),
                age_group: AgeGroup::Over55,
                gender: Gender::Other,
            },
        ];
        let window = DateWindow::from_days(day(1), day(3)).expect("valid");
        let profile = hourly_activity(&events, &window);

        assert_eq!(profile.len(), HOURS_PER_DAY);
        assert_eq!(profile[18].value, 2.0);
        assert_eq!(profile[7].value, 1.0);
        assert_eq!(profile[0].value, 0.0);
        assert!(profile.iter().enumerate().all(|(i, p)| p.hour as usize == i));
    }
}
