use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::filter::DateWindow;
use crate::record::MetricRecord;

use super::in_window;

/// Share of the total held by one label, in whole percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub percent: u32,
}

/// Aggregate metric for one observed category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: f64,
    /// Records that contributed to `value`.
    pub count: u32,
}

/// Mean of `metric` per category of in-window records.
///
/// Only categories with at least one record appear; output is ordered by the
/// category's `Ord`.
pub fn by_category<K, C, M>(
    records: &[MetricRecord],
    window: &DateWindow,
    category: C,
    metric: M,
) -> Vec<CategoryValue>
where
    K: Ord + Display,
    C: Fn(&MetricRecord) -> K,
    M: Fn(&MetricRecord) -> f64,
{
    let mut groups: BTreeMap<K, (f64, u32)> = BTreeMap::new();
    for record in in_window(records, window) {
        let entry = groups.entry(category(record)).or_insert((0.0, 0));
        entry.0 += metric(record);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| CategoryValue {
            label: key.to_string(),
            value: sum / f64::from(count),
            count,
        })
        .collect()
}

/// Counts items per key, ordered by the key's `Ord`. Keys never observed are
/// absent.
pub fn count_by<'a, T, K, I, F>(items: I, key: F) -> Vec<(String, u64)>
where
    T: 'a,
    K: Ord + Display,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> K,
{
    let mut counts: BTreeMap<K, u64> = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(k, count)| (k.to_string(), count))
        .collect()
}

/// Converts raw counts to whole percentages using largest-remainder rounding.
///
/// Each label first gets the floor of its exact share; the points still
/// missing from 100 go one each to the labels with the largest remainders,
/// earlier labels first on ties. The result sums to exactly 100 whenever the
/// total count is positive, and is empty otherwise. Output keeps input order.
pub fn percentage_breakdown<I, L>(counts: I) -> Vec<BreakdownEntry>
where
    I: IntoIterator<Item = (L, u64)>,
    L: Into<String>,
{
    let counts: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(label, count)| (label.into(), count))
        .collect();
    let total: u128 = counts.iter().map(|(_, c)| u128::from(*c)).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<(u32, u128)> = counts
        .iter()
        .map(|(_, count)| {
            let scaled = u128::from(*count) * 100;
            ((scaled / total) as u32, scaled % total)
        })
        .collect();

    let assigned: u32 = shares.iter().map(|(floor, _)| floor).sum();
    let leftover = 100u32.saturating_sub(assigned) as usize;

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| shares[b].1.cmp(&shares[a].1));
    for idx in order.into_iter().take(leftover) {
        shares[idx].0 += 1;
    }

    counts
        .into_iter()
        .zip(shares)
        .map(|((label, _), (percent, _))| BreakdownEntry { label, percent })
        .collect()
}
