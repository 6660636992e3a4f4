use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while binning values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramError {
    #[error("histogram over zero values is undefined")]
    EmptyInput,

    #[error("histogram bin count must be positive")]
    ZeroBins,
}

/// One equal-width bin. The last bin's upper bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Bins `values` into `bin_count` equal-width bins spanning `[min, max]`.
///
/// If every value is equal the result is a single bin holding all of them.
/// Non-finite values are skipped; if nothing finite remains the input is
/// treated as empty.
pub fn histogram(values: &[f64], bin_count: usize) -> Result<Vec<HistogramBin>, HistogramError> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite()).peekable();
    let Some(&first) = finite.peek() else {
        return Err(HistogramError::EmptyInput);
    };
    if bin_count == 0 {
        return Err(HistogramError::ZeroBins);
    }

    let (min, max, total) = finite.fold((first, first, 0u32), |(lo, hi, n), v| {
        (lo.min(v), hi.max(v), n + 1)
    });

    if min == max {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: total,
        }]);
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bin_count {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values.iter().copied().filter(|v| v.is_finite()) {
        let idx = bin_index(value, min, width, bin_count);
        if let Some(bin) = bins.get_mut(idx) {
            bin.count += 1;
        }
    }

    Ok(bins)
}

/// Returns the bin index for `value`. The maximum lands in the last bin.
fn bin_index(value: f64, min: f64, width: f64, bin_count: usize) -> usize {
    let raw = ((value - min) / width).floor();
    if raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(bin_count - 1)
}
