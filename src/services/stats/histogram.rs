use super::describe::percentile;
use super::types::{HistogramBin, HistogramData, Quartiles};

fn empty_histogram() -> HistogramData {
    HistogramData {
        bins: Vec::new(),
        mean: 0.0,
        median: 0.0,
        min: 0.0,
        max: 0.0,
    }
}

/// Equal-width binning of a numeric sample. Mean and median come from the
/// full sample, independent of how the bins fall.
///
/// When every value is equal there is exactly one `[v, v]` bin; otherwise the
/// last bin's upper bound is pinned to the exact max (and includes it) so
/// float rounding cannot leak the max out of the histogram.
pub fn histogram(values: &[f64], bin_count: usize) -> HistogramData {
    if values.is_empty() {
        return empty_histogram();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let median = percentile(&sorted, 50.0);

    if min == max {
        return HistogramData {
            bins: vec![HistogramBin {
                bin_start: min,
                bin_end: max,
                count: values.len(),
                label: format!("{:.1} - {:.1}", min, max),
            }],
            mean,
            median,
            min,
            max,
        };
    }

    let bin_count = bin_count.max(1);
    let bin_width = (max - min) / bin_count as f64;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| {
            let bin_start = min + i as f64 * bin_width;
            let bin_end = if i == bin_count - 1 {
                max
            } else {
                min + (i + 1) as f64 * bin_width
            };
            HistogramBin {
                bin_start,
                bin_end,
                count: 0,
                label: format!("{:.1} - {:.1}", bin_start, bin_end),
            }
        })
        .collect();

    for &value in values {
        let idx = (((value - min) / bin_width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    HistogramData {
        bins,
        mean,
        median,
        min,
        max,
    }
}

/// Box-plot statistics with Tukey fences at 1.5 IQR. The returned min/max are
/// the whisker bounds (nearest sample values inside the fences), not the
/// sample extremes; everything strictly outside lands in `outliers`.
///
/// Quartiles are computed in two passes: a first pass over the full sample
/// flags gross outliers, then the quartiles and fences are rebuilt from the
/// trimmed sample so extreme values cannot drag the box itself. For an
/// outlier-free sample both passes are identical.
pub fn quartiles(values: &[f64]) -> Quartiles {
    if values.is_empty() {
        return Quartiles {
            min: 0.0,
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
            max: 0.0,
            iqr: 0.0,
            outliers: Vec::new(),
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1_raw = percentile(&sorted, 25.0);
    let q3_raw = percentile(&sorted, 75.0);
    let iqr_raw = q3_raw - q1_raw;
    let lower_raw = q1_raw - 1.5 * iqr_raw;
    let upper_raw = q3_raw + 1.5 * iqr_raw;

    let trimmed: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lower_raw && *v <= upper_raw)
        .collect();
    // The first-pass fences always bracket the interpolated quartiles, so the
    // trimmed sample stays non-empty; the fallback keeps that a local fact.
    let base: &[f64] = if trimmed.is_empty() { &sorted } else { &trimmed };

    let q1 = percentile(base, 25.0);
    let median = percentile(base, 50.0);
    let q3 = percentile(base, 75.0);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let whisker_min = sorted
        .iter()
        .copied()
        .find(|v| *v >= lower_fence)
        .unwrap_or(q1);
    let whisker_max = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= upper_fence)
        .unwrap_or(q3);
    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Quartiles {
        min: whisker_min,
        q1,
        median,
        q3,
        max: whisker_max,
        iqr,
        outliers,
    }
}
