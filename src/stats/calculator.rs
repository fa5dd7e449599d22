//! Statistics Calculator Module
//! Box-plot summaries and histogram binning.

use statrs::statistics::Statistics;

/// Whisker reach as a multiple of the inter-quartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus outliers for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl Default for BoxStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
            outliers: Vec::new(),
        }
    }
}

/// One histogram bin, `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the box-plot summary for an array of values.
    pub fn box_stats(values: &[f64]) -> BoxStats {
        let n = values.len();
        if n == 0 {
            return BoxStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        let std = if n > 1 { values.iter().std_dev() } else { 0.0 };

        BoxStats {
            count: n,
            mean: values.iter().mean(),
            std,
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Bin values with Sturges' rule, rounded to a "nice" bin width.
    pub fn histogram_bins(values: &[f64]) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Vec::new();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let single_bin = || {
            vec![HistogramBin {
                start: min - 0.5,
                end: max + 0.5,
                count: finite.len(),
            }]
        };
        if max == min {
            return single_bin();
        }

        let target = (finite.len() as f64).log2().ceil() as usize + 1;
        let width = Self::nice_step(max - min, target.max(1));
        // Subnormal ranges underflow to a zero width.
        if !(width > 0.0 && width.is_finite()) {
            return single_bin();
        }
        let start = (min / width).floor() * width;
        let n_bins = ((max - start) / width).floor() as usize + 1;

        let mut bins: Vec<HistogramBin> = (0..n_bins)
            .map(|i| HistogramBin {
                start: start + i as f64 * width,
                end: start + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for v in finite {
            let idx = (((v - start) / width).floor() as usize).min(n_bins - 1);
            bins[idx].count += 1;
        }

        bins
    }

    /// Round `range / target_steps` up to 1, 2 or 5 times a power of ten.
    pub fn nice_step(range: f64, target_steps: usize) -> f64 {
        let raw_step = range / target_steps as f64;
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        nice * magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_stats_flag_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = StatsCalculator::box_stats(&values);

        assert_eq!(stats.count, 9);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 8.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn box_stats_single_value() {
        let stats = StatsCalculator::box_stats(&[42.0]);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.whisker_low, 42.0);
        assert_eq!(stats.whisker_high, 42.0);
        assert_eq!(stats.std, 0.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn histogram_covers_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.8).collect();
        let bins = StatsCalculator::histogram_bins(&values);

        assert!(!bins.is_empty());
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert!(bins[0].start <= 0.0);
        assert!(bins.last().unwrap().end > 79.2);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn histogram_constant_column_is_one_bin() {
        let bins = StatsCalculator::histogram_bins(&[3.0, 3.0, 3.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center(), 3.0);
    }

    #[test]
    fn histogram_subnormal_range_is_one_bin() {
        let tiny = f64::from_bits(1);
        let bins = StatsCalculator::histogram_bins(&[0.0, tiny, 0.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(bins[0].start < 0.0 && bins[0].end > tiny);
    }

    #[test]
    fn nice_step_rounds_up() {
        assert_eq!(StatsCalculator::nice_step(100.0, 10), 10.0);
        assert_eq!(StatsCalculator::nice_step(80.0, 8), 10.0);
        assert_eq!(StatsCalculator::nice_step(30.0, 10), 5.0);
    }
}
