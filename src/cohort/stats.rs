//! Cohort outlier statistics
//!
//! Per-sample IQR fences, per-target outlier percentages and the
//! MAD/median dispersion of library-size normalised read counts.

use crate::cohort::matrix::ReadCountMatrix;
use crate::core::GenomicRegion;

/// Quantile of sorted values with linear interpolation (`pos = (n-1)*q`)
///
/// # Examples
/// ```
/// use target_mappability::cohort::stats::quantile;
/// assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.25), Some(1.75));
/// ```
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(&sorted_copy(values), 0.5)
}

/// Median absolute deviation from the median
pub fn mad(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// `MAD / median * 100`, rounded to 2 decimals; `None` for a zero median
pub fn mad_over_median(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    if center == 0.0 {
        return None;
    }
    Some(round2(mad(values)? / center * 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

/// IQR fences of one sample's read counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleThresholds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub upper_fence: f64,
    pub lower_fence: f64,
}

impl SampleThresholds {
    pub fn from_counts(counts: &[f64], multiplier: f64) -> Option<Self> {
        let sorted = sorted_copy(counts);
        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            upper_fence: q3 + multiplier * iqr,
            lower_fence: q1 - multiplier * iqr,
        })
    }
}

/// Count and share of targets below one minimum-read threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BelowThreshold {
    pub min_reads: u32,
    pub count: usize,
    pub percent: f64,
}

/// Per-sample outlier summary
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub sample: String,
    pub thresholds: SampleThresholds,
    pub n_outliers_iqr: usize,
    pub pct_outliers_iqr: f64,
    pub below: Vec<BelowThreshold>,
}

/// Per-target cohort statistics (percentages of samples)
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStats {
    pub above_iqr_pct: f64,
    /// One entry per minimum-read threshold, in threshold order
    pub below_pct: Vec<f64>,
    /// `None` when the median normalised count is zero
    pub mad_median_pct: Option<f64>,
}

/// Statistics for the whole cohort
#[derive(Debug, Clone, PartialEq)]
pub struct CohortStats {
    pub targets: Vec<GenomicRegion>,
    pub min_reads: Vec<u32>,
    pub iqr_multiplier: f64,
    pub per_target: Vec<TargetStats>,
    pub samples: Vec<SampleSummary>,
}

impl CohortStats {
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Stats of a target by coordinates
    pub fn get(&self, target: &GenomicRegion) -> Option<&TargetStats> {
        self.targets
            .iter()
            .position(|t| t == target)
            .map(|i| &self.per_target[i])
    }
}

/// Scale every sample to the cohort mean library size
pub fn normalise_library_sizes(matrix: &ReadCountMatrix) -> Vec<Vec<f64>> {
    let library_sizes: Vec<f64> = matrix
        .columns()
        .iter()
        .map(|c| c.iter().sum::<f64>())
        .collect();
    if library_sizes.is_empty() {
        return Vec::new();
    }
    let mean_size = library_sizes.iter().sum::<f64>() / library_sizes.len() as f64;

    matrix
        .columns()
        .iter()
        .zip(&library_sizes)
        .map(|(column, &size)| {
            if size == 0.0 {
                column.clone()
            } else {
                column.iter().map(|v| v * mean_size / size).collect()
            }
        })
        .collect()
}

/// Compute every cohort statistic from a read-count matrix
pub fn compute_cohort_stats(
    matrix: &ReadCountMatrix,
    min_reads: &[u32],
    iqr_multiplier: f64,
) -> CohortStats {
    let n_targets = matrix.n_targets();
    let n_samples = matrix.n_samples();

    let thresholds: Vec<Option<SampleThresholds>> = matrix
        .columns()
        .iter()
        .map(|c| SampleThresholds::from_counts(c, iqr_multiplier))
        .collect();

    let is_above = |sample: usize, value: f64| {
        thresholds[sample].is_some_and(|t| value > t.upper_fence)
    };

    let samples = matrix
        .samples()
        .iter()
        .enumerate()
        .filter_map(|(s, sample)| {
            let column = matrix.column(s);
            let n_outliers = column.iter().filter(|&&v| is_above(s, v)).count();
            let below = min_reads
                .iter()
                .map(|&min| {
                    let count = column.iter().filter(|&&v| v < min as f64).count();
                    BelowThreshold {
                        min_reads: min,
                        count,
                        percent: percent(count, n_targets),
                    }
                })
                .collect();
            Some(SampleSummary {
                sample: sample.clone(),
                thresholds: thresholds[s]?,
                n_outliers_iqr: n_outliers,
                pct_outliers_iqr: percent(n_outliers, n_targets),
                below,
            })
        })
        .collect();

    let normalised = normalise_library_sizes(matrix);
    let per_target = (0..n_targets)
        .map(|t| {
            let row = matrix.row(t);
            let above = row
                .iter()
                .enumerate()
                .filter(|&(s, &v)| is_above(s, v))
                .count();
            let below_pct = min_reads
                .iter()
                .map(|&min| percent(row.iter().filter(|&&v| v < min as f64).count(), n_samples))
                .collect();
            let normalised_row: Vec<f64> = normalised.iter().map(|c| c[t]).collect();
            TargetStats {
                above_iqr_pct: percent(above, n_samples),
                below_pct,
                mad_median_pct: mad_over_median(&normalised_row),
            }
        })
        .collect();

    CohortStats {
        targets: matrix.targets().to_vec(),
        min_reads: min_reads.to_vec(),
        iqr_multiplier,
        per_target,
        samples,
    }
}
