//! Cohort coverage statistics
//!
//! Builds the per-target outlier table from a cohort of amplicon coverage
//! files: discovery, read-count matrix, per-sample IQR fences, minimum-read
//! percentages and MAD/median dispersion.

pub mod discovery;
pub mod matrix;
pub mod stats;
pub mod table;

pub use discovery::{discover_samples, SampleFile, SampleIdExtractor, DEFAULT_SAMPLE_PATTERN};
pub use matrix::{load_matrix, ReadCountMatrix};
pub use stats::{compute_cohort_stats, CohortStats, SampleSummary, TargetStats};
pub use table::{
    load_mappability_table, write_sample_summary, write_target_stats, MappabilityRow,
};

use crate::core::error::Result;
use crate::formats::coverage::TOTAL_READS_COLUMN;

/// Default minimum-read thresholds
pub const DEFAULT_MIN_READS: [u32; 3] = [20, 10, 5];

/// Cohort statistics settings
#[derive(Debug, Clone)]
pub struct CohortConfig {
    /// Regex extracting sample IDs from file names
    pub sample_pattern: String,
    /// Read count column of the coverage tables
    pub column: String,
    pub min_reads: Vec<u32>,
    /// IQR multiplier for the outlier fences
    pub iqr_multiplier: f64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            sample_pattern: DEFAULT_SAMPLE_PATTERN.to_string(),
            column: TOTAL_READS_COLUMN.to_string(),
            min_reads: DEFAULT_MIN_READS.to_vec(),
            iqr_multiplier: 1.5,
        }
    }
}

/// Discover, load and summarise a cohort
///
/// `patterns` holds one or more newline-separated glob patterns.
pub fn build_cohort_stats(patterns: &str, config: &CohortConfig) -> Result<CohortStats> {
    let extractor = SampleIdExtractor::new(&config.sample_pattern)?;
    let samples = discover_samples(patterns, &extractor)?;
    log::info!("Found {} samples", samples.len());

    let matrix = load_matrix(&samples, &config.column)?;
    Ok(compute_cohort_stats(
        &matrix,
        &config.min_reads,
        config.iqr_multiplier,
    ))
}
