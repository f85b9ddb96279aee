//! Read-count matrix across samples
//!
//! Rows are targets in the order of the first sample's coverage table;
//! columns are samples in discovery order.

use crate::cohort::discovery::SampleFile;
use crate::core::error::{CohortError, CohortResult, Result};
use crate::core::GenomicRegion;
use crate::formats::coverage::{load_coverage, CoverageRecord};
use rayon::prelude::*;
use std::collections::HashMap;

/// Targets x samples read counts, stored column-major
#[derive(Debug, Clone, PartialEq)]
pub struct ReadCountMatrix {
    targets: Vec<GenomicRegion>,
    samples: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ReadCountMatrix {
    /// Build from per-sample coverage records
    ///
    /// The first sample defines the targets and their order. Every other
    /// sample must carry a row for each of those targets.
    pub fn from_samples(samples: Vec<(String, Vec<CoverageRecord>)>) -> CohortResult<Self> {
        let mut iter = samples.into_iter();
        let Some((first_id, first_records)) = iter.next() else {
            return Ok(Self {
                targets: Vec::new(),
                samples: Vec::new(),
                columns: Vec::new(),
            });
        };

        let targets: Vec<GenomicRegion> =
            first_records.iter().map(|r| r.region.clone()).collect();
        let mut sample_ids = vec![first_id];
        let mut columns = vec![first_records.iter().map(|r| r.total_reads).collect()];

        for (sample_id, records) in iter {
            let by_region: HashMap<&GenomicRegion, f64> = records
                .iter()
                .map(|r| (&r.region, r.total_reads))
                .collect();

            let column = targets
                .iter()
                .map(|target| {
                    by_region
                        .get(target)
                        .copied()
                        .ok_or_else(|| CohortError::TargetMismatch {
                            sample: sample_id.clone(),
                            target: target.to_string(),
                        })
                })
                .collect::<CohortResult<Vec<f64>>>()?;

            sample_ids.push(sample_id);
            columns.push(column);
        }

        Ok(Self {
            targets,
            samples: sample_ids,
            columns,
        })
    }

    pub fn targets(&self) -> &[GenomicRegion] {
        &self.targets
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn n_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Read counts of one sample, in target order
    pub fn column(&self, sample: usize) -> &[f64] {
        &self.columns[sample]
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Read counts of one target across all samples
    pub fn row(&self, target: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[target]).collect()
    }
}

/// Load every sample's coverage table and build the matrix
pub fn load_matrix(samples: &[SampleFile], column: &str) -> Result<ReadCountMatrix> {
    let loaded = samples
        .par_iter()
        .map(|sample| {
            log::info!(
                "Loading sample {}: {}",
                sample.sample_id,
                sample.path.display()
            );
            load_coverage(&sample.path, column).map(|records| (sample.sample_id.clone(), records))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ReadCountMatrix::from_samples(loaded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chrom: &str, start: u64, end: u64, reads: f64) -> CoverageRecord {
        CoverageRecord {
            region: GenomicRegion::new(chrom, start, end),
            total_reads: reads,
        }
    }

    #[test]
    fn test_aligns_by_coordinates() {
        let matrix = ReadCountMatrix::from_samples(vec![
            (
                "s1".to_string(),
                vec![record("chr1", 1, 10, 5.0), record("chr1", 20, 30, 7.0)],
            ),
            (
                "s2".to_string(),
                vec![record("chr1", 20, 30, 70.0), record("chr1", 1, 10, 50.0)],
            ),
        ])
        .unwrap();

        assert_eq!(matrix.n_targets(), 2);
        assert_eq!(matrix.samples(), &["s1".to_string(), "s2".to_string()]);
        assert_eq!(matrix.column(1), &[50.0, 70.0]);
        assert_eq!(matrix.row(0), vec![5.0, 50.0]);
    }

    #[test]
    fn test_missing_target_is_error() {
        let err = ReadCountMatrix::from_samples(vec![
            ("s1".to_string(), vec![record("chr1", 1, 10, 5.0)]),
            ("s2".to_string(), vec![record("chr2", 1, 10, 5.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, CohortError::TargetMismatch { ref sample, .. } if sample == "s2"));
    }

    #[test]
    fn test_empty_cohort() {
        let matrix = ReadCountMatrix::from_samples(Vec::new()).unwrap();
        assert_eq!(matrix.n_samples(), 0);
        assert_eq!(matrix.n_targets(), 0);
    }
}
