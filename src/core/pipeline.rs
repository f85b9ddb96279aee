//! Per-target overall mappability pipeline
//!
//! For every target the query region is trimmed by `k - 1` at the end, the
//! store is queried and the overlaps aggregated. A target that fails
//! (invalid coordinates, no coverage) yields a failed row; the batch always
//! runs to completion.

use crate::core::aggregate::{AccumulationMode, MappabilityAggregator};
use crate::core::error::{AggregationError, MappabilityResult, Result, TargetMappabilityError};
use crate::core::region::GenomicRegion;
use crate::core::store::IntervalStore;
use rayon::prelude::*;

/// Pipeline settings
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// k-mer length the mappability track was computed with
    pub k: u64,
    pub mode: AccumulationMode,
    /// Worker threads (1 = sequential)
    pub threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            k: 1,
            mode: AccumulationMode::Improved,
            threads: 1,
        }
    }
}

/// Hook for progress reporting around each target
pub trait ProgressObserver: Sync {
    /// Called before a target is aggregated
    fn on_target(&self, _index: usize, _target: &GenomicRegion) {}

    /// Called when a target fails
    fn on_failure(&self, _index: usize, _target: &GenomicRegion, _error: &AggregationError) {}
}

/// Observer that reports nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Observer that reports through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_target(&self, _index: usize, target: &GenomicRegion) {
        log::debug!("Computing overall mappability for {}", target);
    }

    fn on_failure(&self, index: usize, target: &GenomicRegion, error: &AggregationError) {
        log::warn!("Target #{} ({}): {}", index + 1, target, error);
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMappability {
    /// Target as read from the input
    pub target: GenomicRegion,
    /// Region the store was queried with, if the trim succeeded
    pub query: Option<GenomicRegion>,
    pub outcome: MappabilityResult<f64>,
}

impl TargetMappability {
    pub fn value(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// Failed validation (end < start or shorter than k)
    pub invalid: usize,
    /// No overlapping mappability data
    pub no_coverage: usize,
    /// Legacy length sum overflowed
    pub overflow: usize,
}

impl PipelineStats {
    fn from_rows(rows: &[TargetMappability]) -> Self {
        let mut stats = PipelineStats {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match &row.outcome {
                Ok(_) => stats.success += 1,
                Err(e) => {
                    stats.failed += 1;
                    match e {
                        AggregationError::NoCoverage { .. } => stats.no_coverage += 1,
                        AggregationError::AccumulatorOverflow { .. } => stats.overflow += 1,
                        _ => stats.invalid += 1,
                    }
                }
            }
        }
        stats
    }
}

/// Pipeline result: rows in input order plus statistics
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub rows: Vec<TargetMappability>,
    pub stats: PipelineStats,
}

/// Computes the overall mappability of a batch of targets against one store
pub struct TargetMappabilityPipeline<'a> {
    store: &'a IntervalStore,
    aggregator: MappabilityAggregator,
    config: PipelineConfig,
}

impl<'a> TargetMappabilityPipeline<'a> {
    pub fn new(store: &'a IntervalStore, config: PipelineConfig) -> Self {
        Self {
            store,
            aggregator: MappabilityAggregator::new(config.mode),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Overall mappability of a single target
    pub fn compute(&self, target: &GenomicRegion) -> TargetMappability {
        match target.kmer_trimmed(self.config.k) {
            Ok(query) => {
                let overlaps = self.store.query(&query);
                let outcome = self.aggregator.aggregate(&query, &overlaps);
                TargetMappability {
                    target: target.clone(),
                    query: Some(query),
                    outcome,
                }
            }
            Err(e) => TargetMappability {
                target: target.clone(),
                query: None,
                outcome: Err(e),
            },
        }
    }

    fn compute_observed(
        &self,
        index: usize,
        target: &GenomicRegion,
        observer: &dyn ProgressObserver,
    ) -> TargetMappability {
        observer.on_target(index, target);
        let row = self.compute(target);
        if let Err(e) = &row.outcome {
            observer.on_failure(index, target, e);
        }
        row
    }

    /// Run over all targets without progress reporting
    pub fn run(&self, targets: &[GenomicRegion]) -> Result<PipelineOutput> {
        self.run_with_observer(targets, &NoopObserver)
    }

    /// Run over all targets, reporting to `observer`
    ///
    /// Rows come back in input order for any thread count.
    pub fn run_with_observer(
        &self,
        targets: &[GenomicRegion],
        observer: &dyn ProgressObserver,
    ) -> Result<PipelineOutput> {
        let rows = if self.config.threads > 1 {
            self.run_parallel(targets, observer)?
        } else {
            targets
                .iter()
                .enumerate()
                .map(|(i, target)| self.compute_observed(i, target, observer))
                .collect::<Vec<_>>()
        };

        let stats = PipelineStats::from_rows(&rows);
        Ok(PipelineOutput { rows, stats })
    }

    fn run_parallel(
        &self,
        targets: &[GenomicRegion],
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<TargetMappability>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| TargetMappabilityError::ThreadPool(e.to_string()))?;

        // Indexed collect keeps input order
        Ok(pool.install(|| {
            targets
                .par_iter()
                .enumerate()
                .map(|(i, target)| self.compute_observed(i, target, observer))
                .collect()
        }))
    }
}
