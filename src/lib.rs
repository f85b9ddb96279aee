//! target-mappability - per-target overall mappability and cohort coverage statistics
//!
//! Aggregates a genome-wide mappability track (bedGraph or BigWig) over a set
//! of target regions, producing one length-weighted mappability value per
//! target, and builds a per-target coverage outlier table across a cohort of
//! amplicon coverage files.
//!
//! # Features
//!
//! - Explicit overlap classification (containment, left/right overlap)
//! - Per-row failure isolation: one bad target never aborts a run
//! - Parallel processing with rayon, output in input order
//! - Support for compressed inputs (gzip, bzip2) and BigWig tracks
//!
//! # Example
//!
//! ```
//! use target_mappability::{GenomicRegion, MappabilityAggregator, ScoredInterval};
//!
//! let region = GenomicRegion::new("chr1", 100, 200);
//! let overlaps = vec![
//!     ScoredInterval::new("chr1", 100, 150, 0.8),
//!     ScoredInterval::new("chr1", 150, 200, 0.4),
//! ];
//! let value = MappabilityAggregator::default()
//!     .aggregate(&region, &overlaps)
//!     .unwrap();
//! assert!((value - 0.6).abs() < 1e-12);
//! ```

pub mod cohort;
pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    AccumulationMode, AggregationError, CohortError, GenomicRegion, IntervalStore,
    MappabilityAggregator, ParseError, PipelineConfig, PipelineOutput, PipelineStats,
    ScoredInterval, TargetMappability, TargetMappabilityError, TargetMappabilityPipeline,
};
pub use formats::{bed, bedgraph, coverage, output};
