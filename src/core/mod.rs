//! Core overall-mappability computation
//!
//! This module contains the typed region records, the interval store,
//! the aggregation algorithm and the per-target pipeline.

pub mod aggregate;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod region;
pub mod store;

pub use aggregate::{
    clip_span, AccumulationMode, AggregationResult, MappabilityAggregator, OverlapSpan,
};
pub use error::{
    AggregationError, CohortError, CohortResult, MappabilityResult, ParseError, ParseResult,
    Result, TargetMappabilityError,
};
pub use io::{detect_compression, open_text, CompressionFormat};
pub use pipeline::{
    LogObserver, NoopObserver, PipelineConfig, PipelineOutput, PipelineStats, ProgressObserver,
    TargetMappability, TargetMappabilityPipeline,
};
pub use region::{GenomicRegion, ScoredInterval};
pub use store::IntervalStore;
