//! Error types for target-mappability
//!
//! Per-row errors (`AggregationError`) are attached to output rows and never
//! abort a run. Parse, cohort and I/O errors are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for target-mappability operations
#[derive(Debug, Error)]
pub enum TargetMappabilityError {
    /// Input file parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Cohort statistics errors
    #[error("Cohort error: {0}")]
    Cohort(#[from] CohortError),

    /// Aggregation errors surfaced outside the pipeline (single-region API)
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Thread pool construction failed
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors computing the mappability of a single region
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// Region with end before start
    #[error("Invalid region {chrom}:{start}-{end}: end is before start")]
    InvalidRegion { chrom: String, start: u64, end: u64 },

    /// Region shorter than the k-mer trim
    #[error("Region {chrom}:{start}-{end} is shorter than k-mer length {k}")]
    KmerTrim {
        chrom: String,
        start: u64,
        end: u64,
        k: u64,
    },

    /// No overlapping mappability data (or zero total overlap length)
    #[error("No mappability data for region {chrom}:{start}-{end}")]
    NoCoverage { chrom: String, start: u64, end: u64 },

    /// Overlap length sum no longer fits the integer accumulator
    #[error("Overlap length sum overflows for region {chrom}:{start}-{end}")]
    AccumulatorOverflow { chrom: String, start: u64, end: u64 },
}

impl AggregationError {
    /// Short reason tag used in failed-row reports
    pub fn reason(&self) -> &'static str {
        match self {
            AggregationError::InvalidRegion { .. } | AggregationError::KmerTrim { .. } => {
                "InvalidRegion"
            }
            AggregationError::NoCoverage { .. } => "NoCoverage",
            AggregationError::AccumulatorOverflow { .. } => "Overflow",
        }
    }

    /// Whether this is a validation failure (bad coordinates or k-mer trim)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AggregationError::InvalidRegion { .. } | AggregationError::KmerTrim { .. }
        )
    }
}

/// Errors that can occur while parsing input tables
#[derive(Debug, Error)]
pub enum ParseError {
    /// Too few tab-separated fields
    #[error("Too few fields at line {line}: expected at least {expected}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Failed to parse a number
    #[error("Invalid {field} '{value}' at line {line}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Track interval with end before start
    #[error("Invalid interval at line {line}: end ({end}) is before start ({start})")]
    InvalidInterval { line: usize, start: u64, end: u64 },

    /// Required header column missing
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// File without any data lines where a header is required
    #[error("Empty input: {0}")]
    EmptyInput(PathBuf),

    /// Unreadable binary track
    #[error("Invalid track {path}: {message}")]
    InvalidTrack { path: PathBuf, message: String },

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors building the cohort statistics table
#[derive(Debug, Error)]
pub enum CohortError {
    /// Glob patterns matched nothing
    #[error("No coverage files matched '{0}'")]
    NoFiles(String),

    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Unreadable glob match
    #[error("Glob error: {0}")]
    Glob(String),

    /// Invalid sample ID regex
    #[error("Invalid sample ID pattern: {0}")]
    SampleRegex(#[from] regex::Error),

    /// A sample lacks a target present in the first sample
    #[error("Sample {sample} has no row for target {target}")]
    TargetMismatch { sample: String, target: String },
}

impl From<glob::GlobError> for CohortError {
    fn from(error: glob::GlobError) -> Self {
        CohortError::Glob(error.to_string())
    }
}

/// Result type alias for target-mappability operations
pub type Result<T> = std::result::Result<T, TargetMappabilityError>;

/// Result type alias for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for aggregation operations
pub type MappabilityResult<T> = std::result::Result<T, AggregationError>;

/// Result type alias for cohort operations
pub type CohortResult<T> = std::result::Result<T, CohortError>;
