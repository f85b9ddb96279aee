//! File format adapters
//!
//! Readers for target BED files, mappability tracks (bedGraph, BigWig) and
//! amplicon coverage tables, plus the TSV output writers.

pub mod bed;
pub mod bedgraph;
#[cfg(feature = "bigwig")]
pub mod bigwig;
pub mod coverage;
pub mod output;

pub use bed::{load_targets, parse_bed_line, read_targets};
pub use bedgraph::{load_bedgraph, read_bedgraph, BedGraphRecordView};
pub use coverage::{load_coverage, CoverageRecord, TOTAL_READS_COLUMN};
pub use output::{format_float, write_failed_rows, write_rows, OutputOptions};

use crate::core::error::ParseResult;
use crate::core::IntervalStore;
use std::path::Path;

/// Mappability track format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackFormat {
    /// Pick by file extension
    #[default]
    Auto,
    BedGraph,
    BigWig,
}

impl TrackFormat {
    /// Resolve `Auto` against a path
    pub fn resolve(self, path: &Path) -> TrackFormat {
        match self {
            TrackFormat::Auto if is_bigwig_path(path) => TrackFormat::BigWig,
            TrackFormat::Auto => TrackFormat::BedGraph,
            other => other,
        }
    }
}

/// Whether a path looks like a BigWig file
pub fn is_bigwig_path(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("bw") | Some("bigwig")
    )
}

/// Load a mappability track into an [`IntervalStore`]
pub fn load_track<P: AsRef<Path>>(path: P, format: TrackFormat) -> ParseResult<IntervalStore> {
    let path = path.as_ref();
    match format.resolve(path) {
        TrackFormat::BigWig => load_bigwig_track(path),
        _ => load_bedgraph(path),
    }
}

#[cfg(feature = "bigwig")]
fn load_bigwig_track(path: &Path) -> ParseResult<IntervalStore> {
    bigwig::load_bigwig(path)
}

#[cfg(not(feature = "bigwig"))]
fn load_bigwig_track(path: &Path) -> ParseResult<IntervalStore> {
    Err(crate::core::error::ParseError::InvalidTrack {
        path: path.to_path_buf(),
        message: "BigWig support not compiled in (enable the `bigwig` feature)".to_string(),
    })
}
