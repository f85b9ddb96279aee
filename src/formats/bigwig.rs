//! BigWig mappability track reader
//!
//! Mappability tracks are often distributed as BigWig. Every interval of
//! every chromosome is read into memory, chromosome by chromosome in the
//! order the file header lists them.

use crate::core::error::{ParseError, ParseResult};
use crate::core::{IntervalStore, ScoredInterval};
use bigtools::BigWigRead;
use std::path::Path;

/// Read all intervals from a BigWig file
pub fn read_bigwig<P: AsRef<Path>>(path: P) -> ParseResult<Vec<ScoredInterval>> {
    let path = path.as_ref();
    let invalid = |message: String| ParseError::InvalidTrack {
        path: path.to_path_buf(),
        message,
    };

    let path_str = path
        .to_str()
        .ok_or_else(|| invalid("path is not valid UTF-8".to_string()))?;
    let mut reader = BigWigRead::open_file(path_str).map_err(|e| invalid(e.to_string()))?;

    let chroms = reader.chroms().to_vec();
    let mut intervals = Vec::new();

    for chrom_info in chroms {
        let chrom_name = chrom_info.name.clone();
        let values = reader
            .get_interval(&chrom_name, 0, chrom_info.length)
            .map_err(|e| invalid(e.to_string()))?;

        for value in values {
            let value = value.map_err(|e| invalid(e.to_string()))?;
            intervals.push(ScoredInterval::new(
                chrom_name.clone(),
                value.start as u64,
                value.end as u64,
                value.value as f64,
            ));
        }
    }

    Ok(intervals)
}

/// Load a BigWig file into an [`IntervalStore`]
pub fn load_bigwig<P: AsRef<Path>>(path: P) -> ParseResult<IntervalStore> {
    let intervals = read_bigwig(path.as_ref())?;
    log::info!(
        "Loaded {} mappability intervals from {}",
        intervals.len(),
        path.as_ref().display()
    );
    Ok(IntervalStore::from_intervals(intervals))
}
