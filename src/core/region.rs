//! Genomic region and scored interval records
//!
//! Typed records shared by the store, the aggregator and the format
//! readers. Coordinates are taken as-is from the input files and compared
//! exactly; no coordinate-system conversion happens here.

use crate::core::error::AggregationError;
use std::fmt;

/// A genomic interval on a single chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicRegion {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicRegion {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Length of the region (`end - start`), zero for malformed regions
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check `end >= start`
    pub fn validate(&self) -> Result<(), AggregationError> {
        if self.end < self.start {
            return Err(AggregationError::InvalidRegion {
                chrom: self.chrom.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Query region for k-mer based tracks: the end is moved back to the
    /// last k-mer start position, `end - (k - 1)`.
    ///
    /// Fails when the trimmed end would fall before `start` (or below zero).
    ///
    /// # Examples
    /// ```
    /// use target_mappability::GenomicRegion;
    /// let target = GenomicRegion::new("chr1", 100, 200);
    /// assert_eq!(target.kmer_trimmed(5).unwrap(), GenomicRegion::new("chr1", 100, 196));
    /// assert!(target.kmer_trimmed(102).is_err());
    /// ```
    pub fn kmer_trimmed(&self, k: u64) -> Result<GenomicRegion, AggregationError> {
        self.validate()?;
        let trim = k.saturating_sub(1);
        match self.end.checked_sub(trim) {
            Some(end) if end >= self.start => Ok(GenomicRegion {
                chrom: self.chrom.clone(),
                start: self.start,
                end,
            }),
            _ => Err(AggregationError::KmerTrim {
                chrom: self.chrom.clone(),
                start: self.start,
                end: self.end,
                k,
            }),
        }
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// A mappability interval from the genome-wide track
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInterval {
    pub region: GenomicRegion,
    pub value: f64,
}

impl ScoredInterval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, value: f64) -> Self {
        Self {
            region: GenomicRegion::new(chrom, start, end),
            value,
        }
    }

    #[inline]
    pub fn chrom(&self) -> &str {
        &self.region.chrom
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.region.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.region.end
    }

    /// Whether this interval overlaps `region`.
    ///
    /// The test is the explicit disjunction of the four cases below rather
    /// than a generic range-intersection check. Partial overlaps use strict
    /// bounds, containment uses non-strict bounds, so an interval that only
    /// touches the region at one coordinate is excluded.
    #[inline]
    pub fn overlaps(&self, region: &GenomicRegion) -> bool {
        if self.region.chrom != region.chrom {
            return false;
        }
        let (start, end) = (self.region.start, self.region.end);

        let within_region = start >= region.start && end <= region.end;
        let contains_region = start <= region.start && end >= region.end;
        let left_overlap = start < region.start && end > region.start;
        let right_overlap = start < region.end && end > region.end;

        within_region || contains_region || left_overlap || right_overlap
    }
}

impl fmt::Display for ScoredInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.region, self.value)
    }
}
