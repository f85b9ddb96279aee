//! Overall mappability aggregation
//!
//! Computes a length-weighted mean of track values over the part of each
//! overlapping interval that falls inside the query region:
//! 1. Clip every overlapping interval to the region
//! 2. Weight its value by the clipped length
//! 3. Divide the weighted sum by the total clipped length

use crate::core::error::{AggregationError, MappabilityResult};
use crate::core::region::{GenomicRegion, ScoredInterval};
use std::borrow::Borrow;

/// Accumulation mode for the weighted sums
///
/// Controls whether the doubling recurrence of the legacy
/// overall-mappability script is reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationMode {
    /// Plain running sums: `acc += contribution`
    #[default]
    Improved,
    /// Legacy recurrence: `acc = acc + (acc + contribution)`
    /// - Every earlier term is doubled at each step
    /// - Bit-for-bit compatible with the legacy script's output
    Legacy,
}

impl AccumulationMode {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "improved" | "default" => Some(AccumulationMode::Improved),
            "legacy" | "strict" => Some(AccumulationMode::Legacy),
            _ => None,
        }
    }

    /// Check if legacy mode is enabled
    pub fn is_legacy(&self) -> bool {
        matches!(self, AccumulationMode::Legacy)
    }

    #[inline]
    fn accumulate(&self, acc: f64, contribution: f64) -> f64 {
        match self {
            AccumulationMode::Improved => acc + contribution,
            AccumulationMode::Legacy => acc + (acc + contribution),
        }
    }

    /// Exact integer form of [`accumulate`](Self::accumulate) for lengths;
    /// `None` on overflow
    #[inline]
    fn accumulate_len(&self, acc: u128, len: u64) -> Option<u128> {
        match self {
            AccumulationMode::Improved => acc.checked_add(len as u128),
            AccumulationMode::Legacy => acc.checked_add(acc.checked_add(len as u128)?),
        }
    }
}

/// Part of one track interval that falls inside the query region
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapSpan {
    pub interval: ScoredInterval,
    pub clip_start: u64,
    pub clip_end: u64,
    pub length: u64,
}

/// Overall mappability of one region with its contributing spans
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub value: f64,
    pub spans: Vec<OverlapSpan>,
}

/// Clip an interval to a region
///
/// For an overlapping interval `clip_end >= clip_start` always holds; the
/// length saturates at zero otherwise.
#[inline]
pub fn clip_span(region: &GenomicRegion, interval: &ScoredInterval) -> (u64, u64, u64) {
    let clip_start = region.start.max(interval.start());
    let clip_end = region.end.min(interval.end());
    (clip_start, clip_end, clip_end.saturating_sub(clip_start))
}

/// Stateless length-weighted mappability aggregator
#[derive(Debug, Clone, Copy, Default)]
pub struct MappabilityAggregator {
    mode: AccumulationMode,
}

impl MappabilityAggregator {
    pub fn new(mode: AccumulationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AccumulationMode {
        self.mode
    }

    /// Overall mappability of `region` given the intervals overlapping it
    ///
    /// # Examples
    /// ```
    /// use target_mappability::{GenomicRegion, MappabilityAggregator, ScoredInterval};
    ///
    /// let region = GenomicRegion::new("chr1", 100, 200);
    /// let overlaps = vec![
    ///     ScoredInterval::new("chr1", 100, 150, 0.8),
    ///     ScoredInterval::new("chr1", 150, 200, 0.4),
    /// ];
    /// let value = MappabilityAggregator::default().aggregate(&region, &overlaps).unwrap();
    /// assert!((value - 0.6).abs() < 1e-12);
    /// ```
    pub fn aggregate<I>(&self, region: &GenomicRegion, overlaps: &[I]) -> MappabilityResult<f64>
    where
        I: Borrow<ScoredInterval>,
    {
        region.validate()?;

        let mut weighted_sum = 0.0f64;
        // Exact until the single conversion at the division
        let mut total_len = 0u128;

        for interval in overlaps {
            let interval = interval.borrow();
            let (_, _, span_len) = clip_span(region, interval);
            weighted_sum = self
                .mode
                .accumulate(weighted_sum, span_len as f64 * interval.value);
            total_len = self.mode.accumulate_len(total_len, span_len).ok_or_else(|| {
                AggregationError::AccumulatorOverflow {
                    chrom: region.chrom.clone(),
                    start: region.start,
                    end: region.end,
                }
            })?;
        }

        if total_len == 0 {
            return Err(AggregationError::NoCoverage {
                chrom: region.chrom.clone(),
                start: region.start,
                end: region.end,
            });
        }

        Ok(weighted_sum / total_len as f64)
    }

    /// Same as [`aggregate`](Self::aggregate), also returning the clipped
    /// span of every overlapping interval
    pub fn aggregate_detailed<I>(
        &self,
        region: &GenomicRegion,
        overlaps: &[I],
    ) -> MappabilityResult<AggregationResult>
    where
        I: Borrow<ScoredInterval>,
    {
        let value = self.aggregate(region, overlaps)?;
        let spans = overlaps
            .iter()
            .map(|interval| {
                let interval = interval.borrow();
                let (clip_start, clip_end, length) = clip_span(region, interval);
                OverlapSpan {
                    interval: interval.clone(),
                    clip_start,
                    clip_end,
                    length,
                }
            })
            .collect();
        Ok(AggregationResult { value, spans })
    }
}
