//! In-memory store of mappability intervals
//!
//! Intervals are kept per chromosome in insertion order and each query is a
//! linear scan of one chromosome's intervals through
//! [`ScoredInterval::overlaps`]. Nothing is sorted or merged, so query
//! results come back in the order the track listed them.

use crate::core::region::{GenomicRegion, ScoredInterval};
use std::collections::HashMap;

/// Read-only collection of scored intervals, built once per run
#[derive(Debug, Default)]
pub struct IntervalStore {
    /// Chromosome -> intervals in insertion order
    by_chrom: HashMap<String, Vec<ScoredInterval>>,
    /// Chromosomes in first-seen order
    chrom_order: Vec<String>,
    total: usize,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an ordered sequence of intervals
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = ScoredInterval>,
    {
        let mut store = Self::new();
        for interval in intervals {
            store.push(interval);
        }
        store
    }

    fn push(&mut self, interval: ScoredInterval) {
        if !self.by_chrom.contains_key(interval.chrom()) {
            self.chrom_order.push(interval.chrom().to_string());
        }
        self.by_chrom
            .entry(interval.chrom().to_string())
            .or_default()
            .push(interval);
        self.total += 1;
    }

    /// All stored intervals overlapping `region`, in insertion order
    pub fn query(&self, region: &GenomicRegion) -> Vec<&ScoredInterval> {
        match self.by_chrom.get(&region.chrom) {
            Some(intervals) => intervals.iter().filter(|iv| iv.overlaps(region)).collect(),
            None => vec![],
        }
    }

    /// Total number of stored intervals
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Chromosomes in first-seen order
    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.chrom_order.iter().map(|s| s.as_str())
    }

    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.by_chrom.contains_key(chrom)
    }

    /// Number of intervals on one chromosome
    pub fn interval_count(&self, chrom: &str) -> usize {
        self.by_chrom.get(chrom).map(|v| v.len()).unwrap_or(0)
    }

    /// Iterate over all intervals, chromosome by chromosome
    pub fn iter(&self) -> impl Iterator<Item = &ScoredInterval> {
        self.chrom_order
            .iter()
            .filter_map(move |chrom| self.by_chrom.get(chrom))
            .flat_map(|intervals| intervals.iter())
    }
}

impl FromIterator<ScoredInterval> for IntervalStore {
    fn from_iter<T: IntoIterator<Item = ScoredInterval>>(iter: T) -> Self {
        Self::from_intervals(iter)
    }
}
