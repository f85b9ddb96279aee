//! Performance benchmarks for target-mappability
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use target_mappability::bedgraph::BedGraphRecordView;
use target_mappability::{
    AccumulationMode, GenomicRegion, IntervalStore, MappabilityAggregator, PipelineConfig,
    ScoredInterval, TargetMappabilityPipeline,
};

/// Tiled track of `n` intervals per chromosome, 100bp each
fn synthetic_store(n: u64) -> IntervalStore {
    let mut intervals = Vec::new();
    for chrom in ["chr1", "chr2"] {
        for i in 0..n {
            let value = ((i * 37) % 100) as f64 / 100.0;
            intervals.push(ScoredInterval::new(chrom, i * 100, i * 100 + 100, value));
        }
    }
    IntervalStore::from_intervals(intervals)
}

fn synthetic_targets(n: u64, span: u64) -> Vec<GenomicRegion> {
    (0..n)
        .map(|i| GenomicRegion::new("chr1", 10_000 + i * 250, 10_000 + i * 250 + span))
        .collect()
}

/// Benchmark store queries at different track sizes
fn bench_store_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_query");
    let region = GenomicRegion::new("chr1", 5_050, 5_950);

    for size in [1_000u64, 10_000, 100_000] {
        let store = synthetic_store(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| black_box(store.query(black_box(&region)).len()))
        });
    }

    group.finish();
}

/// Benchmark aggregation of one region in both modes
fn bench_aggregation(c: &mut Criterion) {
    let region = GenomicRegion::new("chr1", 50, 10_050);
    let overlaps: Vec<ScoredInterval> = (0..101)
        .map(|i| ScoredInterval::new("chr1", i * 100, i * 100 + 100, 0.5))
        .collect();

    let mut group = c.benchmark_group("aggregation");
    for mode in [AccumulationMode::Improved, AccumulationMode::Legacy] {
        let aggregator = MappabilityAggregator::new(mode);
        group.bench_function(format!("{:?}", mode), |b| {
            b.iter(|| black_box(aggregator.aggregate(black_box(&region), &overlaps)))
        });
    }
    group.finish();
}

/// Benchmark the pipeline with 1 and 4 threads
fn bench_pipeline(c: &mut Criterion) {
    let store = synthetic_store(20_000);
    let targets = synthetic_targets(1_000, 180);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(targets.len() as u64));
    for threads in [1usize, 4] {
        let config = PipelineConfig {
            k: 50,
            threads,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, &config| {
            b.iter(|| {
                let pipeline = TargetMappabilityPipeline::new(&store, config);
                black_box(pipeline.run(black_box(&targets)).map(|o| o.stats))
            })
        });
    }
    group.finish();
}

/// Benchmark bedGraph line parsing
fn bench_bedgraph_parsing(c: &mut Criterion) {
    let line = b"chr1\t1000000\t1000150\t0.873333";

    c.bench_function("bedgraph_parsing", |b| {
        b.iter(|| {
            let result = BedGraphRecordView::parse(black_box(line.as_slice()), 1);
            black_box(result.map(|r| r.value))
        })
    });
}

criterion_group!(
    benches,
    bench_store_query,
    bench_aggregation,
    bench_pipeline,
    bench_bedgraph_parsing,
);

criterion_main!(benches);
