//! target-mappability CLI entry point
//!
//! Computes per-target overall mappability from a mappability track and
//! builds the cohort target stats table.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use target_mappability::cohort::{self, CohortConfig, DEFAULT_SAMPLE_PATTERN};
use target_mappability::core::{
    AccumulationMode, LogObserver, PipelineConfig, TargetMappabilityPipeline,
};
use target_mappability::formats::output::{create_output, DEFAULT_MISSING_VALUE};
use target_mappability::formats::{self, OutputOptions, TrackFormat, TOTAL_READS_COLUMN};

/// Accumulation mode for the weighted sums (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum AccumulationArg {
    /// Plain running sums
    #[default]
    #[value(name = "improved")]
    Improved,
    /// Doubling recurrence, identical to the legacy script's output
    #[value(name = "legacy")]
    Legacy,
}

impl From<AccumulationArg> for AccumulationMode {
    fn from(arg: AccumulationArg) -> Self {
        match arg {
            AccumulationArg::Improved => AccumulationMode::Improved,
            AccumulationArg::Legacy => AccumulationMode::Legacy,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum TrackFormatArg {
    /// Pick by file extension (.bw / .bigwig are BigWig)
    #[default]
    #[value(name = "auto")]
    Auto,
    #[value(name = "bedgraph")]
    BedGraph,
    #[value(name = "bigwig")]
    BigWig,
}

impl From<TrackFormatArg> for TrackFormat {
    fn from(arg: TrackFormatArg) -> Self {
        match arg {
            TrackFormatArg::Auto => TrackFormat::Auto,
            TrackFormatArg::BedGraph => TrackFormat::BedGraph,
            TrackFormatArg::BigWig => TrackFormat::BigWig,
        }
    }
}

#[derive(Parser)]
#[command(name = "target-mappability")]
#[command(about = "Per-target overall mappability and cohort coverage statistics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute overall mappability for every target
    Mappability {
        /// Target BED file (first line is a header)
        #[arg(short = 't', long = "targets")]
        targets: PathBuf,
        /// Mappability track (bedGraph, optionally gzip/bzip2, or BigWig)
        #[arg(short = 'm', long = "mappability")]
        mappability: PathBuf,
        /// k-mer length the track was computed with
        #[arg(short = 'k', long = "k-mer-length", alias = "kmer", value_parser = clap::value_parser!(u64).range(1..))]
        k: u64,
        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Accumulation mode: 'legacy' reproduces the legacy script's values
        #[arg(long, default_value = "improved")]
        accumulation: AccumulationArg,
        /// Number of threads
        #[arg(long, default_value = "1")]
        threads: usize,
        /// Value written for targets that failed
        #[arg(long = "missing-value", default_value = DEFAULT_MISSING_VALUE)]
        missing_value: String,
        /// Append the trimmed query start/end columns
        #[arg(long = "with-query-region")]
        with_query_region: bool,
        /// Write failed targets with their reason to this file
        #[arg(long = "failed-output")]
        failed_output: Option<PathBuf>,
        /// Track format
        #[arg(long = "track-format", default_value = "auto")]
        track_format: TrackFormatArg,
    },
    /// Build the target stats table from a cohort of coverage files
    Stats {
        /// Overall mappability table from the `mappability` command
        #[arg(short = 'm', long = "overall-mappability")]
        mappability: PathBuf,
        /// Coverage file glob patterns, one per line
        #[arg(short = 'r', long = "cov-files-regex", alias = "cov-files")]
        cov_files: String,
        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Regex extracting the sample ID from a coverage file name
        #[arg(long = "sample-pattern", default_value = DEFAULT_SAMPLE_PATTERN)]
        sample_pattern: String,
        /// Read count column of the coverage tables
        #[arg(long, default_value = TOTAL_READS_COLUMN)]
        column: String,
        /// Minimum-read thresholds
        #[arg(long = "min-reads", value_delimiter = ',', default_value = "20,10,5")]
        min_reads: Vec<u32>,
        /// Write the per-sample summary to this file
        #[arg(long = "sample-summary")]
        sample_summary: Option<PathBuf>,
        /// Value written for missing statistics
        #[arg(long = "missing-value", default_value = DEFAULT_MISSING_VALUE)]
        missing_value: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Mappability {
            targets,
            mappability,
            k,
            output,
            accumulation,
            threads,
            missing_value,
            with_query_region,
            failed_output,
            track_format,
        } => {
            if let AccumulationArg::Legacy = accumulation {
                eprintln!("Accumulation mode: legacy (doubling recurrence)");
            }

            eprintln!("Loading targets: {:?}", targets);
            let regions = formats::load_targets(&targets)
                .with_context(|| format!("Failed to load targets {}", targets.display()))?;

            let load_start = Instant::now();
            eprintln!("Loading mappability track: {:?}", mappability);
            let store = formats::load_track(&mappability, track_format.into())
                .with_context(|| format!("Failed to load track {}", mappability.display()))?;
            eprintln!(
                "Track loaded in {:.2}s ({} intervals)",
                load_start.elapsed().as_secs_f64(),
                store.len()
            );

            let config = PipelineConfig {
                k,
                mode: accumulation.into(),
                threads,
            };
            let pipeline = TargetMappabilityPipeline::new(&store, config);
            let result = pipeline.run_with_observer(&regions, &LogObserver)?;

            let options = OutputOptions {
                missing_value,
                with_query_region,
            };
            eprintln!("Writing overall mappability: {:?}", output);
            let mut writer = create_output(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            formats::write_rows(&mut writer, &result.rows, &options)?;
            writer.flush()?;

            if let Some(failed_path) = failed_output {
                let mut failed_writer = create_output(&failed_path)
                    .with_context(|| format!("Failed to create {}", failed_path.display()))?;
                let n = formats::write_failed_rows(&mut failed_writer, &result.rows)?;
                failed_writer.flush()?;
                eprintln!("Failed targets written: {} -> {:?}", n, failed_path);
            }

            let stats = result.stats;
            eprintln!("\n=== Mappability Statistics ===");
            eprintln!("Total targets:   {}", stats.total);
            eprintln!("Successful:      {}", stats.success);
            eprintln!("Failed:          {}", stats.failed);
            eprintln!("  - Invalid:     {}", stats.invalid);
            eprintln!("  - NoCoverage:  {}", stats.no_coverage);
            if stats.overflow > 0 {
                eprintln!("  - Overflow:    {}", stats.overflow);
            }
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Stats {
            mappability,
            cov_files,
            output,
            sample_pattern,
            column,
            min_reads,
            sample_summary,
            missing_value,
        } => {
            eprintln!("Loading overall mappability: {:?}", mappability);
            let rows = cohort::load_mappability_table(&mappability)
                .with_context(|| format!("Failed to load {}", mappability.display()))?;

            let config = CohortConfig {
                sample_pattern,
                column,
                min_reads,
                ..Default::default()
            };
            let stats = cohort::build_cohort_stats(&cov_files, &config)
                .context("Failed to build cohort statistics")?;

            eprintln!("Writing target stats table: {:?}", output);
            let mut writer = create_output(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let unmatched = cohort::write_target_stats(&mut writer, &rows, &stats, &missing_value)?;
            writer.flush()?;

            if let Some(summary_path) = sample_summary {
                let mut summary_writer = create_output(&summary_path)
                    .with_context(|| format!("Failed to create {}", summary_path.display()))?;
                cohort::write_sample_summary(&mut summary_writer, &stats)?;
                summary_writer.flush()?;
                eprintln!("Sample summary written: {:?}", summary_path);
            }

            eprintln!("\n=== Cohort Statistics ===");
            eprintln!("Samples:         {}", stats.n_samples());
            eprintln!("Targets:         {}", rows.len());
            eprintln!("No coverage:     {}", unmatched);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
