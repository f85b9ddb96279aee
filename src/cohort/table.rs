//! Target stats table and per-sample summary writers
//!
//! The target table joins the `mappability` command's output with the
//! cohort statistics by coordinates. Mappability values are copied through
//! verbatim, so a failed row's marker survives.

use crate::cohort::stats::{CohortStats, TargetStats};
use crate::core::error::{ParseError, ParseResult};
use crate::core::io::{open_text, LineIterator};
use crate::core::GenomicRegion;
use crate::formats::bed::parse_bed_line;
use crate::formats::bedgraph::{is_skippable, split_fields};
use crate::formats::output::format_float;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// Column name of the dispersion statistic
pub const MAD_MEDIAN_COLUMN: &str = "mad / median (%)";

/// One row of a mappability table
#[derive(Debug, Clone, PartialEq)]
pub struct MappabilityRow {
    pub region: GenomicRegion,
    /// Value as written, `NA` and the like included
    pub value: String,
}

/// Read a headerless `chrom start end mappability` table
///
/// Extra columns (such as the query region) are ignored.
pub fn read_mappability_table<R: BufRead>(reader: R) -> ParseResult<Vec<MappabilityRow>> {
    let mut lines = LineIterator::new(reader);
    let mut rows = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;
        if is_skippable(line.as_bytes()) {
            continue;
        }

        let (found, fields) = split_fields::<4>(line.as_bytes());
        if found < 4 {
            return Err(ParseError::TooFewFields {
                line: line_no,
                expected: 4,
                found,
            });
        }
        rows.push(MappabilityRow {
            region: parse_bed_line(line, line_no)?,
            value: String::from_utf8_lossy(fields[3]).trim().to_string(),
        });
    }

    Ok(rows)
}

pub fn load_mappability_table<P: AsRef<Path>>(path: P) -> ParseResult<Vec<MappabilityRow>> {
    let rows = read_mappability_table(open_text(path.as_ref())?)?;
    log::info!(
        "Loaded {} mappability rows from {}",
        rows.len(),
        path.as_ref().display()
    );
    Ok(rows)
}

/// Statistic column names, in output order
pub fn stat_column_names(min_reads: &[u32], iqr_multiplier: f64) -> Vec<String> {
    let mut names = vec![format!("total reads > Q3 + {} * IQR (%)", iqr_multiplier)];
    names.extend(min_reads.iter().map(|m| format!("total reads < {} (%)", m)));
    names.push(MAD_MEDIAN_COLUMN.to_string());
    names
}

fn stat_fields(stats: &TargetStats, missing_value: &str) -> Vec<String> {
    let mut fields = vec![format_float(stats.above_iqr_pct)];
    fields.extend(stats.below_pct.iter().map(|&p| format_float(p)));
    fields.push(
        stats
            .mad_median_pct
            .map(format_float)
            .unwrap_or_else(|| missing_value.to_string()),
    );
    fields
}

/// Write the target stats table; returns the number of targets without
/// coverage statistics
pub fn write_target_stats<W: Write>(
    writer: &mut W,
    rows: &[MappabilityRow],
    stats: &CohortStats,
    missing_value: &str,
) -> std::io::Result<usize> {
    let columns = stat_column_names(&stats.min_reads, stats.iqr_multiplier);
    writeln!(
        writer,
        "chrom\tchrom_start\tchrom_end\tmappability\t{}",
        columns.join("\t")
    )?;

    let by_region: HashMap<&GenomicRegion, &TargetStats> =
        stats.targets.iter().zip(&stats.per_target).collect();
    let mut unmatched = 0;

    for row in rows {
        let fields = match by_region.get(&row.region) {
            Some(target_stats) => stat_fields(target_stats, missing_value),
            None => {
                unmatched += 1;
                vec![missing_value.to_string(); columns.len()]
            }
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            row.region.chrom,
            row.region.start,
            row.region.end,
            row.value,
            fields.join("\t")
        )?;
    }

    Ok(unmatched)
}

/// Write the per-sample summary table
pub fn write_sample_summary<W: Write>(writer: &mut W, stats: &CohortStats) -> std::io::Result<()> {
    let mut header = String::from(
        "sample\tQ1\tQ3\tIQR\tupper_fence\tlower_fence\tn_outliers_iqr\tpct_outliers_iqr",
    );
    for min in &stats.min_reads {
        header.push_str(&format!("\tn_below_{}\tpct_below_{}", min, min));
    }
    writeln!(writer, "{}", header)?;

    for sample in &stats.samples {
        let t = &sample.thresholds;
        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            sample.sample,
            format_float(t.q1),
            format_float(t.q3),
            format_float(t.iqr),
            format_float(t.upper_fence),
            format_float(t.lower_fence),
            sample.n_outliers_iqr,
            format_float(sample.pct_outliers_iqr)
        )?;
        for below in &sample.below {
            write!(writer, "\t{}\t{}", below.count, format_float(below.percent))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::stats::{BelowThreshold, SampleSummary, SampleThresholds};
    use std::io::BufReader;

    fn cohort() -> CohortStats {
        CohortStats {
            targets: vec![GenomicRegion::new("chr1", 100, 200)],
            min_reads: vec![20, 10],
            iqr_multiplier: 1.5,
            per_target: vec![TargetStats {
                above_iqr_pct: 33.33,
                below_pct: vec![50.0, 0.0],
                mad_median_pct: None,
            }],
            samples: vec![SampleSummary {
                sample: "ab-x-1".to_string(),
                thresholds: SampleThresholds {
                    q1: 1.75,
                    q3: 3.25,
                    iqr: 1.5,
                    upper_fence: 5.5,
                    lower_fence: -0.5,
                },
                n_outliers_iqr: 1,
                pct_outliers_iqr: 25.0,
                below: vec![
                    BelowThreshold {
                        min_reads: 20,
                        count: 4,
                        percent: 100.0,
                    },
                    BelowThreshold {
                        min_reads: 10,
                        count: 4,
                        percent: 100.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_read_mappability_table() {
        let data: &[u8] = b"chr1\t100\t200\t0.6\nchr1\t300\t400\tNA\t300\t396\n";
        let rows = read_mappability_table(BufReader::new(data)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, "0.6");
        assert_eq!(rows[1].region, GenomicRegion::new("chr1", 300, 400));
        assert_eq!(rows[1].value, "NA");
    }

    #[test]
    fn test_read_mappability_table_short_line() {
        let data: &[u8] = b"chr1\t100\t200\n";
        assert!(matches!(
            read_mappability_table(BufReader::new(data)),
            Err(ParseError::TooFewFields { line: 1, expected: 4, .. })
        ));
    }

    #[test]
    fn test_stat_column_names() {
        assert_eq!(
            stat_column_names(&[20, 10, 5], 1.5),
            vec![
                "total reads > Q3 + 1.5 * IQR (%)",
                "total reads < 20 (%)",
                "total reads < 10 (%)",
                "total reads < 5 (%)",
                "mad / median (%)",
            ]
        );
    }

    #[test]
    fn test_write_target_stats() {
        let rows = vec![
            MappabilityRow {
                region: GenomicRegion::new("chr1", 100, 200),
                value: "0.6".to_string(),
            },
            MappabilityRow {
                region: GenomicRegion::new("chr2", 1, 2),
                value: "1.0".to_string(),
            },
        ];
        let mut out = Vec::new();
        let unmatched = write_target_stats(&mut out, &rows, &cohort(), "NA").unwrap();
        assert_eq!(unmatched, 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "chrom\tchrom_start\tchrom_end\tmappability\ttotal reads > Q3 + 1.5 * IQR (%)\ttotal reads < 20 (%)\ttotal reads < 10 (%)\tmad / median (%)"
        );
        assert_eq!(lines[1], "chr1\t100\t200\t0.6\t33.33\t50.0\t0.0\tNA");
        assert_eq!(lines[2], "chr2\t1\t2\t1.0\tNA\tNA\tNA\tNA");
    }

    #[test]
    fn test_write_sample_summary() {
        let mut out = Vec::new();
        write_sample_summary(&mut out, &cohort()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "sample\tQ1\tQ3\tIQR\tupper_fence\tlower_fence\tn_outliers_iqr\tpct_outliers_iqr\tn_below_20\tpct_below_20\tn_below_10\tpct_below_10"
        );
        assert_eq!(
            lines[1],
            "ab-x-1\t1.75\t3.25\t1.5\t5.5\t-0.5\t1\t25.0\t4\t100.0\t4\t100.0"
        );
    }
}
