//! Amplicon coverage table reader
//!
//! Per-sample amplicon coverage tables are tab-separated with a header
//! line. The first three columns are the amplicon coordinates; the read
//! count column is found by name (`total_reads` unless told otherwise).

use crate::core::error::{ParseError, ParseResult};
use crate::core::io::{open_text, LineIterator};
use crate::core::GenomicRegion;
use crate::formats::bed::parse_bed_line;
use crate::formats::bedgraph::is_skippable;
use std::io::BufRead;
use std::path::Path;

/// Default read count column
pub const TOTAL_READS_COLUMN: &str = "total_reads";

/// One amplicon row of a coverage table
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRecord {
    pub region: GenomicRegion,
    pub total_reads: f64,
}

/// Locate a column in a header line (an optional leading `#` is ignored)
fn find_column(header: &str, column: &str) -> Option<usize> {
    header
        .trim_start_matches('#')
        .split('\t')
        .position(|name| name.trim() == column)
}

/// Read coverage records from a stream; `source` is used in errors
pub fn read_coverage<R: BufRead>(
    reader: R,
    column: &str,
    source: &Path,
) -> ParseResult<Vec<CoverageRecord>> {
    let mut lines = LineIterator::new(reader);
    let mut records = Vec::new();
    let mut reads_index = None;
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;

        let Some(index) = reads_index else {
            if line.trim().is_empty() {
                continue;
            }
            reads_index = Some(find_column(line, column).ok_or_else(|| {
                ParseError::MissingColumn {
                    column: column.to_string(),
                    path: source.to_path_buf(),
                }
            })?);
            continue;
        };

        if is_skippable(line.as_bytes()) {
            continue;
        }

        let region = parse_bed_line(line, line_no)?;
        let fields: Vec<&str> = line.split('\t').collect();
        let raw = fields.get(index).ok_or(ParseError::TooFewFields {
            line: line_no,
            expected: index + 1,
            found: fields.len(),
        })?;
        let total_reads: f64 = raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: "total_reads",
            value: raw.to_string(),
        })?;

        records.push(CoverageRecord {
            region,
            total_reads,
        });
    }

    if reads_index.is_none() {
        return Err(ParseError::EmptyInput(source.to_path_buf()));
    }

    Ok(records)
}

/// Load a (possibly compressed) coverage table
pub fn load_coverage<P: AsRef<Path>>(path: P, column: &str) -> ParseResult<Vec<CoverageRecord>> {
    let path = path.as_ref();
    read_coverage(open_text(path)?, column, path)
}
