//! bedGraph mappability track reader
//!
//! Reads `chrom start end value` records with no header. Browser, track,
//! comment and blank lines are skipped. Any malformed record aborts the
//! load with its line number.

use crate::core::error::{ParseError, ParseResult};
use crate::core::io::{open_text, ByteLineIterator};
use crate::core::{IntervalStore, ScoredInterval};
use memchr::memchr;
use std::io::BufRead;
use std::path::Path;

/// Zero-copy view of one bedGraph line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedGraphRecordView<'a> {
    pub chrom: &'a str,
    pub start: u64,
    pub end: u64,
    pub value: f64,
}

/// Split the first `N` tab-separated fields of a line
///
/// Returns the fields found so far when the line has fewer than `N`.
pub(crate) fn split_fields<const N: usize>(line: &[u8]) -> (usize, [&[u8]; N]) {
    let mut fields: [&[u8]; N] = [&[]; N];
    let mut count = 0;
    let mut pos = 0;

    while count < N {
        match memchr(b'\t', &line[pos..]) {
            Some(tab) => {
                fields[count] = &line[pos..pos + tab];
                count += 1;
                pos += tab + 1;
            }
            None => {
                fields[count] = &line[pos..];
                count += 1;
                break;
            }
        }
    }

    (count, fields)
}

/// Whether a line carries no record (blank, comment, track or browser line)
pub(crate) fn is_skippable(line: &[u8]) -> bool {
    let trimmed = line.trim_ascii();
    trimmed.is_empty()
        || trimmed.starts_with(b"#")
        || trimmed.starts_with(b"track")
        || trimmed.starts_with(b"browser")
}

fn parse_field<T: std::str::FromStr>(
    field: &[u8],
    name: &'static str,
    line: usize,
) -> ParseResult<T> {
    let invalid = || ParseError::InvalidNumber {
        line,
        field: name,
        value: String::from_utf8_lossy(field).into_owned(),
    };
    std::str::from_utf8(field)
        .map_err(|_| invalid())?
        .trim()
        .parse()
        .map_err(|_| invalid())
}

impl<'a> BedGraphRecordView<'a> {
    /// Parse one bedGraph line; `line_no` is used in errors
    pub fn parse(line: &'a [u8], line_no: usize) -> ParseResult<Self> {
        let (found, fields) = split_fields::<4>(line);
        if found < 4 {
            return Err(ParseError::TooFewFields {
                line: line_no,
                expected: 4,
                found,
            });
        }

        let chrom = std::str::from_utf8(fields[0]).map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: "chrom",
            value: String::from_utf8_lossy(fields[0]).into_owned(),
        })?;
        let start: u64 = parse_field(fields[1], "start", line_no)?;
        let end: u64 = parse_field(fields[2], "end", line_no)?;
        let value: f64 = parse_field(fields[3], "value", line_no)?;

        if end < start {
            return Err(ParseError::InvalidInterval {
                line: line_no,
                start,
                end,
            });
        }

        Ok(Self {
            chrom,
            start,
            end,
            value,
        })
    }

    pub fn to_interval(&self) -> ScoredInterval {
        ScoredInterval::new(self.chrom, self.start, self.end, self.value)
    }
}

/// Read all intervals from a bedGraph stream, in file order
pub fn read_bedgraph<R: BufRead>(reader: R) -> ParseResult<Vec<ScoredInterval>> {
    let mut lines = ByteLineIterator::new(reader);
    let mut intervals = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;
        if is_skippable(line) {
            continue;
        }
        intervals.push(BedGraphRecordView::parse(line, line_no)?.to_interval());
    }

    Ok(intervals)
}

/// Load a (possibly compressed) bedGraph file into an [`IntervalStore`]
pub fn load_bedgraph<P: AsRef<Path>>(path: P) -> ParseResult<IntervalStore> {
    let reader = open_text(path.as_ref())?;
    let intervals = read_bedgraph(reader)?;
    log::info!(
        "Loaded {} mappability intervals from {}",
        intervals.len(),
        path.as_ref().display()
    );
    Ok(IntervalStore::from_intervals(intervals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_parse_record() {
        let view = BedGraphRecordView::parse(b"chr1\t100\t150\t0.8", 1).unwrap();
        assert_eq!(view.chrom, "chr1");
        assert_eq!(view.start, 100);
        assert_eq!(view.end, 150);
        assert_eq!(view.value, 0.8);
    }

    #[test]
    fn test_parse_extra_columns_ignored() {
        let view = BedGraphRecordView::parse(b"chr1\t0\t10\t1\textra", 1).unwrap();
        assert_eq!(view.value, 1.0);
    }

    #[test]
    fn test_parse_too_few_fields() {
        let err = BedGraphRecordView::parse(b"chr1\t100\t150", 7).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooFewFields {
                line: 7,
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_parse_invalid_numbers() {
        assert!(matches!(
            BedGraphRecordView::parse(b"chr1\tabc\t150\t1", 1),
            Err(ParseError::InvalidNumber { field: "start", .. })
        ));
        assert!(matches!(
            BedGraphRecordView::parse(b"chr1\t100\t150\thigh", 1),
            Err(ParseError::InvalidNumber { field: "value", .. })
        ));
    }

    #[test]
    fn test_parse_inverted_interval() {
        assert!(matches!(
            BedGraphRecordView::parse(b"chr1\t150\t100\t1", 3),
            Err(ParseError::InvalidInterval { line: 3, .. })
        ));
    }

    #[test]
    fn test_read_skips_headers() {
        let data: &[u8] = b"track type=bedGraph\n#comment\n\nchr1\t0\t10\t1\nchr1\t10\t20\t0.5\n";
        let intervals = read_bedgraph(BufReader::new(data)).unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[1], ScoredInterval::new("chr1", 10, 20, 0.5));
    }

    #[test]
    fn test_read_reports_line_number() {
        let data: &[u8] = b"chr1\t0\t10\t1\nchr1\t10\n";
        let err = read_bedgraph(BufReader::new(data)).unwrap_err();
        assert!(matches!(err, ParseError::TooFewFields { line: 2, .. }));
    }

    #[test]
    fn test_split_fields() {
        let (n, fields) = split_fields::<3>(b"a\tb\tc\td");
        assert_eq!(n, 3);
        assert_eq!(fields, [&b"a"[..], &b"b"[..], &b"c"[..]]);

        let (n, _) = split_fields::<3>(b"a");
        assert_eq!(n, 1);
    }
}
