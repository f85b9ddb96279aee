//! Target BED reader
//!
//! The first line of a target file is a header and is always skipped. Only
//! the first three columns are read. A target with `end < start` is kept as
//! is; it fails later as a per-row validation error.

use crate::core::error::{ParseError, ParseResult};
use crate::core::io::{open_text, LineIterator};
use crate::core::GenomicRegion;
use crate::formats::bedgraph::{is_skippable, split_fields};
use std::io::BufRead;
use std::path::Path;

/// Parse the coordinates of one BED line
///
/// # Examples
/// ```
/// use target_mappability::formats::bed::parse_bed_line;
/// let region = parse_bed_line("chr1\t100\t200\tAMPL1", 2).unwrap();
/// assert_eq!((region.start, region.end), (100, 200));
/// ```
pub fn parse_bed_line(line: &str, line_no: usize) -> ParseResult<GenomicRegion> {
    let (found, fields) = split_fields::<3>(line.as_bytes());
    if found < 3 {
        return Err(ParseError::TooFewFields {
            line: line_no,
            expected: 3,
            found,
        });
    }

    // Fields come from a &str split on an ASCII tab
    let field = |i: usize| std::str::from_utf8(fields[i]).unwrap_or_default();
    let parse_coord = |i: usize, name: &'static str| -> ParseResult<u64> {
        field(i)
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                field: name,
                value: field(i).to_string(),
            })
    };

    Ok(GenomicRegion::new(
        field(0),
        parse_coord(1, "start")?,
        parse_coord(2, "end")?,
    ))
}

/// Read target regions from a BED stream, in file order
pub fn read_targets<R: BufRead>(reader: R) -> ParseResult<Vec<GenomicRegion>> {
    let mut lines = LineIterator::new(reader);
    let mut targets = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;
        if line_no == 1 || is_skippable(line.as_bytes()) {
            continue;
        }
        targets.push(parse_bed_line(line, line_no)?);
    }

    Ok(targets)
}

/// Load target regions from a (possibly compressed) BED file
pub fn load_targets<P: AsRef<Path>>(path: P) -> ParseResult<Vec<GenomicRegion>> {
    let targets = read_targets(open_text(path.as_ref())?)?;
    log::info!(
        "Loaded {} targets from {}",
        targets.len(),
        path.as_ref().display()
    );
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_parse_bed_line_basic() {
        let region = parse_bed_line("chr1\t100\t200", 1).unwrap();
        assert_eq!(region, GenomicRegion::new("chr1", 100, 200));
    }

    #[test]
    fn test_parse_bed_line_extra_fields() {
        let region = parse_bed_line("chr2\t5\t10\tname\t0\t+\tGENE=X", 1).unwrap();
        assert_eq!(region, GenomicRegion::new("chr2", 5, 10));
    }

    #[test]
    fn test_parse_bed_line_inverted_kept() {
        let region = parse_bed_line("chr1\t200\t100", 1).unwrap();
        assert_eq!((region.start, region.end), (200, 100));
    }

    #[test]
    fn test_parse_bed_line_invalid() {
        assert!(matches!(
            parse_bed_line("chr1\t100", 4),
            Err(ParseError::TooFewFields { line: 4, .. })
        ));
        assert!(matches!(
            parse_bed_line("chr1\tabc\t200", 4),
            Err(ParseError::InvalidNumber { field: "start", .. })
        ));
        assert!(matches!(
            parse_bed_line("chr1\t100\t-5", 4),
            Err(ParseError::InvalidNumber { field: "end", .. })
        ));
    }

    #[test]
    fn test_read_targets_skips_header() {
        let data: &[u8] = b"track name=panel\nchr1\t100\t200\tA\nchr2\t300\t400\tB\n";
        let targets = read_targets(BufReader::new(data)).unwrap();
        assert_eq!(
            targets,
            vec![
                GenomicRegion::new("chr1", 100, 200),
                GenomicRegion::new("chr2", 300, 400),
            ]
        );
    }

    #[test]
    fn test_first_line_skipped_even_if_data() {
        let data: &[u8] = b"chr1\t1\t2\nchr1\t3\t4\n";
        let targets = read_targets(BufReader::new(data)).unwrap();
        assert_eq!(targets, vec![GenomicRegion::new("chr1", 3, 4)]);
    }

    #[test]
    fn test_read_targets_line_numbers() {
        let data: &[u8] = b"header\nchr1\t1\t2\nchr1\tx\t4\n";
        let err = read_targets(BufReader::new(data)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 3, .. }));
    }
}
