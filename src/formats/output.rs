//! Tab-separated output writers
//!
//! Mappability rows are written without a header, one per target, in input
//! order. Floats use the shortest round-trip representation with a trailing
//! `.0` for whole numbers (`0.6`, `1.0`), matching the legacy script's
//! output.

use crate::core::TargetMappability;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default marker written in place of a failed row's value
pub const DEFAULT_MISSING_VALUE: &str = "NA";

/// Format a float the way the legacy script prints it
///
/// Shortest round-trip digits; scientific notation with a signed two-digit
/// exponent below 1e-4 and from 1e16 up.
///
/// # Examples
/// ```
/// use target_mappability::formats::output::format_float;
/// assert_eq!(format_float(0.6), "0.6");
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(0.00005), "5e-05");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_scientific(value);
    }

    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// `1.5e-7` -> `1.5e-07`, `1e16` -> `1e+16`
fn format_scientific(value: f64) -> String {
    let s = format!("{:e}", value);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

/// Output layout options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub missing_value: String,
    /// Append the trimmed query start/end after the value
    pub with_query_region: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            missing_value: DEFAULT_MISSING_VALUE.to_string(),
            with_query_region: false,
        }
    }
}

/// Format one mappability row (without newline)
pub fn format_row(row: &TargetMappability, options: &OutputOptions) -> String {
    let value = match row.value() {
        Some(v) => format_float(v),
        None => options.missing_value.clone(),
    };
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        row.target.chrom, row.target.start, row.target.end, value
    );
    if options.with_query_region {
        match &row.query {
            Some(query) => line.push_str(&format!("\t{}\t{}", query.start, query.end)),
            None => line.push_str(&format!(
                "\t{}\t{}",
                options.missing_value, options.missing_value
            )),
        }
    }
    line
}

/// Write mappability rows to any writer
pub fn write_rows<W: Write>(
    writer: &mut W,
    rows: &[TargetMappability],
    options: &OutputOptions,
) -> std::io::Result<()> {
    for row in rows {
        writeln!(writer, "{}", format_row(row, options))?;
    }
    Ok(())
}

/// Write failed rows as `chrom start end reason`
pub fn write_failed_rows<W: Write>(
    writer: &mut W,
    rows: &[TargetMappability],
) -> std::io::Result<usize> {
    let mut written = 0;
    for row in rows {
        if let Err(e) = &row.outcome {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                row.target.chrom,
                row.target.start,
                row.target.end,
                e.reason()
            )?;
            written += 1;
        }
    }
    Ok(written)
}

/// Create a buffered output file
pub fn create_output<P: AsRef<Path>>(path: P) -> std::io::Result<BufWriter<File>> {
    Ok(BufWriter::with_capacity(128 * 1024, File::create(path)?))
}
