//! Input abstraction layer
//!
//! Opens plain, gzip and bzip2 text inputs behind one `BufRead`, choosing
//! buffered or memory-mapped reading for plain files by size.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Plain inputs of at least this size are memory-mapped (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    /// Gzip, including multi-member (bgzip) files
    Gzip,
    Bzip2,
}

/// Detect compression from extension, then magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" || extension == "bgz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// Plain-file reader, buffered or memory-mapped by size
enum SmartReader {
    /// Buffered reader for smaller files or streaming
    Buffered(BufReader<File>),
    /// Memory-mapped reader for large files
    Mapped(MappedReader),
}

struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    fn new(file: &File) -> io::Result<Self> {
        // SAFETY: input files are not modified while a run reads them
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

impl SmartReader {
    fn open(path: &Path, mmap_threshold: u64) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() >= mmap_threshold {
            Ok(SmartReader::Mapped(MappedReader::new(&file)?))
        } else {
            Ok(SmartReader::Buffered(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                file,
            )))
        }
    }

    #[cfg(test)]
    fn is_mapped(&self) -> bool {
        matches!(self, SmartReader::Mapped(_))
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartReader::Buffered(reader) => reader.read(buf),
            SmartReader::Mapped(reader) => reader.read(buf),
        }
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SmartReader::Buffered(reader) => reader.fill_buf(),
            SmartReader::Mapped(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SmartReader::Buffered(reader) => reader.consume(amt),
            SmartReader::Mapped(reader) => reader.consume(amt),
        }
    }
}

/// Open a text input, transparently decompressing gzip and bzip2
pub fn open_text<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    match detect_compression(path)? {
        CompressionFormat::Gzip => {
            let decoder = flate2::read::MultiGzDecoder::new(File::open(path)?);
            Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
        }
        CompressionFormat::Bzip2 => {
            let decoder = bzip2::read::BzDecoder::new(File::open(path)?);
            Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
        }
        CompressionFormat::Plain => Ok(Box::new(SmartReader::open(path, MMAP_THRESHOLD)?)),
    }
}

/// Line iterator that reuses a buffer to avoid allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
        }
    }

    /// Read the next line into the internal buffer
    /// Returns None at EOF, Some(Ok(&str)) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&str>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Byte line iterator for zero-copy parsing
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_smart_reader_auto_small_file() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "small file content")?;

        let reader = SmartReader::open(temp.path(), MMAP_THRESHOLD)?;
        assert!(!reader.is_mapped());
        Ok(())
    }

    #[test]
    fn test_mapped_reader_lines() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"a\nb\n")?;
        temp.flush()?;

        let reader = SmartReader::open(temp.path(), 0)?;
        assert!(reader.is_mapped());
        let lines: Vec<String> = reader.lines().collect::<io::Result<_>>()?;
        assert_eq!(lines, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_detect_compression() -> io::Result<()> {
        let mut plain = NamedTempFile::new()?;
        writeln!(plain, "chr1\t0\t10\t1")?;
        assert_eq!(detect_compression(plain.path())?, CompressionFormat::Plain);

        // gzip magic bytes without a .gz extension
        let gz = NamedTempFile::new()?;
        let mut encoder = GzEncoder::new(gz.reopen()?, Compression::default());
        encoder.write_all(b"chr1\t0\t10\t1\n")?;
        encoder.finish()?;
        assert_eq!(detect_compression(gz.path())?, CompressionFormat::Gzip);

        let bz = Builder::new().suffix(".bz2").tempfile()?;
        assert_eq!(detect_compression(bz.path())?, CompressionFormat::Bzip2);
        Ok(())
    }

    #[test]
    fn test_open_text_gzip_matches_plain() -> io::Result<()> {
        let content = "chr1\t0\t10\t1\nchr1\t10\t20\t0.5\n";

        let mut plain = NamedTempFile::new()?;
        plain.write_all(content.as_bytes())?;
        plain.flush()?;

        let gz = Builder::new().suffix(".gz").tempfile()?;
        let mut encoder = GzEncoder::new(gz.reopen()?, Compression::default());
        encoder.write_all(content.as_bytes())?;
        encoder.finish()?;

        let mut from_plain = String::new();
        open_text(plain.path())?.read_to_string(&mut from_plain)?;
        let mut from_gz = String::new();
        open_text(gz.path())?.read_to_string(&mut from_gz)?;

        assert_eq!(from_plain, content);
        assert_eq!(from_gz, content);
        Ok(())
    }

    #[test]
    fn test_line_iterator_strips_crlf() -> io::Result<()> {
        let data: &[u8] = b"line1\r\nline2\n";
        let mut iter = LineIterator::new(BufReader::new(data));

        assert_eq!(iter.next_line().unwrap()?, "line1");
        assert_eq!(iter.next_line().unwrap()?, "line2");
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_byte_line_iterator() -> io::Result<()> {
        let data: &[u8] = b"line1\nline2\nline3";
        let mut iter = ByteLineIterator::new(BufReader::new(data));

        assert_eq!(iter.next_line().unwrap()?, b"line1");
        assert_eq!(iter.next_line().unwrap()?, b"line2");
        assert_eq!(iter.next_line().unwrap()?, b"line3");
        assert!(iter.next_line().is_none());
        Ok(())
    }
}
