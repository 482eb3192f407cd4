use crate::error::{ProcessingError, Result};
use crate::models::RawLine;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use csv::{ReaderBuilder, Trim};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Reads a HURDAT2 text archive into numbered, trimmed lines.
///
/// Line numbers count non-blank lines from 1; each line also keeps its
/// position in the file for error messages.
pub struct ArchiveReader {
    use_mmap: bool,
}

impl ArchiveReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read every line of the archive at `path`
    pub fn read_lines(&self, path: &Path) -> Result<Vec<RawLine>> {
        let lines = if self.use_mmap {
            self.read_lines_mmap(path)?
        } else {
            self.read_lines_buffered(path)?
        };

        debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(lines)
    }

    /// Read lines from an in-memory archive
    pub fn read_str(&self, content: &str) -> Result<Vec<RawLine>> {
        Self::read_from(content.as_bytes())
    }

    fn read_lines_buffered(&self, path: &Path) -> Result<Vec<RawLine>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        Self::read_from(reader)
    }

    fn read_lines_mmap(&self, path: &Path) -> Result<Vec<RawLine>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;
        Self::read_from(&mmap[..])
    }

    fn read_from<R: Read>(source: R) -> Result<Vec<RawLine>> {
        // No quoting in HURDAT2, and header and data lines differ in width
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(source);

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let line_number = lines.len() + 1;
            let physical_line = record
                .position()
                .map_or(line_number, |p| p.line() as usize);
            let fields = record.iter().map(str::to_string).collect();
            lines.push(RawLine::new(line_number, fields).with_physical_line(physical_line));
        }

        Ok(lines)
    }
}

impl Default for ArchiveReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
AL011980,            ALLEN,      2,
19800801, 1800,  , TD, 11.0N,  35.0W,  30, 1009,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,
19800802, 0000,  , TS, 11.2N,  37.0W,  35, 1008,   40,   30,    0,   30,    0,    0,    0,    0,    0,    0,    0,    0,
";

    #[test]
    fn test_read_str_trims_fields() -> Result<()> {
        let lines = ArchiveReader::new().read_str(SAMPLE)?;

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[0].field(1), "ALLEN");
        assert!(lines[0].is_header());

        assert_eq!(lines[1].line_number, 2);
        assert_eq!(lines[1].field(1), "1800");
        assert_eq!(lines[1].field(3), "TD");
        assert_eq!(lines[1].field(4), "11.0N");
        assert!(!lines[1].is_header());
        Ok(())
    }

    #[test]
    fn test_buffered_and_mmap_agree() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let buffered = ArchiveReader::new().read_lines(temp_file.path())?;
        let mapped = ArchiveReader::with_mmap(true).read_lines(temp_file.path())?;

        assert_eq!(buffered, mapped);
        assert_eq!(buffered.len(), 3);
        Ok(())
    }

    #[test]
    fn test_blank_lines_are_skipped() -> Result<()> {
        let content = "AL011980,ALLEN,1,\n\n19800801,1800,,TD,11.0N,35.0W,30,1009\n";
        let lines = ArchiveReader::new().read_str(content)?;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line_number, 2);
        assert_eq!(lines[1].physical_line, 3);
        assert_eq!(lines[0].physical_line, 1);
        Ok(())
    }
}
