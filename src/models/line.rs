use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// One comma-delimited archive line.
///
/// `line_number` counts non-blank lines from 1 and drives the block ranges;
/// `physical_line` is the line in the file and is what errors report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub line_number: usize,
    pub physical_line: usize,
    pub fields: Vec<String>,
}

impl RawLine {
    pub fn new(line_number: usize, fields: Vec<String>) -> Self {
        Self {
            line_number,
            physical_line: line_number,
            fields,
        }
    }

    pub fn with_physical_line(mut self, physical_line: usize) -> Self {
        self.physical_line = physical_line;
        self
    }

    /// Field at a 0-based position, or `""` when absent
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// Header lines leave the 4th field (the status column on data lines) empty
    pub fn is_header(&self) -> bool {
        self.field(3).is_empty()
    }
}

/// Storm identity announced by a header line, anchoring the block that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDescriptor {
    pub storm_id: String,
    pub storm_name: String,
    pub declared_obs_count: usize,
    pub header_line_number: usize,
}

impl HeaderDescriptor {
    pub fn new(
        storm_id: String,
        storm_name: String,
        declared_obs_count: usize,
        header_line_number: usize,
    ) -> Self {
        Self {
            storm_id,
            storm_name,
            declared_obs_count,
            header_line_number,
        }
    }

    pub fn data_start(&self) -> usize {
        self.header_line_number + 1
    }

    /// Last data line of the block; equals `header_line_number` for an empty block
    pub fn data_end(&self) -> usize {
        self.header_line_number.saturating_add(self.declared_obs_count)
    }

    pub fn data_range(&self) -> RangeInclusive<usize> {
        self.data_start()..=self.data_end()
    }

    pub fn is_empty(&self) -> bool {
        self.declared_obs_count == 0
    }
}

/// A data line with the storm identity of its enclosing block attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub storm_id: String,
    pub storm_name: String,
    pub line: RawLine,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        let header = RawLine::new(
            1,
            vec!["AL011980".into(), "ALLEN".into(), "2".into(), "".into()],
        );
        assert!(header.is_header());

        let short_header = RawLine::new(1, vec!["AL011980".into(), "ALLEN".into(), "2".into()]);
        assert!(short_header.is_header());

        let data = RawLine::new(
            2,
            vec!["19800101".into(), "0000".into(), "".into(), "TS".into()],
        );
        assert!(!data.is_header());
    }

    #[test]
    fn test_descriptor_range() {
        let descriptor = HeaderDescriptor::new("AL011980".into(), "ALLEN".into(), 3, 10);
        assert_eq!(descriptor.data_start(), 11);
        assert_eq!(descriptor.data_end(), 13);
        assert_eq!(descriptor.data_range().count(), 3);

        let empty = HeaderDescriptor::new("AL021980".into(), "BONNIE".into(), 0, 14);
        assert!(empty.is_empty());
        assert_eq!(empty.data_range().count(), 0);
    }

    #[test]
    fn test_huge_count_saturates() {
        let descriptor = HeaderDescriptor::new("AL011980".into(), "ALLEN".into(), usize::MAX, 1);
        assert_eq!(descriptor.data_end(), usize::MAX);
        assert!(descriptor.data_range().contains(&2));
    }
}
