use crate::error::{ProcessingError, Result};
use crate::models::{HeaderDescriptor, RawLine};
use crate::utils::constants::MIN_DATA_FIELDS;
use tracing::debug;

/// Finds storm header lines and turns them into descriptors with data ranges
pub struct HeaderExtractor {
    check_layout: bool,
}

impl HeaderExtractor {
    pub fn new() -> Self {
        Self { check_layout: true }
    }

    pub fn with_layout_check(check_layout: bool) -> Self {
        Self { check_layout }
    }

    /// Scan all lines and return one descriptor per header, in file order
    pub fn extract(&self, lines: &[RawLine]) -> Result<Vec<HeaderDescriptor>> {
        let descriptors = lines
            .iter()
            .filter(|line| line.is_header())
            .map(Self::parse_header)
            .collect::<Result<Vec<_>>>()?;

        if self.check_layout {
            Self::check_layout(lines, &descriptors)?;
        }

        debug!(
            "Extracted {} storm headers from {} lines",
            descriptors.len(),
            lines.len()
        );
        Ok(descriptors)
    }

    /// Parse a header line: `storm_id, storm_name, obs_count,`
    fn parse_header(line: &RawLine) -> Result<HeaderDescriptor> {
        let storm_id = line.field(0);
        if storm_id.is_empty() {
            return Err(ProcessingError::MalformedHeader {
                line: line.physical_line,
                reason: "missing storm id".to_string(),
            });
        }

        let count = line.field(2);
        let declared_obs_count = count.parse::<usize>().map_err(|_| {
            ProcessingError::MalformedHeader {
                line: line.physical_line,
                reason: format!("observation count '{}' is not a non-negative integer", count),
            }
        })?;

        if line.line_number.checked_add(declared_obs_count).is_none() {
            return Err(ProcessingError::MalformedHeader {
                line: line.physical_line,
                reason: format!("observation count {} is out of range", declared_obs_count),
            });
        }

        Ok(HeaderDescriptor::new(
            storm_id.to_string(),
            line.field(1).to_string(),
            declared_obs_count,
            line.line_number,
        ))
    }

    /// Fail fast when the empty-4th-field header heuristic clearly does not fit the file
    fn check_layout(lines: &[RawLine], descriptors: &[HeaderDescriptor]) -> Result<()> {
        if lines.is_empty() {
            return Err(ProcessingError::LayoutMismatch(
                "archive contains no lines".to_string(),
            ));
        }

        if descriptors.is_empty() {
            return Err(ProcessingError::LayoutMismatch(
                "no header lines found".to_string(),
            ));
        }

        if descriptors.len() * 2 > lines.len() {
            return Err(ProcessingError::LayoutMismatch(format!(
                "{} of {} lines look like headers",
                descriptors.len(),
                lines.len()
            )));
        }

        if let Some(short) = lines
            .iter()
            .find(|line| !line.is_header() && line.fields.len() < MIN_DATA_FIELDS)
        {
            return Err(ProcessingError::LayoutMismatch(format!(
                "line {} has {} fields, expected at least {}",
                short.physical_line,
                short.fields.len(),
                MIN_DATA_FIELDS
            )));
        }

        Ok(())
    }
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::ArchiveReader;
    use std::collections::BTreeSet;

    fn data_line(date: &str) -> String {
        format!(
            "{}, 0000,  , TS, 28.5N,  79.0W,  40, 1000,{}",
            date,
            " -999,".repeat(12)
        )
    }

    fn archive(blocks: &[(&str, &str, usize)]) -> String {
        let mut content = String::new();
        for (id, name, count) in blocks {
            content.push_str(&format!("{}, {}, {},\n", id, name, count));
            for _ in 0..*count {
                content.push_str(&data_line("19800801"));
                content.push('\n');
            }
        }
        content
    }

    #[test]
    fn test_extract_descriptors() -> Result<()> {
        let lines = ArchiveReader::new().read_str(&archive(&[
            ("AL011980", "ALLEN", 2),
            ("AL021980", "BONNIE", 3),
        ]))?;

        let descriptors = HeaderExtractor::new().extract(&lines)?;

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].storm_id, "AL011980");
        assert_eq!(descriptors[0].storm_name, "ALLEN");
        assert_eq!(descriptors[0].header_line_number, 1);
        assert_eq!(descriptors[0].data_range(), 2..=3);
        assert_eq!(descriptors[1].storm_name, "BONNIE");
        assert_eq!(descriptors[1].header_line_number, 4);
        assert_eq!(descriptors[1].data_range(), 5..=7);
        Ok(())
    }

    #[test]
    fn test_ranges_cover_exactly_the_data_lines() -> Result<()> {
        let lines = ArchiveReader::new().read_str(&archive(&[
            ("AL011980", "ALLEN", 4),
            ("AL021980", "BONNIE", 1),
            ("AL031980", "CHARLEY", 3),
        ]))?;
        let descriptors = HeaderExtractor::new().extract(&lines)?;

        let covered: BTreeSet<usize> = descriptors.iter().flat_map(|d| d.data_range()).collect();
        let data_lines: BTreeSet<usize> = lines
            .iter()
            .filter(|l| !l.is_header())
            .map(|l| l.line_number)
            .collect();
        let range_total: usize = descriptors.iter().map(|d| d.data_range().count()).sum();

        assert_eq!(covered, data_lines);
        assert_eq!(range_total, covered.len());
        Ok(())
    }

    #[test]
    fn test_malformed_header_count() {
        let content = format!("AL011980, ALLEN, two,\n{}\n", data_line("19800801"));
        let lines = ArchiveReader::new().read_str(&content).unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_negative_header_count() {
        let content = format!("AL011980, ALLEN, -1,\n{}\n", data_line("19800801"));
        let lines = ArchiveReader::new().read_str(&content).unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert_eq!(err.line_number(), Some(1));
    }

    #[test]
    fn test_header_count_out_of_range() {
        let content = format!(
            "AL011980, ALLEN, 18446744073709551615,\n{}\n",
            data_line("19800801")
        );
        let lines = ArchiveReader::new().read_str(&content).unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_layout_mismatch_mostly_headers() {
        let content = format!(
            "AL011980, ALLEN, 0,\nAL021980, BONNIE, 0,\nAL031980, CHARLEY, 1,\n{}\n",
            data_line("19800801")
        );
        let lines = ArchiveReader::new().read_str(&content).unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert!(matches!(err, ProcessingError::LayoutMismatch(ref m) if m.contains("3 of 4")));

        let descriptors = HeaderExtractor::with_layout_check(false)
            .extract(&lines)
            .unwrap();
        assert_eq!(descriptors.len(), 3);
    }

    #[test]
    fn test_layout_mismatch_without_headers() {
        let lines = ArchiveReader::new()
            .read_str(&format!("{}\n{}\n", data_line("19800801"), data_line("19800802")))
            .unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert!(matches!(err, ProcessingError::LayoutMismatch(_)));
    }

    #[test]
    fn test_layout_mismatch_short_data_line() {
        let content = "AL011980, ALLEN, 1,\n19800801, 0000, , TS, 28.5N, 79.0W\n";
        let lines = ArchiveReader::new().read_str(content).unwrap();

        let err = HeaderExtractor::new().extract(&lines).unwrap_err();
        assert!(matches!(err, ProcessingError::LayoutMismatch(_)));

        // The descriptors themselves are still well formed without the guard
        let descriptors = HeaderExtractor::with_layout_check(false)
            .extract(&lines)
            .unwrap();
        assert_eq!(descriptors.len(), 1);
    }
}
