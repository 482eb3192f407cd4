use crate::error::{ProcessingError, Result};
use crate::models::{HeaderDescriptor, RawLine, TaggedLine};
use tracing::debug;

/// Attaches storm identity to data lines by merging them against the header ranges.
///
/// Lines and descriptors are both in file order, so a single cursor into the
/// descriptor list is enough.
pub struct BlockTagger;

impl BlockTagger {
    pub fn new() -> Self {
        Self
    }

    pub fn tag(
        &self,
        lines: Vec<RawLine>,
        descriptors: &[HeaderDescriptor],
    ) -> Result<Vec<TaggedLine>> {
        let mut tagged = Vec::with_capacity(lines.len().saturating_sub(descriptors.len()));
        let mut cursor = 0;
        let mut current: Option<&HeaderDescriptor> = None;
        let mut last_physical = 0;

        for line in lines {
            let line_number = line.line_number;
            let physical_line = line.physical_line;
            last_physical = physical_line;

            if line.is_header() {
                if let Some(open) = current {
                    if open.data_end() >= line_number {
                        return Err(ProcessingError::UncoveredDataLine {
                            line: physical_line,
                            reason: format!(
                                "storm {} declares {} observations (lines {}-{}) but a new header starts here",
                                open.storm_id,
                                open.declared_obs_count,
                                open.data_start(),
                                open.data_end()
                            ),
                        });
                    }
                }

                let descriptor = descriptors
                    .get(cursor)
                    .filter(|d| d.header_line_number == line_number);
                match descriptor {
                    Some(d) => {
                        current = Some(d);
                        cursor += 1;
                    }
                    None => {
                        return Err(ProcessingError::MalformedHeader {
                            line: physical_line,
                            reason: "header line has no matching descriptor".to_string(),
                        });
                    }
                }
                continue;
            }

            match current {
                Some(d) if d.data_range().contains(&line_number) => tagged.push(TaggedLine {
                    storm_id: d.storm_id.clone(),
                    storm_name: d.storm_name.clone(),
                    line,
                }),
                Some(d) => {
                    return Err(ProcessingError::UncoveredDataLine {
                        line: physical_line,
                        reason: format!(
                            "storm {} declares only {} observations",
                            d.storm_id, d.declared_obs_count
                        ),
                    });
                }
                None => {
                    return Err(ProcessingError::UncoveredDataLine {
                        line: physical_line,
                        reason: "data line before the first storm header".to_string(),
                    });
                }
            }
        }

        // The open block's header or its last data line is the final line read
        if let Some(open) = current {
            let last_seen = tagged
                .last()
                .map(|t| t.line.line_number)
                .filter(|&n| n > open.header_line_number)
                .unwrap_or(open.header_line_number);
            if open.data_end() > last_seen {
                return Err(ProcessingError::UncoveredDataLine {
                    line: last_physical + 1,
                    reason: format!(
                        "archive ends before the {} observations declared for storm {}",
                        open.declared_obs_count, open.storm_id
                    ),
                });
            }
        }

        debug!(
            "Tagged {} data lines across {} storms",
            tagged.len(),
            descriptors.len()
        );
        Ok(tagged)
    }
}

impl Default for BlockTagger {
    fn default() -> Self {
        Self::new()
    }
}
