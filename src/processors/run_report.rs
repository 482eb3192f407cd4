use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Non-fatal decoding problem; the record is kept with a null value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeWarning {
    pub line: usize,
    pub kind: WarningKind,
    pub value: String,
}

impl DecodeWarning {
    pub fn new(line: usize, kind: WarningKind, value: &str) -> Self {
        Self {
            line,
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarningKind {
    UnknownRecordCode,
    UnknownStatusCode,
}

/// Documented data-quality filters; excluded rows are counted, not reported as errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExclusionReason {
    BeforeStartYear,
    AfterEndYear,
    CoordinateOutOfRange,
}

/// Counters and warnings for one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub archive: String,
    pub start_year: i32,
    pub end_year: i32,
    pub total_lines: usize,
    pub header_lines: usize,
    pub data_lines: usize,
    pub observations: usize,
    pub storms: usize,
    pub storm_months: usize,
    pub exclusions: BTreeMap<ExclusionReason, usize>,
    pub warnings: Vec<DecodeWarning>,
}

impl RunReport {
    pub fn excluded_total(&self) -> usize {
        self.exclusions.values().sum()
    }

    pub fn warning_counts(&self) -> BTreeMap<WarningKind, usize> {
        let mut counts = BTreeMap::new();
        for warning in &self.warnings {
            *counts.entry(warning.kind).or_default() += 1;
        }
        counts
    }

    /// Human-readable summary for the terminal
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== HURDAT2 Run Report ===\n");
        summary.push_str(&format!("Archive: {}\n", self.archive));
        summary.push_str(&format!(
            "Panel years: {}-{}\n",
            self.start_year, self.end_year
        ));
        summary.push_str(&format!(
            "Lines: {} ({} headers, {} data)\n",
            self.total_lines, self.header_lines, self.data_lines
        ));
        summary.push_str(&format!("Observations: {}\n", self.observations));
        summary.push_str(&format!("Storms: {}\n", self.storms));
        summary.push_str(&format!("Storm-months: {}\n", self.storm_months));

        summary.push_str(&format!("\nExcluded Rows: {}\n", self.excluded_total()));
        for (reason, count) in &self.exclusions {
            summary.push_str(&format!("  {:?}: {}\n", reason, count));
        }

        summary.push_str(&format!("\nWarnings: {}\n", self.warnings.len()));
        for (kind, count) in self.warning_counts() {
            summary.push_str(&format!("  {:?}: {}\n", kind, count));
        }

        if !self.warnings.is_empty() {
            summary.push_str("\nFirst 10 Warnings:\n");
            for (i, warning) in self.warnings.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Line {}: {:?} '{}'\n",
                    i + 1,
                    warning.line,
                    warning.kind,
                    warning.value
                ));
            }
        }

        summary
    }
}
