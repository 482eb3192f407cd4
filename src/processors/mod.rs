pub mod field_decoder;
pub mod metrics;
pub mod monthly_aggregator;
pub mod parallel_processor;
pub mod run_report;

pub use field_decoder::{DecodeBatch, Decoded, FieldDecoder};
pub use metrics::{MetricsCalculator, StormSummary};
pub use monthly_aggregator::MonthlyAggregator;
pub use parallel_processor::{ParallelProcessor, PipelineOutput};
pub use run_report::{DecodeWarning, ExclusionReason, RunReport, WarningKind};
