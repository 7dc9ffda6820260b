//! Operator timing analysis
//!
//! Plan payloads → timing records → per-operator statistics → baseline vs.
//! comparison report.

pub mod aggregate;
pub mod compare;
pub mod dataset;
pub mod export;
pub mod report;
pub mod run;

pub use aggregate::{aggregate, AggregateStats, OperatorStats, TimingAggregator};
pub use compare::{compare, compare_operators, overall_slowdown, ComparisonRecord, ComparisonReport, Presence};
pub use dataset::{analyze_dataset, query_timings, DatasetAnalysis};
pub use export::{
    collect_timing_rows, read_timing_rows, timing_rows_for_dataset, timing_rows_for_source,
    write_timing_rows, TimingRow,
};
pub use report::{render_comparison, render_operator_stats, render_stats_table};
pub use run::{run_analysis, run_analysis_on, SystemAnalysis};
