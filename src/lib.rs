//! KeyBench - identifier-encoding benchmark tooling
//!
//! Two halves: a deterministic codec that rewrites dense integer keys into the
//! encodings under test (sorted/random int64, UUIDv4, UUIDv7, base64 hashes),
//! and an analysis pipeline that extracts per-operator timings from vendor
//! query plans, aggregates them and compares a baseline dataset against one
//! generated with a different key encoding.
//!
pub mod analysis;
pub mod common;
pub mod config;
pub mod encoding;
pub mod plan;

// Re-export common types for convenience
pub use common::{KeyBenchError, KeyBenchResult};

// Re-export configuration for convenience
pub use config::{AnalysisConfig, DatasetConfig, ParallelContext};

// Re-export the codec for convenience
pub use encoding::{convert_batch, convert_id, convert_id_named, Benchmark, EncodedId, EngineType, IdEncoding};

// Re-export plan handling for convenience
pub use plan::{
    parse_query_plan, render_plan_outline, walk, OperatorTiming, ParseIssue, PlanNode, PlanRow,
    PlanSource, WalkOutcome,
};

// Re-export analysis for convenience
pub use analysis::{
    aggregate, compare, run_analysis, AggregateStats, ComparisonRecord, ComparisonReport,
    DatasetAnalysis, OperatorStats, SystemAnalysis, TimingAggregator, TimingRow,
};
