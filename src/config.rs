//! Analysis configuration
//!
//! Settings are read from an optional JSON file; every field has a default so
//! a partial file (or none at all) is valid. The CLI overrides individual
//! values after loading.

use crate::common::constants::DEFAULT_TOP_N;
use crate::common::error::{KeyBenchError, KeyBenchResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One benchmark result file and the label its rows are exported under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Result file path, relative to `results_dir` unless absolute
    pub path: PathBuf,
    /// Benchmark label written to the `benchmark` export column
    pub benchmark: String,
}

impl DatasetConfig {
    pub fn new(path: impl Into<PathBuf>, benchmark: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            benchmark: benchmark.into(),
        }
    }
}

/// Configuration for an export/analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory the dataset paths are resolved against
    pub results_dir: PathBuf,
    /// Dataset generated with the reference encoding
    pub baseline: DatasetConfig,
    /// Dataset generated with the encoding under test
    pub comparison: DatasetConfig,
    /// Destination of the per-operator timing export
    pub output_csv: PathBuf,
    /// Restrict the analysis to one DBMS
    pub dbms: Option<String>,
    /// Number of operators listed in the slowdown ranking
    pub top_n: usize,
    /// Worker threads for per-query aggregation
    pub threads: usize,
    /// Fallback log level when RUST_LOG is not set
    pub log_level: String,
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> KeyBenchResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KeyBenchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: AnalysisConfig = serde_json::from_str(&contents).map_err(|e| {
            KeyBenchError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> KeyBenchResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> KeyBenchResult<()> {
        if self.top_n == 0 {
            return Err(KeyBenchError::Config("top_n must be at least 1".to_string()));
        }
        if self.baseline.benchmark.is_empty() || self.comparison.benchmark.is_empty() {
            return Err(KeyBenchError::Config(
                "dataset benchmark labels must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a dataset path against `results_dir`
    pub fn resolve(&self, dataset: &DatasetConfig) -> PathBuf {
        if dataset.path.is_absolute() {
            dataset.path.clone()
        } else {
            self.results_dir.join(&dataset.path)
        }
    }

    /// Both datasets in export order (baseline first)
    pub fn datasets(&self) -> [&DatasetConfig; 2] {
        [&self.baseline, &self.comparison]
    }

    pub fn parallel_context(&self) -> ParallelContext {
        ParallelContext::new(self.threads)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            results_dir: PathBuf::from("test"),
            baseline: DatasetConfig::new("duckdb/tpchSf1IdType_int64_sorted.csv", "TPCH_SF1"),
            comparison: DatasetConfig::new("duckdb/tpchSf1IdType_uuid_v4.csv", "TPCH_UUID_SF1"),
            output_csv: PathBuf::from("analysis/operator_timings.csv"),
            dbms: None,
            top_n: DEFAULT_TOP_N,
            threads: num_cpus::get(),
            log_level: "info".to_string(),
        }
    }
}

/// Parallel execution context
#[derive(Debug, Clone)]
pub struct ParallelContext {
    /// Number of worker threads
    pub num_threads: usize,
    /// Enable parallel execution
    pub parallel_enabled: bool,
}

impl ParallelContext {
    pub fn new(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        Self {
            num_threads,
            parallel_enabled: num_threads > 1,
        }
    }

    pub fn sequential() -> Self {
        Self::new(1)
    }

    pub fn from_system() -> Self {
        Self::new(num_cpus::get())
    }

    /// Run `op` inside a pool sized to this context
    pub fn install<R, F>(&self, op: F) -> KeyBenchResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| KeyBenchError::Internal(format!("Failed to build thread pool: {}", e)))?;
        Ok(pool.install(op))
    }
}

impl Default for ParallelContext {
    fn default() -> Self {
        Self::from_system()
    }
}
