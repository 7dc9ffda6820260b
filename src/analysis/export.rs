//! Per-operator timing export
//!
//! One CSV row per extracted operator timing with the header
//! `system_name,benchmark,query,operator,operator_time`.

use super::dataset::query_timings;
use crate::common::error::KeyBenchResult;
use crate::config::{AnalysisConfig, DatasetConfig};
use crate::plan::PlanSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRow {
    pub system_name: String,
    pub benchmark: String,
    pub query: String,
    pub operator: String,
    pub operator_time: f64,
}

/// Timing rows of every successful query in `source`, in file and pre-order
pub fn timing_rows_for_source(source: &PlanSource, benchmark: &str) -> Vec<TimingRow> {
    let mut rows = Vec::new();
    for row in source.rows() {
        match query_timings(row) {
            Ok(outcome) => rows.extend(outcome.records.into_iter().map(|record| TimingRow {
                system_name: row.dbms.clone(),
                benchmark: benchmark.to_string(),
                query: row.query.clone(),
                operator: record.operator_type,
                operator_time: record.timing,
            })),
            Err(e) => debug!("Skipping {} query {}: {}", row.dbms, row.query, e),
        }
    }
    rows
}

/// Timing rows for one configured dataset
pub fn timing_rows_for_dataset(
    config: &AnalysisConfig,
    dataset: &DatasetConfig,
) -> KeyBenchResult<Vec<TimingRow>> {
    let source = PlanSource::open(config.resolve(dataset))?;
    Ok(timing_rows_for_source(&source, &dataset.benchmark))
}

/// Timing rows for the baseline and comparison datasets, baseline first
pub fn collect_timing_rows(config: &AnalysisConfig) -> KeyBenchResult<Vec<TimingRow>> {
    let mut rows = Vec::new();
    for dataset in config.datasets() {
        rows.extend(timing_rows_for_dataset(config, dataset)?);
    }
    Ok(rows)
}

/// Write rows with a header, creating parent directories as needed
pub fn write_timing_rows<P: AsRef<Path>>(path: P, rows: &[TimingRow]) -> KeyBenchResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(["system_name", "benchmark", "query", "operator", "operator_time"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Exported {} operator timing records to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_timing_rows<P: AsRef<Path>>(path: P) -> KeyBenchResult<Vec<TimingRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
