//! Per-DBMS baseline/comparison analysis driver

use super::compare::{compare, ComparisonReport};
use super::dataset::{analyze_dataset, DatasetAnalysis};
use crate::common::error::KeyBenchResult;
use crate::config::AnalysisConfig;
use crate::plan::PlanSource;
use std::collections::BTreeSet;
use tracing::info;

/// Both sides of the analysis for one DBMS
#[derive(Debug, Clone)]
pub struct SystemAnalysis {
    pub dbms: String,
    pub baseline: Option<DatasetAnalysis>,
    pub comparison: Option<DatasetAnalysis>,
    /// Present only when both datasets contain the DBMS
    pub report: Option<ComparisonReport>,
}

impl SystemAnalysis {
    /// Label of the dataset the DBMS is missing from, if exactly one is missing
    pub fn missing_side<'a>(&self, config: &'a AnalysisConfig) -> Option<&'a str> {
        match (&self.baseline, &self.comparison) {
            (Some(_), None) => Some(config.comparison.benchmark.as_str()),
            (None, Some(_)) => Some(config.baseline.benchmark.as_str()),
            _ => None,
        }
    }
}

/// Analyze every DBMS found in either dataset (or only `config.dbms`)
pub fn run_analysis(config: &AnalysisConfig) -> KeyBenchResult<Vec<SystemAnalysis>> {
    let baseline = PlanSource::open(config.resolve(&config.baseline))?;
    let comparison = PlanSource::open(config.resolve(&config.comparison))?;
    run_analysis_on(config, &baseline, &comparison)
}

/// Same as [`run_analysis`] over already opened sources
pub fn run_analysis_on(
    config: &AnalysisConfig,
    baseline: &PlanSource,
    comparison: &PlanSource,
) -> KeyBenchResult<Vec<SystemAnalysis>> {
    let ctx = config.parallel_context();
    let in_baseline = baseline.dbms_names();
    let in_comparison = comparison.dbms_names();

    let systems: BTreeSet<&String> = match &config.dbms {
        Some(name) => in_baseline
            .iter()
            .chain(in_comparison.iter())
            .filter(|dbms| *dbms == name)
            .collect(),
        None => in_baseline.union(&in_comparison).collect(),
    };
    info!("Found {} database system(s)", systems.len());

    let mut results = Vec::with_capacity(systems.len());
    for dbms in systems {
        let baseline_analysis = if in_baseline.contains(dbms) {
            Some(analyze_dataset(baseline, Some(dbms.as_str()), &ctx)?)
        } else {
            None
        };
        let comparison_analysis = if in_comparison.contains(dbms) {
            Some(analyze_dataset(comparison, Some(dbms.as_str()), &ctx)?)
        } else {
            None
        };
        let report = match (&baseline_analysis, &comparison_analysis) {
            (Some(base), Some(comp)) => Some(compare(&base.stats, &comp.stats)),
            _ => None,
        };
        results.push(SystemAnalysis {
            dbms: dbms.clone(),
            baseline: baseline_analysis,
            comparison: comparison_analysis,
            report,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(rows: &[(&str, f64)]) -> PlanSource {
        let mut data = String::from("dbms,query,state,plan\n");
        for (i, (dbms, timing)) in rows.iter().enumerate() {
            let payload = serde_json::json!({"queryPlan": {
                "_label": "Scan",
                "_attrs": {"system_representation": [{"operator_type": "SEQ_SCAN", "operator_timing": timing}]}
            }})
            .to_string()
            .replace('"', "\"\"");
            data.push_str(&format!("{},{},success,\"{}\"\n", dbms, i, payload));
        }
        PlanSource::from_reader(data.as_bytes(), "memory.csv").unwrap()
    }

    #[test]
    fn test_systems_from_both_sides() {
        let config = AnalysisConfig {
            threads: 1,
            ..Default::default()
        };
        let baseline = source(&[("duckdb", 1.0), ("umbra", 1.0)]);
        let comparison = source(&[("duckdb", 3.0), ("clickhouse", 2.0)]);

        let results = run_analysis_on(&config, &baseline, &comparison).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.dbms.as_str()).collect();
        assert_eq!(names, vec!["clickhouse", "duckdb", "umbra"]);

        let duckdb = &results[1];
        let report = duckdb.report.as_ref().unwrap();
        assert_eq!(report.overall_slowdown, 3.0);
        assert_eq!(duckdb.missing_side(&config), None);

        assert!(results[0].report.is_none());
        assert_eq!(results[0].missing_side(&config), Some("TPCH_SF1"));
        assert_eq!(results[2].missing_side(&config), Some("TPCH_UUID_SF1"));
    }

    #[test]
    fn test_dbms_filter() {
        let config = AnalysisConfig {
            threads: 1,
            dbms: Some("duckdb".to_string()),
            ..Default::default()
        };
        let baseline = source(&[("duckdb", 1.0), ("umbra", 1.0)]);
        let comparison = source(&[("duckdb", 2.0)]);
        let results = run_analysis_on(&config, &baseline, &comparison).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].dbms, "duckdb");
    }

    #[test]
    fn test_unreadable_source_is_an_error() {
        let config = AnalysisConfig {
            results_dir: "/nonexistent".into(),
            ..Default::default()
        };
        assert!(run_analysis(&config).is_err());
    }
}
