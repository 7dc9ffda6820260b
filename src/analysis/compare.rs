//! Baseline vs. comparison dataset operator deltas
//!
//! Sentinel values:
//! - operator only in the comparison set: `pct_change` and `slowdown_factor` are `+inf`
//! - operator only in the baseline set: `pct_change = -100`, `slowdown_factor = 0`
//! - zero baseline average: `pct_change = 0`, `slowdown_factor = 0`

use super::aggregate::{AggregateStats, OperatorStats};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeSet;

/// Which datasets an operator type appeared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    Both,
    BaselineOnly,
    ComparisonOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub operator: String,
    pub presence: Presence,
    pub baseline_avg: f64,
    pub comparison_avg: f64,
    pub baseline_total: f64,
    pub comparison_total: f64,
    /// `comparison_avg - baseline_avg`
    pub diff: f64,
    pub pct_change: f64,
    pub slowdown_factor: f64,
}

impl ComparisonRecord {
    fn build(operator: &str, baseline: Option<&OperatorStats>, comparison: Option<&OperatorStats>) -> Option<Self> {
        let (presence, pct_change, slowdown_factor) = match (baseline, comparison) {
            (Some(base), Some(comp)) => {
                if base.avg_time > 0.0 {
                    (
                        Presence::Both,
                        (comp.avg_time - base.avg_time) / base.avg_time * 100.0,
                        comp.avg_time / base.avg_time,
                    )
                } else {
                    (Presence::Both, 0.0, 0.0)
                }
            }
            (None, Some(_)) => (Presence::ComparisonOnly, f64::INFINITY, f64::INFINITY),
            (Some(_), None) => (Presence::BaselineOnly, -100.0, 0.0),
            (None, None) => return None,
        };

        let baseline_avg = baseline.map_or(0.0, |s| s.avg_time);
        let comparison_avg = comparison.map_or(0.0, |s| s.avg_time);
        Some(Self {
            operator: operator.to_string(),
            presence,
            baseline_avg,
            comparison_avg,
            baseline_total: baseline.map_or(0.0, |s| s.total_time),
            comparison_total: comparison.map_or(0.0, |s| s.total_time),
            diff: comparison_avg - baseline_avg,
            pct_change,
            slowdown_factor,
        })
    }

    /// Eligible for the slowdown ranking: finite and positive factor
    pub fn has_finite_slowdown(&self) -> bool {
        self.slowdown_factor.is_finite() && self.slowdown_factor > 0.0
    }
}

/// Full comparison of two datasets for one system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Ordered by descending `|diff|`
    pub records: Vec<ComparisonRecord>,
    pub baseline_total: f64,
    pub comparison_total: f64,
    /// Whole-dataset time ratio, 0 when the baseline total is 0
    pub overall_slowdown: f64,
}

impl ComparisonReport {
    /// Records with a finite positive slowdown, largest factor first
    pub fn top_impacted(&self, n: usize) -> Vec<&ComparisonRecord> {
        let mut ranked: Vec<&ComparisonRecord> = self
            .records
            .iter()
            .filter(|record| record.has_finite_slowdown())
            .collect();
        ranked.sort_by(|a, b| {
            OrderedFloat(b.slowdown_factor)
                .cmp(&OrderedFloat(a.slowdown_factor))
                .then_with(|| a.operator.cmp(&b.operator))
        });
        ranked.truncate(n);
        ranked
    }

    /// Overall slowdown as a signed percent change
    pub fn overall_pct_change(&self) -> f64 {
        (self.overall_slowdown - 1.0) * 100.0
    }

    pub fn get(&self, operator: &str) -> Option<&ComparisonRecord> {
        self.records.iter().find(|record| record.operator == operator)
    }
}

/// Per-operator comparison over the union of both operator sets
pub fn compare_operators(baseline: &AggregateStats, comparison: &AggregateStats) -> Vec<ComparisonRecord> {
    let operators: BTreeSet<&str> = baseline
        .operators
        .keys()
        .chain(comparison.operators.keys())
        .map(String::as_str)
        .collect();

    let mut records: Vec<ComparisonRecord> = operators
        .into_iter()
        .filter_map(|op| ComparisonRecord::build(op, baseline.get(op), comparison.get(op)))
        .collect();

    // Stable sort keeps operator-name order among equal deltas.
    records.sort_by(|a, b| OrderedFloat(b.diff.abs()).cmp(&OrderedFloat(a.diff.abs())));
    records
}

/// Whole-dataset ratio of total operator time
pub fn overall_slowdown(baseline_total: f64, comparison_total: f64) -> f64 {
    if baseline_total > 0.0 {
        comparison_total / baseline_total
    } else {
        0.0
    }
}

pub fn compare(baseline: &AggregateStats, comparison: &AggregateStats) -> ComparisonReport {
    ComparisonReport {
        records: compare_operators(baseline, comparison),
        baseline_total: baseline.total_time,
        comparison_total: comparison.total_time,
        overall_slowdown: overall_slowdown(baseline.total_time, comparison.total_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::plan::OperatorTiming;

    fn stats(items: &[(&str, f64)]) -> AggregateStats {
        let records: Vec<OperatorTiming> = items
            .iter()
            .map(|(op, t)| OperatorTiming::new(*op, *t))
            .collect();
        aggregate(&records)
    }

    #[test]
    fn test_operator_in_both() {
        let report = compare(&stats(&[("Scan", 1.0)]), &stats(&[("Scan", 2.0)]));
        let scan = report.get("Scan").unwrap();
        assert_eq!(scan.presence, Presence::Both);
        assert_eq!(scan.slowdown_factor, 2.0);
        assert_eq!(scan.pct_change, 100.0);
        assert_eq!(scan.diff, 1.0);
        assert_eq!(report.overall_slowdown, 2.0);
        assert_eq!(report.overall_pct_change(), 100.0);
    }

    #[test]
    fn test_operator_only_in_comparison() {
        let report = compare(&stats(&[]), &stats(&[("Join", 5.0)]));
        let join = report.get("Join").unwrap();
        assert_eq!(join.presence, Presence::ComparisonOnly);
        assert_eq!(join.slowdown_factor, f64::INFINITY);
        assert_eq!(join.pct_change, f64::INFINITY);
        assert_eq!(join.diff, 5.0);
        assert!(report.top_impacted(10).is_empty());
        assert_eq!(report.overall_slowdown, 0.0);
    }

    #[test]
    fn test_operator_only_in_baseline() {
        let report = compare(&stats(&[("Filter", 2.0)]), &stats(&[]));
        let filter = report.get("Filter").unwrap();
        assert_eq!(filter.presence, Presence::BaselineOnly);
        assert_eq!(filter.pct_change, -100.0);
        assert_eq!(filter.slowdown_factor, 0.0);
        assert_eq!(filter.diff, -2.0);
        assert!(report.top_impacted(10).is_empty());
    }

    #[test]
    fn test_zero_baseline_average() {
        let mut baseline = stats(&[("Scan", 1.0)]);
        if let Some(scan) = baseline.operators.get_mut("Scan") {
            scan.avg_time = 0.0;
        }
        let record = &compare_operators(&baseline, &stats(&[("Scan", 3.0)]))[0];
        assert_eq!(record.slowdown_factor, 0.0);
        assert_eq!(record.pct_change, 0.0);
    }

    #[test]
    fn test_ordering() {
        let baseline = stats(&[("A", 1.0), ("B", 1.0), ("C", 4.0), ("D", 1.0)]);
        let comparison = stats(&[("A", 1.5), ("B", 3.0), ("C", 2.0), ("E", 0.1)]);
        let report = compare(&baseline, &comparison);

        let by_diff: Vec<&str> = report.records.iter().map(|r| r.operator.as_str()).collect();
        // |diff|: A 0.5, B 2.0, C 2.0, D 1.0, E 0.1
        assert_eq!(by_diff, vec!["B", "C", "D", "A", "E"]);

        let top: Vec<&str> = report.top_impacted(2).iter().map(|r| r.operator.as_str()).collect();
        assert_eq!(top, vec!["B", "A"]);
        assert_eq!(report.top_impacted(10).len(), 3);
    }
}
