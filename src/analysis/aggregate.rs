//! Per-operator timing statistics
//!
//! [`TimingAggregator`] accumulates count, sum and extrema per operator type.
//! Aggregators built over disjoint sets of queries merge by summing counts and
//! sums and combining extrema, so per-worker partial results fold into one.
//! Averages and shares of total time are only computed in [`TimingAggregator::finish`].

use crate::plan::OperatorTiming;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Accumulator {
    count: usize,
    total: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new(timing: f64) -> Self {
        Self {
            count: 1,
            total: timing,
            min: timing,
            max: timing,
        }
    }

    fn add(&mut self, timing: f64) {
        self.count += 1;
        self.total += timing;
        self.min = self.min.min(timing);
        self.max = self.max.max(timing);
    }

    fn merge(&mut self, other: &Accumulator) {
        self.count += other.count;
        self.total += other.total;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

/// Running per-operator accumulation
#[derive(Debug, Clone, Default)]
pub struct TimingAggregator {
    operators: HashMap<String, Accumulator>,
}

impl TimingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &OperatorTiming) {
        self.add_timing(&record.operator_type, record.timing);
    }

    pub fn add_timing(&mut self, operator_type: &str, timing: f64) {
        match self.operators.get_mut(operator_type) {
            Some(acc) => acc.add(timing),
            None => {
                self.operators
                    .insert(operator_type.to_string(), Accumulator::new(timing));
            }
        }
    }

    pub fn extend<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a OperatorTiming>,
    {
        for record in records {
            self.add(record);
        }
    }

    /// Fold another aggregator into this one
    pub fn merge(&mut self, other: TimingAggregator) {
        for (operator_type, acc) in other.operators {
            self.operators
                .entry(operator_type)
                .and_modify(|existing| existing.merge(&acc))
                .or_insert(acc);
        }
    }

    pub fn merged(mut self, other: TimingAggregator) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Compute averages and percentages
    pub fn finish(&self) -> AggregateStats {
        let total_time: f64 = self.operators.values().map(|acc| acc.total).sum();
        let operators = self
            .operators
            .iter()
            .map(|(operator_type, acc)| {
                let percentage = if total_time > 0.0 {
                    acc.total / total_time * 100.0
                } else {
                    0.0
                };
                let stats = OperatorStats {
                    count: acc.count,
                    total_time: acc.total,
                    avg_time: acc.total / acc.count as f64,
                    min_time: acc.min,
                    max_time: acc.max,
                    percentage,
                };
                (operator_type.clone(), stats)
            })
            .collect();

        AggregateStats {
            operators,
            total_time,
        }
    }
}

/// Aggregate a record stream in one go
pub fn aggregate<'a, I>(records: I) -> AggregateStats
where
    I: IntoIterator<Item = &'a OperatorTiming>,
{
    let mut aggregator = TimingAggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}

/// Final statistics for one operator type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorStats {
    pub count: usize,
    pub total_time: f64,
    pub avg_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    /// Share of the grand total across all operator types, 0-100
    pub percentage: f64,
}

/// Statistics for all operator types of a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub operators: HashMap<String, OperatorStats>,
    /// Sum of `total_time` over all operator types
    pub total_time: f64,
}

impl AggregateStats {
    pub fn get(&self, operator_type: &str) -> Option<&OperatorStats> {
        self.operators.get(operator_type)
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Entries ordered by total time, largest first; ties by operator type
    pub fn sorted_by_total(&self) -> Vec<(&str, &OperatorStats)> {
        let mut entries: Vec<(&str, &OperatorStats)> = self
            .operators
            .iter()
            .map(|(operator_type, stats)| (operator_type.as_str(), stats))
            .collect();
        entries.sort_by(|a, b| {
            OrderedFloat(b.1.total_time)
                .cmp(&OrderedFloat(a.1.total_time))
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(items: &[(&str, f64)]) -> Vec<OperatorTiming> {
        items
            .iter()
            .map(|(op, t)| OperatorTiming::new(*op, *t))
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_basic_statistics() {
        let stats = aggregate(&records(&[("Scan", 1.0), ("Scan", 3.0), ("Join", 2.0)]));

        let scan = stats.get("Scan").unwrap();
        assert_eq!(scan.count, 2);
        assert_close(scan.total_time, 4.0);
        assert_close(scan.avg_time, 2.0);
        assert_close(scan.min_time, 1.0);
        assert_close(scan.max_time, 3.0);
        assert_close(scan.percentage, 200.0 / 3.0);

        let join = stats.get("Join").unwrap();
        assert_eq!(join.count, 1);
        assert_close(join.total_time, 2.0);
        assert_close(join.percentage, 100.0 / 3.0);

        assert_close(stats.total_time, 6.0);
        let share: f64 = stats.operators.values().map(|s| s.percentage).sum();
        assert_close(share, 100.0);
    }

    #[test]
    fn test_empty_input() {
        let stats = TimingAggregator::new().finish();
        assert!(stats.is_empty());
        assert_eq!(stats.total_time, 0.0);
        assert!(stats.sorted_by_total().is_empty());
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let all = records(&[("A", 0.5), ("B", 1.0), ("A", 2.5), ("C", 0.1), ("B", 0.2)]);

        let mut left = TimingAggregator::new();
        left.extend(&all[..2]);
        let mut right = TimingAggregator::new();
        right.extend(&all[2..]);

        let merged = left.merged(right).finish();
        let single = aggregate(&all);
        assert_eq!(merged.operators.len(), 3);
        for (op, expected) in &single.operators {
            let got = merged.get(op).unwrap();
            assert_eq!(got.count, expected.count);
            assert_close(got.total_time, expected.total_time);
            assert_close(got.min_time, expected.min_time);
            assert_close(got.max_time, expected.max_time);
            assert_close(got.percentage, expected.percentage);
        }
        assert_close(merged.get("B").unwrap().min_time, 0.2);
    }

    #[test]
    fn test_sorted_by_total() {
        let stats = aggregate(&records(&[("b", 1.0), ("a", 1.0), ("c", 5.0)]));
        let order: Vec<&str> = stats.sorted_by_total().into_iter().map(|(op, _)| op).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
