//! Console reports

use super::aggregate::AggregateStats;
use super::compare::ComparisonReport;
use super::dataset::DatasetAnalysis;
use std::fmt::Write;

const RULE_WIDTH: usize = 110;

/// Per-operator table sorted by total time
pub fn render_operator_stats(analysis: &DatasetAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nQueries Analyzed: {}", analysis.query_count);
    if analysis.skipped_queries > 0 {
        let _ = writeln!(out, "Queries Skipped: {}", analysis.skipped_queries);
    }
    let _ = writeln!(
        out,
        "Total Time Across All Operators: {:.6} seconds",
        analysis.total_time()
    );
    out.push_str(&render_stats_table(&analysis.stats));
    out
}

pub fn render_stats_table(stats: &AggregateStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<30} {:<12} {:<12} {:<12} {:<12} {:<8} {:<8}",
        "Operator Type", "Total (s)", "Avg (s)", "Min (s)", "Max (s)", "Count", "%"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for (operator, stat) in stats.sorted_by_total() {
        let _ = writeln!(
            out,
            "{:<30} {:<12.6} {:<12.6} {:<12.6} {:<12.6} {:<8} {:<8.2}",
            operator,
            stat.total_time,
            stat.avg_time,
            stat.min_time,
            stat.max_time,
            stat.count,
            stat.percentage
        );
    }
    out
}

/// Summary totals and the `top_n` operators with the largest finite slowdown
pub fn render_comparison(
    dbms: &str,
    baseline_label: &str,
    comparison_label: &str,
    report: &ComparisonReport,
    top_n: usize,
) -> String {
    let mut out = String::new();
    let banner = "=".repeat(80);
    let _ = writeln!(out, "\n{}", banner);
    let _ = writeln!(out, "OPERATOR PERFORMANCE COMPARISON: {}", dbms.to_uppercase());
    let _ = writeln!(out, "{} (Baseline) vs {}", baseline_label, comparison_label);
    let _ = writeln!(out, "{}\n", banner);

    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "Total time {}: {:.6}s", baseline_label, report.baseline_total);
    let _ = writeln!(out, "Total time {}: {:.6}s", comparison_label, report.comparison_total);
    let _ = writeln!(
        out,
        "Overall slowdown: {:.2}x ({:+.2}%)",
        report.overall_slowdown,
        report.overall_pct_change()
    );

    let _ = writeln!(
        out,
        "\nTop {} Most Impacted Operators (by slowdown factor):",
        top_n
    );
    let top = report.top_impacted(top_n);
    if top.is_empty() {
        let _ = writeln!(out, "  (no operator present in both datasets)");
    }
    for (rank, record) in top.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}: {:.2}x slower ({:.6}s -> {:.6}s)",
            rank + 1,
            record.operator,
            record.slowdown_factor,
            record.baseline_avg,
            record.comparison_avg
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, compare};
    use crate::plan::OperatorTiming;

    fn stats(items: &[(&str, f64)]) -> AggregateStats {
        let records: Vec<OperatorTiming> = items
            .iter()
            .map(|(op, t)| OperatorTiming::new(*op, *t))
            .collect();
        aggregate(&records)
    }

    #[test]
    fn test_stats_table_order() {
        let table = render_stats_table(&stats(&[("Scan", 1.0), ("Scan", 3.0), ("Join", 2.0)]));
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Operator Type"));
        assert!(lines[2].starts_with("Scan"));
        assert!(lines[2].contains("4.000000"));
        assert!(lines[2].contains("66.67"));
        assert!(lines[3].starts_with("Join"));
    }

    #[test]
    fn test_comparison_summary() {
        let report = compare(
            &stats(&[("Scan", 1.0), ("Join", 1.0)]),
            &stats(&[("Scan", 2.0), ("Join", 1.5), ("Sort", 0.5)]),
        );
        let text = render_comparison("duckdb", "TPCH_SF1", "TPCH_UUID_SF1", &report, 10);
        assert!(text.contains("OPERATOR PERFORMANCE COMPARISON: DUCKDB"));
        assert!(text.contains("Overall slowdown: 2.00x (+100.00%)"));
        assert!(text.contains("  1. Scan: 2.00x slower (1.000000s -> 2.000000s)"));
        assert!(text.contains("  2. Join: 1.50x slower"));
        assert!(!text.contains("Sort:"));
    }

    #[test]
    fn test_operator_stats_header() {
        let analysis = DatasetAnalysis {
            dbms: Some("duckdb".to_string()),
            query_count: 22,
            skipped_queries: 1,
            node_issues: 0,
            stats: stats(&[("Scan", 0.5)]),
        };
        let text = render_operator_stats(&analysis);
        assert!(text.contains("Queries Analyzed: 22"));
        assert!(text.contains("Queries Skipped: 1"));
        assert!(text.contains("Total Time Across All Operators: 0.500000 seconds"));
    }
}
