//! Operator statistics for one result file
//!
//! Each query's plan is parsed and walked on its own; the per-query results
//! are aggregated per worker and merged, so the outcome does not depend on
//! the number of threads.

use super::aggregate::{AggregateStats, TimingAggregator};
use crate::common::error::{KeyBenchError, KeyBenchResult};
use crate::config::ParallelContext;
use crate::plan::{parse_query_plan, walk, PlanNode, PlanRow, PlanSource, WalkOutcome};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Statistics of one dataset, optionally restricted to one DBMS
#[derive(Debug, Clone, Serialize)]
pub struct DatasetAnalysis {
    pub dbms: Option<String>,
    /// Queries whose plan was walked
    pub query_count: usize,
    /// Queries with an empty or unparsable plan payload
    pub skipped_queries: usize,
    /// Plan nodes dropped because of malformed descriptors
    pub node_issues: usize,
    pub stats: AggregateStats,
}

impl DatasetAnalysis {
    pub fn total_time(&self) -> f64 {
        self.stats.total_time
    }
}

/// Walk the plan of one result row
pub fn query_timings(row: &PlanRow) -> KeyBenchResult<WalkOutcome> {
    if row.plan.trim().is_empty() {
        return Err(KeyBenchError::Parse("empty plan payload".to_string()));
    }
    let plan = parse_query_plan(&row.plan)?;
    Ok(walk(PlanNode::new(&plan)))
}

#[derive(Debug, Default)]
struct QueryTally {
    aggregator: TimingAggregator,
    query_count: usize,
    skipped_queries: usize,
    node_issues: usize,
}

impl QueryTally {
    fn absorb(mut self, row: &PlanRow) -> Self {
        match query_timings(row) {
            Ok(outcome) => {
                self.aggregator.extend(&outcome.records);
                self.node_issues += outcome.issues.len();
                self.query_count += 1;
            }
            Err(e) => {
                debug!("Skipping {} query {}: {}", row.dbms, row.query, e);
                self.skipped_queries += 1;
            }
        }
        self
    }

    fn merge(mut self, other: QueryTally) -> Self {
        self.aggregator.merge(other.aggregator);
        self.query_count += other.query_count;
        self.skipped_queries += other.skipped_queries;
        self.node_issues += other.node_issues;
        self
    }
}

/// Aggregate operator timings of every successful query in `source`
pub fn analyze_dataset(
    source: &PlanSource,
    dbms: Option<&str>,
    ctx: &ParallelContext,
) -> KeyBenchResult<DatasetAnalysis> {
    let rows: Vec<&PlanRow> = source.rows_for(dbms).collect();

    let tally = if ctx.parallel_enabled && rows.len() > 1 {
        ctx.install(|| {
            rows.par_iter()
                .fold(QueryTally::default, |tally, row| tally.absorb(row))
                .reduce(QueryTally::default, QueryTally::merge)
        })?
    } else {
        rows.iter()
            .fold(QueryTally::default(), |tally, row| tally.absorb(row))
    };

    if tally.skipped_queries > 0 {
        warn!(
            "{}: skipped {} queries with unusable plans",
            source.origin().display(),
            tally.skipped_queries
        );
    }
    info!(
        "{}: {} queries, {} operator types{}",
        source.origin().display(),
        tally.query_count,
        tally.aggregator.len(),
        dbms.map(|name| format!(" ({})", name)).unwrap_or_default()
    );

    Ok(DatasetAnalysis {
        dbms: dbms.map(str::to_string),
        query_count: tally.query_count,
        skipped_queries: tally.skipped_queries,
        node_issues: tally.node_issues,
        stats: tally.aggregator.finish(),
    })
}
