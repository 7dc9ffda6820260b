//! Benchmark result files as a plan source
//!
//! A result file is a CSV with one row per query execution. The columns used
//! here are `dbms`, `query`, `state` and `plan`; other columns are ignored.
//! Only rows whose `state` is `success` are kept. The `plan` cell holds the
//! vendor payload, a JSON object whose `queryPlan` field is the root node.

use crate::common::constants::{QUERY_PLAN_FIELD, SUCCESS_STATE};
use crate::common::error::{KeyBenchError, KeyBenchResult};
use crate::source_err;
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const DBMS_COLUMN: &str = "dbms";
const QUERY_COLUMN: &str = "query";
const STATE_COLUMN: &str = "state";
const PLAN_COLUMN: &str = "plan";

/// One successful query execution
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub dbms: String,
    pub query: String,
    /// Raw plan payload, possibly empty
    pub plan: String,
}

/// Successful rows of one result file
#[derive(Debug, Clone)]
pub struct PlanSource {
    origin: PathBuf,
    rows: Vec<PlanRow>,
}

struct ColumnIndexes {
    dbms: usize,
    query: usize,
    state: usize,
    plan: usize,
}

impl ColumnIndexes {
    fn from_headers(headers: &StringRecord, origin: &Path) -> KeyBenchResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| source_err!("{}: missing column '{}'", origin.display(), name))
        };
        Ok(Self {
            dbms: find(DBMS_COLUMN)?,
            query: find(QUERY_COLUMN)?,
            state: find(STATE_COLUMN)?,
            plan: find(PLAN_COLUMN)?,
        })
    }
}

impl PlanSource {
    /// Read a result file
    pub fn open<P: AsRef<Path>>(path: P) -> KeyBenchResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| source_err!("{}: {}", path.display(), e))?;
        Self::from_reader(file, path)
    }

    /// Read result rows from any reader; `origin` names it in errors
    pub fn from_reader<R: Read>(reader: R, origin: impl Into<PathBuf>) -> KeyBenchResult<Self> {
        let origin = origin.into();
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| source_err!("{}: failed to read headers: {}", origin.display(), e))?
            .clone();
        let columns = ColumnIndexes::from_headers(&headers, &origin)?;

        let mut rows = Vec::new();
        let mut total = 0usize;
        for (line, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| {
                source_err!("{}: bad record {}: {}", origin.display(), line + 1, e)
            })?;
            total += 1;
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
            if field(columns.state) != SUCCESS_STATE {
                continue;
            }
            rows.push(PlanRow {
                dbms: field(columns.dbms),
                query: field(columns.query),
                plan: field(columns.plan),
            });
        }

        debug!(
            "{}: {} of {} rows succeeded",
            origin.display(),
            rows.len(),
            total
        );
        Ok(Self { origin, rows })
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// All successful rows in file order
    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    /// Successful rows, optionally restricted to one DBMS
    pub fn rows_for<'a>(&'a self, dbms: Option<&'a str>) -> impl Iterator<Item = &'a PlanRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| dbms.map_or(true, |name| row.dbms == name))
    }

    /// Distinct DBMS names, sorted
    pub fn dbms_names(&self) -> BTreeSet<String> {
        self.rows.iter().map(|row| row.dbms.clone()).collect()
    }
}

/// Extract the root plan node from a plan payload
pub fn parse_query_plan(payload: &str) -> KeyBenchResult<Value> {
    let parsed: Value = serde_json::from_str(payload)
        .map_err(|e| KeyBenchError::Parse(format!("invalid plan payload: {}", e)))?;
    match parsed {
        Value::Object(mut envelope) => match envelope.remove(QUERY_PLAN_FIELD) {
            Some(Value::Null) | None => Err(KeyBenchError::Parse(format!(
                "plan payload has no '{}'",
                QUERY_PLAN_FIELD
            ))),
            Some(plan) => Ok(plan),
        },
        _ => Err(KeyBenchError::Parse(
            "plan payload is not a JSON object".to_string(),
        )),
    }
}
