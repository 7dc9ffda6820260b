//! Plan tree walker
//!
//! Extracts one [`OperatorTiming`] per plan node that reports a positive
//! operator time. The vendor descriptor lives in the node attribute
//! `system_representation`, either as a list of objects or as a string holding
//! that list in JSON; only the first descriptor is authoritative.
//!
//! A malformed node yields a [`ParseIssue`]. The walker records the issue,
//! drops that node's contribution and keeps descending, so one odd node never
//! costs the rest of the plan.

use super::node::PlanNode;
use crate::common::constants::{
    OPERATOR_NAME_FIELD, OPERATOR_TIMING_FIELD, OPERATOR_TYPE_FIELD, SYSTEM_REPRESENTATION_ATTR,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;

/// Time spent in one operator, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTiming {
    /// `"<vendor type> (<node label>)"`
    pub operator_type: String,
    pub timing: f64,
}

impl OperatorTiming {
    pub fn new(operator_type: impl Into<String>, timing: f64) -> Self {
        Self {
            operator_type: operator_type.into(),
            timing,
        }
    }
}

/// Why a node contributed no timing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseIssue {
    #[error("node attributes are not a mapping")]
    AttributesNotMapping,

    #[error("system representation is not valid JSON: {0}")]
    InvalidRepresentation(String),

    #[error("system representation has unexpected shape: {0}")]
    RepresentationShape(&'static str),

    #[error("field '{field}' has unexpected type: {found}")]
    FieldType { field: &'static str, found: String },
}

/// Everything a single walk produced
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Timing records in pre-order
    pub records: Vec<OperatorTiming>,
    pub nodes_visited: usize,
    /// Nodes skipped because of a malformed descriptor
    pub issues: Vec<ParseIssue>,
}

/// Timing contributed by one node, ignoring its children
pub fn extract_node_timing(node: PlanNode<'_>) -> Result<Option<OperatorTiming>, ParseIssue> {
    let attrs = match node.raw_attrs() {
        None => return Ok(None),
        Some(raw) => raw.as_object().ok_or(ParseIssue::AttributesNotMapping)?,
    };

    let representation = match attrs.get(SYSTEM_REPRESENTATION_ATTR) {
        None => return Ok(None),
        Some(Value::String(text)) => Cow::Owned(
            serde_json::from_str::<Value>(text)
                .map_err(|e| ParseIssue::InvalidRepresentation(e.to_string()))?,
        ),
        Some(structured) => Cow::Borrowed(structured),
    };

    let descriptors = representation
        .as_array()
        .ok_or(ParseIssue::RepresentationShape("expected a list of operators"))?;
    let descriptor = match descriptors.first() {
        None => return Ok(None),
        Some(first) => first
            .as_object()
            .ok_or(ParseIssue::RepresentationShape("operator entry is not a mapping"))?,
    };

    let label = node.label();
    let vendor_type = match string_field(descriptor, OPERATOR_TYPE_FIELD)? {
        Some(operator_type) => operator_type,
        None => string_field(descriptor, OPERATOR_NAME_FIELD)?.unwrap_or(label),
    };

    let timing = match descriptor.get(OPERATOR_TIMING_FIELD) {
        None => 0.0,
        Some(value) => value.as_f64().ok_or_else(|| ParseIssue::FieldType {
            field: OPERATOR_TIMING_FIELD,
            found: json_kind(value).to_string(),
        })?,
    };

    // Zero or negative means "not measured".
    if timing > 0.0 {
        Ok(Some(OperatorTiming::new(
            format!("{} ({})", vendor_type, label),
            timing,
        )))
    } else {
        Ok(None)
    }
}

/// Walk the tree rooted at `root` in pre-order
pub fn walk(root: PlanNode<'_>) -> WalkOutcome {
    fn visit(node: PlanNode<'_>, outcome: &mut WalkOutcome) {
        outcome.nodes_visited += 1;
        match extract_node_timing(node) {
            Ok(Some(record)) => outcome.records.push(record),
            Ok(None) => {}
            Err(issue) => outcome.issues.push(issue),
        }
        for child in node.children() {
            visit(child, outcome);
        }
    }

    let mut outcome = WalkOutcome::default();
    visit(root, &mut outcome);
    outcome
}

/// Timing records of the tree rooted at `root`
pub fn walk_timings(root: PlanNode<'_>) -> Vec<OperatorTiming> {
    walk(root).records
}

fn string_field<'a>(
    descriptor: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ParseIssue> {
    match descriptor.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ParseIssue::FieldType {
            field,
            found: json_kind(other).to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
