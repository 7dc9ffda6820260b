//! Query plans: node view, timing extraction and result-file source

pub mod node;
pub mod source;
pub mod walker;

pub use node::{render_plan_outline, PlanNode};
pub use source::{parse_query_plan, PlanRow, PlanSource};
pub use walker::{extract_node_timing, walk, walk_timings, OperatorTiming, ParseIssue, WalkOutcome};
