//! Constants used throughout KeyBench

/// Anchor epoch (milliseconds) for synthetic UUIDv7 timestamps (2023-11-14)
pub const UUID_V7_BASE_TS_MS: u64 = 1_700_000_000_000;

/// Mask for the 48-bit UUIDv7 timestamp field
pub const UUID_V7_TS_MASK: u64 = (1 << 48) - 1;

/// Mask that clears the sign bit of a 64-bit value
pub const INT63_MASK: u64 = (1 << 63) - 1;

/// Top-level field of a plan payload that holds the root plan node
pub const QUERY_PLAN_FIELD: &str = "queryPlan";

/// Plan node field names
pub const NODE_LABEL_FIELD: &str = "_label";
pub const NODE_ATTRS_FIELD: &str = "_attrs";
pub const NODE_CHILDREN_FIELD: &str = "_children";

/// Attribute holding the vendor operator descriptors (JSON-encoded list or list)
pub const SYSTEM_REPRESENTATION_ATTR: &str = "system_representation";

/// Fields of a vendor operator descriptor
pub const OPERATOR_TYPE_FIELD: &str = "operator_type";
pub const OPERATOR_NAME_FIELD: &str = "operator_name";
pub const OPERATOR_TIMING_FIELD: &str = "operator_timing";

/// Label used when a plan node carries none
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Result-file state marking a successful query run
pub const SUCCESS_STATE: &str = "success";

/// Default number of operators shown in the "most impacted" ranking
pub const DEFAULT_TOP_N: usize = 10;
