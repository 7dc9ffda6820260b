//! Read-only view over a vendor plan node
//!
//! Plan payloads differ between systems and versions, so nodes stay as
//! `serde_json::Value` and every accessor returns an absence signal instead
//! of failing on an unexpected shape.

use crate::common::constants::{
    NODE_ATTRS_FIELD, NODE_CHILDREN_FIELD, NODE_LABEL_FIELD, UNKNOWN_LABEL,
};
use serde_json::{Map, Value};
use std::fmt::Write;

/// Borrowed plan node
#[derive(Debug, Clone, Copy)]
pub struct PlanNode<'a> {
    value: &'a Value,
}

impl<'a> PlanNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Display label, `"Unknown"` when absent or not a string
    pub fn label(&self) -> &'a str {
        self.value
            .get(NODE_LABEL_FIELD)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Raw attribute bag, if the node has one
    pub fn raw_attrs(&self) -> Option<&'a Value> {
        self.value.get(NODE_ATTRS_FIELD)
    }

    /// Attribute bag when it is a mapping
    pub fn attrs(&self) -> Option<&'a Map<String, Value>> {
        self.raw_attrs().and_then(Value::as_object)
    }

    pub fn attr(&self, key: &str) -> Option<&'a Value> {
        self.attrs().and_then(|attrs| attrs.get(key))
    }

    /// Children in the given order; missing or malformed children read as a leaf
    pub fn children(&self) -> impl Iterator<Item = PlanNode<'a>> + 'a {
        let value: &'a Value = self.value;
        value
            .get(NODE_CHILDREN_FIELD)
            .and_then(Value::as_array)
            .map(|children| children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(PlanNode::new)
    }

    pub fn is_leaf(&self) -> bool {
        self.children().next().is_none()
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().map(|child| child.node_count()).sum::<usize>()
    }
}

/// Indented label tree, one node per line
pub fn render_plan_outline(root: PlanNode<'_>) -> String {
    fn visit(node: PlanNode<'_>, depth: usize, out: &mut String) {
        let _ = writeln!(out, "{}- {}", "  ".repeat(depth), node.label());
        for child in node.children() {
            visit(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    visit(root, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_tolerate_bad_shapes() {
        let value = json!({"_attrs": "not a map", "_children": {"x": 1}});
        let node = PlanNode::new(&value);
        assert_eq!(node.label(), "Unknown");
        assert!(node.raw_attrs().is_some());
        assert!(node.attrs().is_none());
        assert!(node.is_leaf());

        let scalar = json!(17);
        let node = PlanNode::new(&scalar);
        assert_eq!(node.label(), "Unknown");
        assert!(node.attr("anything").is_none());
        assert_eq!(node.node_count(), 1);
    }

    #[test]
    fn test_outline() {
        let value = json!({
            "_label": "Projection",
            "_children": [
                {"_label": "HashJoin", "_children": [{"_label": "TableScan"}, {"_label": "TableScan"}]},
            ]
        });
        let root = PlanNode::new(&value);
        assert_eq!(root.node_count(), 4);
        assert_eq!(
            render_plan_outline(root),
            "- Projection\n  - HashJoin\n    - TableScan\n    - TableScan\n"
        );
    }
}
