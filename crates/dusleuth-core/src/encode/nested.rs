/// Nested-tree encoding for hierarchical charts.
///
/// Leaves (files and childless directories) carry `value`; internal nodes
/// carry `children` and leave their magnitude implicit in them.
use crate::model::{Entry, Report};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Encode the whole report under a root node called `root_name`.
pub fn nested(report: &Report, root_name: &str) -> TreeNode {
    TreeNode {
        name: root_name.to_string(),
        value: None,
        children: report.iter().map(encode_entry).collect(),
    }
}

fn encode_entry(entry: &Entry) -> TreeNode {
    let children = entry.child_entries();
    if children.is_empty() {
        TreeNode {
            name: entry.name.to_string(),
            value: Some(entry.size),
            children: Vec::new(),
        }
    } else {
        TreeNode {
            name: entry.name.to_string(),
            value: None,
            children: children.iter().map(encode_entry).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn nested_json_shape() {
        let c = Arc::new(Report::new(vec![Entry::new_file("d", 4)]));
        let report = Report::new(vec![
            Entry::new_file("a", 2),
            Entry::new_dir("c", c),
            Entry::new_dir("emptyDir", Arc::new(Report::default())),
        ]);

        let value = serde_json::to_value(nested(&report, "/")).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "/",
                "children": [
                    { "name": "c", "children": [ { "name": "d", "value": 4 } ] },
                    { "name": "a", "value": 2 },
                    { "name": "emptyDir", "value": 0 }
                ]
            })
        );
    }

    #[test]
    fn empty_report_has_bare_root() {
        let node = nested(&Report::default(), "/x");
        assert_eq!(serde_json::to_value(node).unwrap(), json!({ "name": "/x" }));
    }
}
