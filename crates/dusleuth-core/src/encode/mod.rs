/// Encoders: pure transforms of a finished report into output shapes.

pub mod flat;
pub mod nested;
pub mod rows;

pub use flat::{flatten, FlatTree};
pub use nested::{nested, TreeNode};
pub use rows::{rows, write_lines, Row};

use crate::model::Report;
use serde::Serialize;

/// Which chart payload a request wants next to its rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Chart {
    #[default]
    None,
    /// Nested `{name, value | children}` tree.
    Tree,
    /// Aligned `ids/labels/parents/values` arrays.
    Flat,
}

/// A computed chart payload, serialised as the bare inner shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChartPayload {
    Tree(TreeNode),
    Flat(FlatTree),
}

impl Chart {
    /// Build this chart for `report`; the nested tree's root is `root_name`.
    pub fn encode(self, report: &Report, root_name: &str) -> Option<ChartPayload> {
        match self {
            Chart::None => None,
            Chart::Tree => Some(ChartPayload::Tree(nested(report, root_name))),
            Chart::Flat => Some(ChartPayload::Flat(flatten(report))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    #[test]
    fn chart_selects_encoding() {
        let report = Report::new(vec![Entry::new_file("a", 1)]);

        assert_eq!(Chart::None.encode(&report, "/"), None);
        assert!(matches!(
            Chart::Tree.encode(&report, "/"),
            Some(ChartPayload::Tree(TreeNode { .. }))
        ));
        match Chart::Flat.encode(&report, "/") {
            Some(ChartPayload::Flat(flat)) => assert_eq!(flat.ids, ["a"]),
            other => panic!("expected flat payload, got {other:?}"),
        }
    }
}
