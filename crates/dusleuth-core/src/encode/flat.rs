/// Flat parallel-array encoding for sunburst/icicle style charts.
///
/// Every node of the tree, not just the top level, becomes one index in
/// four aligned arrays. Ids are `/`-joined paths relative to the walked
/// directory and are sorted ascending, so the same tree always encodes to
/// the same arrays.
use crate::model::Report;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatTree {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    /// Id of the parent, or `""` for top-level entries.
    pub parents: Vec<String>,
    /// File size, or 0 for directories (the chart sums their children).
    pub values: Vec<u64>,
}

impl FlatTree {
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

struct FlatNode {
    id: String,
    label: String,
    parent: String,
    value: u64,
}

/// Flatten the whole report into aligned arrays.
pub fn flatten(report: &Report) -> FlatTree {
    let mut nodes = Vec::new();
    collect(report, "", &mut nodes);
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let mut flat = FlatTree {
        ids: Vec::with_capacity(nodes.len()),
        labels: Vec::with_capacity(nodes.len()),
        parents: Vec::with_capacity(nodes.len()),
        values: Vec::with_capacity(nodes.len()),
    };
    for node in nodes {
        flat.ids.push(node.id);
        flat.labels.push(node.label);
        flat.parents.push(node.parent);
        flat.values.push(node.value);
    }
    flat
}

fn collect(report: &Report, parent: &str, out: &mut Vec<FlatNode>) {
    for entry in report {
        let id = if parent.is_empty() {
            entry.name.to_string()
        } else {
            format!("{parent}/{}", entry.name)
        };

        if let Some(children) = &entry.children {
            collect(children, &id, out);
        }

        out.push(FlatNode {
            label: entry.name.to_string(),
            parent: parent.to_string(),
            value: if entry.is_dir { 0 } else { entry.size },
            id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn fixture() -> Report {
        let c = Arc::new(Report::new(vec![Entry::new_file("d", 4)]));
        Report::new(vec![
            Entry::new_file("a", 2),
            Entry::new_file("b", 3),
            Entry::new_dir("c", c),
            Entry::new_dir("emptyDir", Arc::new(Report::default())),
        ])
    }

    #[test]
    fn fixture_arrays() {
        let flat = flatten(&fixture());

        assert_eq!(flat.ids, ["a", "b", "c", "c/d", "emptyDir"]);
        assert_eq!(flat.labels, ["a", "b", "c", "d", "emptyDir"]);
        assert_eq!(flat.parents, ["", "", "", "c", ""]);
        assert_eq!(flat.values, [2, 3, 0, 4, 0]);
    }

    /// Deeper trees keep the arrays aligned and every parent resolvable.
    #[test]
    fn parents_reference_existing_ids() {
        let deep = Arc::new(Report::new(vec![
            Entry::new_file("z.bin", 9),
            Entry::new_file("y.txt", 1),
        ]));
        let mid = Arc::new(Report::new(vec![
            Entry::new_dir("deep", deep),
            Entry::new_file("m", 3),
        ]));
        let report = Report::new(vec![Entry::new_dir("top", mid), Entry::new_file("t", 20)]);

        let flat = flatten(&report);
        assert_eq!(flat.len(), 6);
        assert_eq!(flat.labels.len(), flat.len());
        assert_eq!(flat.parents.len(), flat.len());
        assert_eq!(flat.values.len(), flat.len());

        let mut sorted = flat.ids.clone();
        sorted.sort();
        assert_eq!(flat.ids, sorted);

        let ids: HashSet<&str> = flat.ids.iter().map(String::as_str).collect();
        for parent in flat.parents.iter().filter(|p| !p.is_empty()) {
            assert!(ids.contains(parent.as_str()), "dangling parent {parent}");
        }
        let i = flat.ids.iter().position(|id| id == "top/deep/z.bin").unwrap();
        assert_eq!(flat.parents[i], "top/deep");
        assert_eq!(flat.labels[i], "z.bin");
        assert_eq!(flat.values[i], 9);
    }

    #[test]
    fn empty_report_is_empty() {
        assert!(flatten(&Report::default()).is_empty());
    }
}
