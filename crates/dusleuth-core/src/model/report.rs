/// Size-annotated report tree.
///
/// A [`Report`] is one directory level: its immediate entries, sorted by
/// size descending, each carrying its share of the sibling total. Directory
/// entries own their child report behind an `Arc` so that a cached level can
/// be shared by every parent that embeds it without copying.
use compact_str::CompactString;
use std::sync::Arc;

/// A single file or directory inside a [`Report`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Path segment only (NOT the full path).
    /// Full relative paths are rebuilt on demand by the encoders.
    pub name: CompactString,

    /// Logical size in bytes.
    /// For directories this is the sum of the child report.
    pub size: u64,

    /// `size / sibling total`, or `0.0` when the sibling total is zero.
    pub ratio: f64,

    /// `true` if this entry represents a directory.
    pub is_dir: bool,

    /// Child report. `None` for files, possibly empty for directories.
    pub children: Option<Arc<Report>>,

    /// `true` if this directory could not be opened or listed.
    /// The entry stays in the report with size 0 so the gap is visible.
    pub inaccessible: bool,
}

impl Entry {
    /// Create a file entry with its own byte length.
    pub fn new_file(name: impl Into<CompactString>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            ratio: 0.0,
            is_dir: false,
            children: None,
            inaccessible: false,
        }
    }

    /// Create a directory entry whose size is the total of `children`.
    pub fn new_dir(name: impl Into<CompactString>, children: Arc<Report>) -> Self {
        Self {
            name: name.into(),
            size: children.total(),
            ratio: 0.0,
            is_dir: true,
            children: Some(children),
            inaccessible: false,
        }
    }

    /// Create a placeholder for a directory that could not be read.
    pub fn new_inaccessible(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            ratio: 0.0,
            is_dir: true,
            children: Some(Arc::new(Report::default())),
            inaccessible: true,
        }
    }

    /// Child entries, empty for files.
    pub fn child_entries(&self) -> &[Entry] {
        self.children.as_deref().map(Report::entries).unwrap_or(&[])
    }
}

/// An ordered group of sibling entries.
///
/// Invariants upheld by [`Report::new`]:
/// - entries are sorted non-increasing by size (ties keep input order);
/// - ratios of a non-empty group sum to 1.0, or are all zero if every
///   entry is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    /// Sort `entries` and compute ratios.
    pub fn new(mut entries: Vec<Entry>) -> Self {
        // Stable, so equal sizes keep the caller's listing order.
        entries.sort_by(|a, b| b.size.cmp(&a.size));

        let total: u64 = entries.iter().map(|e| e.size).sum();
        for entry in entries.iter_mut() {
            entry.ratio = if total > 0 {
                entry.size as f64 / total as f64
            } else {
                0.0
            };
        }

        Self { entries }
    }

    /// Sum of all entry sizes in this level.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
