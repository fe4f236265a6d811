/// Recursive directory sizing that reads through the report cache.
///
/// [`Walker::walk`] produces the [`Report`] for one directory: every
/// immediate entry with its size (files: own length, directories: total of
/// their own report), sorted descending, ratios filled in. Each directory
/// level is cached under its absolute path, so a later walk of any parent
/// or child within the TTL reuses the stored level.
///
/// Listing failures never reach the caller. They are logged and the
/// affected directory shrinks to an empty, zero-size report; inside a parent
/// it shows up as an entry flagged `inaccessible`.
///
/// Sibling subdirectories are walked in parallel on the rayon pool. Result
/// order depends only on sizes and names, never on scheduling.
pub mod reader;

pub use reader::{DirItem, DirReader, FsReader};

use crate::cache::TtlCache;
use crate::error::WalkError;
use crate::model::{Entry, Report};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Sizes directory trees using an injected reader and cache.
#[derive(Clone)]
pub struct Walker {
    reader: Arc<dyn DirReader>,
    cache: Arc<TtlCache>,
}

impl Walker {
    pub fn new(reader: Arc<dyn DirReader>, cache: Arc<TtlCache>) -> Self {
        Self { reader, cache }
    }

    /// The cache this walker reads through.
    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    /// Walk `base/sub` and return its report.
    ///
    /// Never fails: an unreadable directory yields an empty report, which
    /// is not cached.
    pub fn walk(&self, base: &Path, sub: &Path) -> Arc<Report> {
        let path = resolve(base, sub);
        let start = Instant::now();

        match self.scan(&path) {
            Ok(report) => {
                debug!(
                    path = %path.display(),
                    entries = report.len(),
                    total = report.total(),
                    elapsed = ?start.elapsed(),
                    "walk finished"
                );
                report
            }
            Err(err) => {
                warn!(error = %err, "directory unreadable, reporting it as empty");
                Arc::new(Report::default())
            }
        }
    }

    fn scan(&self, path: &Path) -> Result<Arc<Report>, WalkError> {
        if let Some(hit) = self.cache.get(path) {
            debug!(path = %path.display(), "cache hit");
            return Ok(hit);
        }

        let mut items = self.reader.read_dir(path)?;
        // Readers may list in any order; names make ties reproducible.
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.file_name.cmp(&b.file_name)));

        let entries: Vec<Entry> = items
            .into_par_iter()
            .map(|item| {
                if !item.is_dir {
                    return Entry::new_file(item.name, item.size);
                }
                let child_path = path.join(&item.file_name);
                match self.scan(&child_path) {
                    Ok(children) => Entry::new_dir(item.name, children),
                    Err(err) => {
                        warn!(error = %err, "skipping unreadable subdirectory");
                        Entry::new_inaccessible(item.name)
                    }
                }
            })
            .collect();

        let report = Arc::new(Report::new(entries));
        self.cache.set(path, report.clone());
        Ok(report)
    }
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker").field("cache", &self.cache).finish()
    }
}

/// Join `base` and `sub` into an absolute cache key.
fn resolve(base: &Path, sub: &Path) -> PathBuf {
    let joined = if sub.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(sub)
    };
    std::path::absolute(&joined).unwrap_or(joined)
}
