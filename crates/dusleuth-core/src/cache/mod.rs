/// TTL cache of computed reports, keyed by absolute directory path.
///
/// Every record lives for the same fixed time-to-live from the moment it
/// was inserted. Records are independent: a parent expiring does not touch
/// its children and vice versa. There is no manual invalidation.
///
/// The map sits behind a `parking_lot::RwLock` so many requests can read
/// concurrently. Reads and writes for the same key are not serialised
/// against each other, so two cold requests may both compute a level and
/// both store it; the last write wins.
pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::model::Report;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheRecord {
    report: Arc<Report>,
    inserted: Instant,
}

/// Shared, internally synchronised report cache.
pub struct TtlCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    records: RwLock<HashMap<PathBuf, CacheRecord>>,
}

impl TtlCache {
    /// Create an empty cache whose records expire `ttl` after insertion.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// The configured time-to-live.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the stored report for `key` if it has not expired.
    pub fn get(&self, key: &Path) -> Option<Arc<Report>> {
        let now = self.clock.now();
        let records = self.records.read();
        records
            .get(key)
            .filter(|record| !self.is_expired(record, now))
            .map(|record| record.report.clone())
    }

    /// Store `report` under `key`, replacing any previous record.
    pub fn set(&self, key: impl Into<PathBuf>, report: Arc<Report>) {
        let record = CacheRecord {
            report,
            inserted: self.clock.now(),
        };
        self.records.write().insert(key.into(), record);
    }

    /// Drop every expired record and return how many were removed.
    ///
    /// Expired records are already invisible to [`get`](Self::get); this
    /// only reclaims their memory.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| !self.is_expired(record, now));
        before - records.len()
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    #[inline]
    fn is_expired(&self, record: &CacheRecord, now: Instant) -> bool {
        now.saturating_duration_since(record.inserted) >= self.ttl
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("records", &self.len())
            .finish()
    }
}
