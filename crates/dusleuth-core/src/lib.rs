/// DuSleuth Core: sizing engine, cache, and encoders.
///
/// This crate contains all business logic with zero HTTP dependencies.
/// It is reusable across frontends (the streaming server, the one-shot
/// stdout mode, tests).
///
/// # Modules
///
/// - [`model`]: Size-annotated report tree and size/percent formatting.
/// - [`cache`]: TTL-keyed store of previously computed reports.
/// - [`walker`]: Recursive directory sizing that reads through the cache.
/// - [`encode`]: Pure transforms from a report into output shapes.
/// - [`error`]: Listing failures raised (and absorbed) inside the walker.
pub mod cache;
pub mod encode;
pub mod error;
pub mod model;
pub mod walker;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use error::WalkError;
pub use model::{Entry, Report};
pub use walker::{DirItem, DirReader, FsReader, Walker};
