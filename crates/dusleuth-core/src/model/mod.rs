/// Data model for DuSleuth reports.
///
/// Re-exports the report tree and the size/percent formatters.
pub mod report;
pub mod size;

pub use report::{Entry, Report};
pub use size::{format_percent, humanize_bytes};
