/// Row encoding: one display row per top-level entry.
///
/// Rows are what the table view and the stdout mode print: the entry's
/// name, its share of the level as a percentage string, and its humanized
/// size.
use crate::model::{format_percent, humanize_bytes, Report};
use serde::Serialize;
use std::io::{self, Write};

/// A single table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Basename of the entry.
    pub name: String,
    /// Share of the level, e.g. `"22.2%"`.
    pub percentage: String,
    /// Humanized size, e.g. `"4 B"`.
    pub size: String,
    pub is_dir: bool,
    pub inaccessible: bool,
}

/// Build one row per top-level entry, in report order.
pub fn rows(report: &Report) -> Vec<Row> {
    report
        .iter()
        .map(|entry| Row {
            name: entry.name.to_string(),
            percentage: format_percent(entry.ratio),
            size: humanize_bytes(entry.size),
            is_dir: entry.is_dir,
            inaccessible: entry.inaccessible,
        })
        .collect()
}

/// Write the plain-text listing used by the one-shot stdout mode:
/// `"{name} {percentage} {size}"`, one line per top-level entry.
pub fn write_lines<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    for row in rows(report) {
        writeln!(out, "{} {} {}", row.name, row.percentage, row.size)?;
    }
    Ok(())
}
