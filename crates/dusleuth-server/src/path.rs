/// Logical request paths.
///
/// Requests name directories as `/`-separated paths relative to the base
/// directory. They are normalised lexically: empty and `.` segments vanish,
/// `..` pops a segment but never climbs above `/`. A request can therefore
/// never reach outside the base directory.
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalPath {
    segments: Vec<String>,
}

impl LogicalPath {
    /// Normalise a raw `path` query value; absent or empty means `/`.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for segment in raw.unwrap_or("/").split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other.to_string()),
            }
        }
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The containing directory; the parent of `/` is `/`.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Filesystem subpath to join onto the base directory.
    pub fn relative(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_is_root() {
        assert!(LogicalPath::parse(None).is_root());
        assert!(LogicalPath::parse(Some("")).is_root());
        assert_eq!(LogicalPath::parse(Some("/")).to_string(), "/");
    }

    #[test]
    fn normalises_segments() {
        let path = LogicalPath::parse(Some("a//b/./c/"));
        assert_eq!(path.to_string(), "/a/b/c");
        assert_eq!(path.relative(), PathBuf::from("a").join("b").join("c"));
    }

    /// `..` can never escape the base directory.
    #[test]
    fn dot_dot_stops_at_root() {
        assert_eq!(LogicalPath::parse(Some("/a/../b")).to_string(), "/b");
        assert_eq!(LogicalPath::parse(Some("/../../etc")).to_string(), "/etc");
        assert!(LogicalPath::parse(Some("../..")).is_root());
    }

    #[test]
    fn parent_and_child() {
        let path = LogicalPath::parse(Some("/c/d"));
        assert_eq!(path.parent().to_string(), "/c");
        assert_eq!(path.parent().parent().to_string(), "/");
        assert_eq!(LogicalPath::default().parent().to_string(), "/");
        assert_eq!(LogicalPath::default().child("x").to_string(), "/x");
    }

    /// A backslash is an ordinary name character, so a child's display
    /// form parses back to the same single segment.
    #[test]
    fn child_round_trips_through_display() {
        let child = LogicalPath::default().child("a\\b");
        assert_eq!(child.to_string(), "/a\\b");

        let reparsed = LogicalPath::parse(Some(&child.to_string()));
        assert_eq!(reparsed, child);
        assert_eq!(reparsed.relative(), PathBuf::from("a\\b"));
    }

    #[test]
    fn root_relative_is_empty() {
        assert_eq!(LogicalPath::default().relative(), PathBuf::new());
    }
}
