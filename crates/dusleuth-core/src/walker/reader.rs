/// Directory listing seam used by the walker.
///
/// The walker only needs one level at a time: names, whether each entry is
/// a directory, and its byte length. [`FsReader`] answers from the real
/// filesystem; tests plug in readers that fail, block, or count calls.
use crate::error::WalkError;
use compact_str::CompactString;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    /// Display name, lossily converted to UTF-8.
    pub name: CompactString,
    /// Name as stored on disk; used to build child paths.
    pub file_name: OsString,
    pub is_dir: bool,
    /// Byte length. Ignored for directories.
    pub size: u64,
}

impl DirItem {
    pub fn file(name: impl Into<CompactString>, size: u64) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(name.as_str()),
            name,
            is_dir: false,
            size,
        }
    }

    pub fn dir(name: impl Into<CompactString>) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(name.as_str()),
            name,
            is_dir: true,
            size: 0,
        }
    }
}

/// Lists the immediate children of a directory.
pub trait DirReader: Send + Sync {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirItem>, WalkError>;
}

/// Reads directories from the local filesystem.
///
/// Entry types come from `DirEntry::metadata`, which does not traverse
/// symlinks: a link to a directory is reported as a non-directory sized by
/// the link itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl DirReader for FsReader {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirItem>, WalkError> {
        let dir = fs::read_dir(path).map_err(|source| WalkError::DirectoryOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let list_error = |source| WalkError::DirectoryList {
            path: path.to_path_buf(),
            source,
        };

        let mut items = Vec::new();
        for entry in dir {
            let entry = entry.map_err(list_error)?;
            let metadata = match entry.metadata() {
                Ok(md) => md,
                // Removed between listing and stat.
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(list_error(err)),
            };

            let file_name = entry.file_name();
            items.push(DirItem {
                name: CompactString::new(file_name.to_string_lossy()),
                file_name,
                is_dir: metadata.is_dir(),
                size: metadata.len(),
            });
        }

        Ok(items)
    }
}
