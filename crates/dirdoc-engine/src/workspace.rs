//! On-disk workspace of a batch session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Read-only list of the names as they were when the session started.
pub const ORIGINAL_FILE_NAME: &str = ".Original.dirdoc-batch";

/// The list the user edits.
pub const EDITABLE_FILE_NAME: &str = ".FileNames.dirdoc-batch";

/// A temporary directory holding the two name lists of one session.
///
/// The directory and its files are removed when the workspace is dropped.
#[derive(Debug)]
pub struct BatchWorkspace {
    dir: TempDir,
    original: Option<PathBuf>,
    editable: PathBuf,
}

impl BatchWorkspace {
    /// Create a workspace under `root`.
    ///
    /// With `names`, both lists are written with that content and the
    /// original list is made read-only. Without, only an empty editable
    /// list is written.
    pub fn create(root: &Path, names: Option<&str>) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("dirdoc-").tempdir_in(root)?;

        let editable = dir.path().join(EDITABLE_FILE_NAME);
        fs::write(&editable, names.unwrap_or_default())?;

        let original = match names {
            Some(names) => {
                let path = dir.path().join(ORIGINAL_FILE_NAME);
                fs::write(&path, names)?;
                let mut permissions = fs::metadata(&path)?.permissions();
                permissions.set_readonly(true);
                fs::set_permissions(&path, permissions)?;
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            dir,
            original,
            editable,
        })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The editable list; this path identifies the session's document.
    pub fn editable_path(&self) -> &Path {
        &self.editable
    }

    pub fn original_path(&self) -> Option<&Path> {
        self.original.as_deref()
    }

    /// Current content of the editable list.
    pub fn read_editable(&self) -> io::Result<String> {
        fs::read_to_string(&self.editable)
    }
}
