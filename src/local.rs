use std::{
    collections::HashSet,
    fs::symlink_metadata,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Expands the given paths into the list of files to upload.
///
/// Paths are canonicalized and de-duplicated, keeping their first occurrence.
/// Directories are walked in file name order, and only when `recursive` is
/// set. Symlinks are rejected wherever they are found.
pub fn collect_local_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut add = |path: PathBuf| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for path in paths {
        let metadata = match symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(Error::LocalPathNotFound { path: path.clone() });
            }
            Err(error) => return Err(error.into()),
        };

        if metadata.is_symlink() {
            return Err(unsupported_symlink(path));
        }

        let path = path.canonicalize()?;
        if metadata.is_file() {
            add(path);
        } else if metadata.is_dir() {
            if !recursive {
                return Err(Error::UnsupportedLocalPath {
                    path,
                    reason: "directories can only be uploaded with --recursive",
                });
            }

            for file in walk(&path)? {
                add(file);
            }
        } else {
            return Err(Error::UnsupportedLocalPath {
                path,
                reason: "not a regular file",
            });
        }
    }

    Ok(files)
}

/// Lists every file below a directory.
fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            return Err(unsupported_symlink(entry.path()));
        }

        if file_type.is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "walked directory");
    Ok(files)
}

fn unsupported_symlink(path: &Path) -> Error {
    Error::UnsupportedLocalPath {
        path: path.to_path_buf(),
        reason: "symlinks are not supported",
    }
}
