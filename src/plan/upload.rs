use std::path::{Path, PathBuf, is_separator};

use crate::{
    error::{Error, Result},
    plan::UploadPlan,
    remote::RemoteSpecifier,
};

/// Pairs each local file with the blob path it should be uploaded to.
///
/// A single file keeps its name when the remote denotes a directory (the
/// container root or a path ending with `/`), and is renamed to the remote path
/// otherwise. Multiple files always land under the remote path as a directory,
/// keeping their paths relative to the deepest directory they share.
pub fn plan_upload(local_paths: &[PathBuf], remote: &RemoteSpecifier) -> Result<UploadPlan> {
    let mut plan = UploadPlan::new();

    match local_paths {
        [] => {}
        [local_path] => {
            let blob_path = match remote.blob_path() {
                Some(blob_path) if !remote.is_directory() => blob_path.to_string(),
                directory => {
                    let name = file_name(local_path)?;
                    format!("{}{name}", directory.unwrap_or_default())
                }
            };
            plan.try_push(local_path.clone(), blob_path)?;
        }
        _ => {
            let paths: Vec<_> = local_paths
                .iter()
                .map(|path| utf8(path))
                .collect::<Result<_>>()?;
            let common = common_directory(&paths);
            let directory = match remote.blob_path() {
                Some(path) if path.ends_with('/') => path.to_string(),
                Some(path) => format!("{path}/"),
                None => String::new(),
            };

            for (local_path, path) in local_paths.iter().zip(&paths) {
                let relative = to_blob_separators(&path[common.len()..]);
                plan.try_push(local_path.clone(), format!("{directory}{relative}"))?;
            }
        }
    }

    Ok(plan)
}

/// The longest common directory of a set of paths.
///
/// This is the character-wise common prefix cut back to its last separator, so
/// `dir/file-1` and `dir/file-2` share `dir`, not `dir/file-`.
fn common_directory<'a>(paths: &[&'a str]) -> &'a str {
    let Some((first, rest)) = paths.split_first() else {
        return "";
    };

    let len = rest.iter().fold(first.len(), |len, path| {
        first
            .bytes()
            .zip(path.bytes())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count()
    });

    // Separators are ASCII, so cutting there is always on a char boundary
    first.as_bytes()[..len]
        .iter()
        .rposition(|&b| is_separator(char::from(b)))
        .map_or("", |end| &first[..end])
}

/// Joins the components of a relative local path with `/`.
fn to_blob_separators(relative: &str) -> String {
    relative
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| Error::UnsupportedLocalPath {
        path: path.to_path_buf(),
        reason: "path is not valid Unicode",
    })
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::UnsupportedLocalPath {
            path: path.to_path_buf(),
            reason: "path has no valid file name",
        })
}
