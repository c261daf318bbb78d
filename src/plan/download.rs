use std::{
    collections::HashSet,
    fs::create_dir_all,
    path::{Component, Path, PathBuf},
    pin::pin,
};

use futures::TryStreamExt;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    freshness::is_local_fresher_or_equal,
    plan::DownloadPlan,
    remote::RemoteSpecifier,
    storage::BlobStore,
};

/// Which blobs a download refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DownloadMode {
    /// Exactly the blob named by the remote path.
    #[default]
    Single,

    /// Every blob whose key starts with the remote path.
    Prefix,
}

/// Options for planning a download.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DownloadOptions {
    pub mode: DownloadMode,

    /// Skip blobs whose local destination already exists.
    pub skip_existing: bool,

    /// Skip blobs whose local destination is fresher or equal.
    pub sync: bool,
}

/// Pairs each blob to download with its local destination.
///
/// Missing parent directories of every planned destination are created once
/// the whole plan is known to be valid.
pub async fn plan_download<S>(
    store: &S,
    remote: &RemoteSpecifier,
    destination: &Path,
    options: DownloadOptions,
) -> Result<DownloadPlan>
where
    S: BlobStore,
{
    let blob_path = remote.blob_path().ok_or(Error::BlobPathRequired)?;
    let plan = match options.mode {
        DownloadMode::Single => plan_single(store, blob_path, destination, options).await?,
        DownloadMode::Prefix => plan_prefix(store, blob_path, destination, options).await?,
    };

    for (_, local_path) in plan.iter() {
        if let Some(parent) = local_path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }
    }

    Ok(plan)
}

async fn plan_single<S>(
    store: &S,
    blob_path: &str,
    destination: &Path,
    options: DownloadOptions,
) -> Result<DownloadPlan>
where
    S: BlobStore,
{
    // An existing directory receives the blob under its own name
    let local_path = if destination.is_dir() {
        let name = blob_path.rsplit('/').next().unwrap_or(blob_path);
        let name = relative_local_path(blob_path, name)?.ok_or_else(|| Error::UnsafeBlobPath {
            path: blob_path.to_string(),
        })?;
        destination.join(name)
    } else {
        destination.to_path_buf()
    };

    let mut plan = DownloadPlan::new();
    if local_path.exists() {
        if options.skip_existing {
            debug!(path = %local_path.display(), "skipping existing file");
            return Ok(plan);
        }

        if options.sync
            && let Some(blob) = store.blob_metadata(blob_path).await?
            && is_local_fresher_or_equal(&blob, &local_path)?
        {
            debug!(path = %local_path.display(), "skipping unchanged file");
            return Ok(plan);
        }
    }

    plan.try_push(blob_path.to_string(), local_path)?;
    Ok(plan)
}

async fn plan_prefix<S>(
    store: &S,
    blob_path: &str,
    destination: &Path,
    options: DownloadOptions,
) -> Result<DownloadPlan>
where
    S: BlobStore,
{
    // `dir/` keeps everything below `dir/`; `dir/file` keeps the path below
    // `dir`, so `file-1.txt` and `file-2.txt` both match
    let common_prefix = if blob_path.ends_with('/') {
        blob_path
    } else {
        blob_path.rfind('/').map_or("", |end| &blob_path[..end])
    };
    trace!(prefix = blob_path, common_prefix, "planning prefix download");

    let mut resolved = HashSet::new();
    let mut plan = DownloadPlan::new();
    let mut blobs = pin!(store.list_blobs(Some(blob_path)));
    while let Some(blob) = blobs.try_next().await? {
        let relative = blob.path.strip_prefix(common_prefix).unwrap_or(&blob.path);
        let Some(relative) = relative_local_path(&blob.path, relative)? else {
            // Directory marker such as `dir/` itself
            trace!(path = %blob.path, "skipping blob without a file name");
            continue;
        };
        let local_path = destination.join(&relative);

        // Colliding keys make the whole plan ambiguous, even if one of them
        // would be skipped below
        if !resolved.insert(relative) {
            return Err(Error::DuplicateDestination { path: local_path });
        }

        if local_path.exists() {
            if options.skip_existing {
                debug!(path = %local_path.display(), "skipping existing file");
                continue;
            }

            if options.sync && is_local_fresher_or_equal(&blob, &local_path)? {
                debug!(path = %local_path.display(), "skipping unchanged file");
                continue;
            }
        }

        plan.try_push(blob.path, local_path)?;
    }

    Ok(plan)
}

/// Maps the `/`-separated tail of a blob key onto a relative local path.
///
/// Empty segments are dropped, and `None` means nothing is left. Segments that
/// aren't plain names (`..`, `.`, or a root or drive on Windows) fail, as they
/// could point outside the destination or alias another key.
fn relative_local_path(key: &str, tail: &str) -> Result<Option<PathBuf>> {
    let mut path = PathBuf::new();
    for part in tail.split('/').filter(|part| !part.is_empty()) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            _ => {
                return Err(Error::UnsafeBlobPath {
                    path: key.to_string(),
                });
            }
        }
    }

    Ok((!path.as_os_str().is_empty()).then_some(path))
}
