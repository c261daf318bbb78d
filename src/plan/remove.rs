use futures::{Stream, TryStreamExt, future::Either, stream};

use crate::{
    error::{Error, Result},
    remote::RemoteSpecifier,
    storage::BlobStore,
};

/// Streams the blobs a removal refers to.
///
/// With `prefix`, every blob whose key starts with the blob path is removed,
/// page by page as the listing arrives. Otherwise only the blob path itself
/// is, whether it exists or not.
pub fn plan_remove<'a, S>(
    store: &'a S,
    remote: &'a RemoteSpecifier,
    prefix: bool,
) -> Result<impl Stream<Item = anyhow::Result<String>> + 'a>
where
    S: BlobStore,
{
    let blob_path = remote.blob_path().ok_or(Error::BlobPathRequired)?;
    if !prefix {
        let single = stream::iter([anyhow::Ok(blob_path.to_string())]);
        return Ok(Either::Right(single));
    }

    Ok(Either::Left(
        store.list_blobs(Some(blob_path)).map_ok(|blob| blob.path),
    ))
}
