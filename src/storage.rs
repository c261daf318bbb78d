mod azure;
mod config;
#[cfg(test)]
mod memory;

use std::path::Path;

use futures::Stream;
use time::OffsetDateTime;

use crate::progress::ProgressSink;

pub use azure::*;
pub use config::*;
#[cfg(test)]
pub use memory::*;

/// Metadata of a blob as reported by the storage service.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlobDescriptor {
    /// The full key of the blob within its container.
    pub path: String,

    /// When the blob was last modified.
    pub last_modified: OffsetDateTime,

    /// The size of the blob in bytes.
    pub content_length: u64,

    /// The MD5 digest of the blob content, when the service has one.
    pub content_hash: Option<Vec<u8>>,
}

/// Blob operations on a single container.
pub trait BlobStore {
    /// Lists every blob whose key starts with `prefix`.
    ///
    /// The listing is produced lazily, one service page at a time.
    fn list_blobs<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Stream<Item = anyhow::Result<BlobDescriptor>> + 'a;

    /// Gets the metadata of a single blob, or `None` if it doesn't exist.
    async fn blob_metadata(&self, path: &str) -> anyhow::Result<Option<BlobDescriptor>>;

    /// Uploads a local file to the given blob path.
    async fn upload(
        &self,
        local_path: &Path,
        blob_path: &str,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()>;

    /// Downloads a blob to the given local path.
    async fn download(
        &self,
        blob_path: &str,
        local_path: &Path,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()>;

    /// Deletes a blob.
    async fn delete(&self, blob_path: &str) -> anyhow::Result<()>;
}
