use std::{
    collections::{BTreeMap, HashSet},
    fs::{self, File},
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, bail};
use futures::{Stream, StreamExt, stream};
use md5::{Digest, Md5};
use time::OffsetDateTime;

use crate::{
    progress::ProgressSink,
    storage::{BlobDescriptor, BlobStore},
};

/// An in-memory container.
///
/// Listing is split into pages of `page_size` blobs to mimic the service.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, (BlobDescriptor, Vec<u8>)>>,
    failing: HashSet<String>,
    page_size: usize,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self {
            blobs: Mutex::default(),
            failing: HashSet::new(),
            page_size: 2,
        }
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a blob with the given content and modification time.
    pub fn with_blob(self, path: &str, content: &[u8], last_modified: OffsetDateTime) -> Self {
        self.insert(path, content.to_vec(), last_modified);
        self
    }

    /// Makes every transfer and delete of `path` fail.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).map(|(_, content)| content.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn insert(&self, path: &str, content: Vec<u8>, last_modified: OffsetDateTime) {
        let descriptor = BlobDescriptor {
            path: path.to_string(),
            last_modified,
            content_length: content.len() as u64,
            content_hash: Some(Md5::digest(&content).to_vec()),
        };
        self.lock().insert(path.to_string(), (descriptor, content));
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, (BlobDescriptor, Vec<u8>)>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failing(&self, path: &str) -> anyhow::Result<()> {
        if self.failing.contains(path) {
            bail!("connection reset while transferring {path}");
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn list_blobs<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Stream<Item = anyhow::Result<BlobDescriptor>> + 'a {
        let matching: Vec<_> = self
            .lock()
            .values()
            .filter(|(blob, _)| prefix.is_none_or(|prefix| blob.path.starts_with(prefix)))
            .map(|(blob, _)| blob.clone())
            .collect();
        let pages: Vec<Vec<_>> = matching
            .chunks(self.page_size)
            .map(<[_]>::to_vec)
            .collect();

        stream::iter(pages).flat_map(|page| stream::iter(page.into_iter().map(Ok)))
    }

    async fn blob_metadata(&self, path: &str) -> anyhow::Result<Option<BlobDescriptor>> {
        Ok(self.lock().get(path).map(|(blob, _)| blob.clone()))
    }

    async fn upload(
        &self,
        local_path: &Path,
        blob_path: &str,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()> {
        self.check_failing(blob_path)?;
        let content = fs::read(local_path)?;
        progress.start(content.len() as u64);
        progress.advance(content.len() as u64);
        self.insert(blob_path, content, OffsetDateTime::now_utc());
        progress.finish();
        Ok(())
    }

    async fn download(
        &self,
        blob_path: &str,
        local_path: &Path,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()> {
        self.check_failing(blob_path)?;
        let (blob, content) = self
            .lock()
            .get(blob_path)
            .cloned()
            .with_context(|| format!("blob not found: {blob_path}"))?;
        progress.start(blob.content_length);
        fs::write(local_path, &content)?;
        File::options()
            .write(true)
            .open(local_path)?
            .set_modified(blob.last_modified.into())?;
        progress.advance(blob.content_length);
        progress.finish();
        Ok(())
    }

    async fn delete(&self, blob_path: &str) -> anyhow::Result<()> {
        self.check_failing(blob_path)?;
        self.lock()
            .remove(blob_path)
            .map(drop)
            .with_context(|| format!("blob not found: {blob_path}"))
    }
}
