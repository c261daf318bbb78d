use std::{num::NonZeroUsize, ops::Range, path::Path, pin::pin};

use anyhow::Context as _;
use azure_core::{StatusCode, error::ErrorKind};
use azure_storage::StorageCredentials;
use azure_storage_blobs::{
    blob::{Blob, BlobBlockType, BlockList},
    prelude::*,
};
use futures::{Stream, StreamExt, TryStreamExt, stream};
use tokio::{
    fs::File as AsyncFile,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, trace};

use crate::{
    freshness::LARGE_FILE_THRESHOLD,
    progress::ProgressSink,
    storage::{BlobDescriptor, BlobStore, StorageConfig},
};

/// Size of each block when a file is transferred in parts.
const BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// A container in an Azure storage account, authenticated with a shared key.
pub struct AzureBlobStore {
    container_name: String,
    client: ContainerClient,
    max_connections: NonZeroUsize,
}

impl AzureBlobStore {
    pub fn new(config: &StorageConfig, container_name: &str) -> Self {
        let credentials =
            StorageCredentials::access_key(config.account_name.clone(), config.access_key.clone());
        let client = BlobServiceClient::new(config.account_name.clone(), credentials)
            .container_client(container_name);

        Self {
            container_name: container_name.to_string(),
            client,
            max_connections: config.max_connections,
        }
    }

    async fn upload_blocks(
        &self,
        client: &BlobClient,
        local_path: &Path,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()> {
        let file = AsyncFile::open(local_path).await?;

        // Read blocks in order, but keep several uploads in flight
        let blocks = stream::try_unfold((file, 0_usize), |(mut file, index)| async move {
            let mut block = Vec::with_capacity(BLOCK_SIZE);
            (&mut file).take(BLOCK_SIZE as u64).read_to_end(&mut block).await?;
            if block.is_empty() {
                return Ok(None);
            }

            anyhow::Ok(Some(((index, block), (file, index + 1))))
        });
        let block_ids: Vec<String> = blocks
            .map_ok(|(index, block)| async move {
                let block_id = format!("{index:08}");
                let len = block.len() as u64;
                trace!(%block_id, len, "uploading block");
                client.put_block(block_id.clone(), block).await?;
                progress.advance(len);
                anyhow::Ok(block_id)
            })
            .try_buffered(self.max_connections.get())
            .try_collect()
            .await?;

        debug!(blocks = block_ids.len(), "committing block list");
        let block_list = BlockList {
            blocks: block_ids
                .into_iter()
                .map(BlobBlockType::new_uncommitted)
                .collect(),
        };
        client.put_block_list(block_list).await?;

        Ok(())
    }
}

impl BlobStore for AzureBlobStore {
    fn list_blobs<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Stream<Item = anyhow::Result<BlobDescriptor>> + 'a {
        let mut request = self.client.list_blobs();
        if let Some(prefix) = prefix {
            request = request.prefix(prefix.to_string());
        }

        request
            .into_stream()
            .map_err(anyhow::Error::from)
            .map_ok(|page| {
                let blobs: Vec<_> = page
                    .blobs
                    .blobs()
                    .map(|blob| anyhow::Ok(descriptor(blob)))
                    .collect();
                trace!(count = blobs.len(), "received listing page");
                stream::iter(blobs)
            })
            .try_flatten()
    }

    async fn blob_metadata(&self, path: &str) -> anyhow::Result<Option<BlobDescriptor>> {
        match self.client.blob_client(path).get_properties().await {
            Ok(response) => Ok(Some(descriptor(&response.blob))),
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(error).with_context(|| {
                format!("failed to get properties of `{}/{path}`", self.container_name)
            }),
        }
    }

    async fn upload(
        &self,
        local_path: &Path,
        blob_path: &str,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()> {
        let client = self.client.blob_client(blob_path);
        let size = tokio::fs::metadata(local_path).await?.len();
        progress.start(size);

        // The service only records a content hash for single-shot uploads
        if size <= LARGE_FILE_THRESHOLD {
            let content = tokio::fs::read(local_path).await?;
            client.put_block_blob(content).await?;
            progress.advance(size);
        } else {
            self.upload_blocks(&client, local_path, progress).await?;
        }

        progress.finish();
        Ok(())
    }

    async fn download(
        &self,
        blob_path: &str,
        local_path: &Path,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()> {
        let client = self.client.blob_client(blob_path);
        let properties = client
            .get_properties()
            .await
            .with_context(|| format!("blob not found: `{}/{blob_path}`", self.container_name))?
            .blob
            .properties;
        let size = properties.content_length;
        progress.start(size);

        // Fetch blocks concurrently, but write them in order
        let client = &client;
        let mut blocks = pin!(
            stream::iter(block_ranges(size, BLOCK_SIZE as u64))
                .map(|range| async move {
                    trace!(start = range.start, end = range.end, "downloading block");
                    let mut block = Vec::with_capacity((range.end - range.start) as usize);
                    let mut responses = client.get().range(range).into_stream();
                    while let Some(response) = responses.try_next().await? {
                        block.extend_from_slice(&response.data.collect().await?);
                    }
                    anyhow::Ok(block)
                })
                .buffered(self.max_connections.get())
        );

        let mut file = AsyncFile::create(local_path).await?;
        while let Some(block) = blocks.try_next().await? {
            file.write_all(&block).await?;
            progress.advance(block.len() as u64);
        }
        file.flush().await?;
        file.into_std()
            .await
            .set_modified(properties.last_modified.into())?;

        progress.finish();
        Ok(())
    }

    async fn delete(&self, blob_path: &str) -> anyhow::Result<()> {
        self.client.blob_client(blob_path).delete().await?;
        Ok(())
    }
}

/// Splits `size` bytes into consecutive ranges of at most `block_size` bytes.
fn block_ranges(size: u64, block_size: u64) -> impl Iterator<Item = Range<u64>> {
    (0..size)
        .step_by(block_size as usize)
        .map(move |start| start..size.min(start + block_size))
}

fn descriptor(blob: &Blob) -> BlobDescriptor {
    BlobDescriptor {
        path: blob.name.clone(),
        last_modified: blob.properties.last_modified,
        content_length: blob.properties.content_length,
        content_hash: blob
            .properties
            .content_md5
            .as_ref()
            .map(|hash| hash.as_slice().to_vec()),
    }
}

fn is_not_found(error: &azure_core::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::HttpResponse {
            status: StatusCode::NotFound,
            ..
        }
    )
}
