use std::pin::pin;

use futures::TryStreamExt;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    cli::{GlobalOptions, ListBlobsOptions},
    commands::Command,
    remote::RemoteSpecifier,
    storage::{AzureBlobStore, BlobDescriptor, BlobStore},
};

const LAST_MODIFIED_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

impl Command for ListBlobsOptions {
    async fn execute(self, _global_options: &GlobalOptions) -> anyhow::Result<()> {
        let config = self.azure_storage.resolve()?;
        let store = AzureBlobStore::new(&config, self.remote.container());

        // Print each page as soon as it arrives
        let mut blobs = pin!(store.list_blobs(self.remote.blob_path()));
        while let Some(blob) = blobs.try_next().await? {
            println!("{}", listing_line(&blob, &self.remote)?);
        }

        Ok(())
    }
}

fn listing_line(blob: &BlobDescriptor, remote: &RemoteSpecifier) -> anyhow::Result<String> {
    Ok(format!(
        "{}\t{:12}\t{}",
        blob.last_modified.format(LAST_MODIFIED_FORMAT)?,
        blob.content_length,
        remote.blob_url(&blob.path),
    ))
}
