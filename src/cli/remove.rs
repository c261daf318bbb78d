use clap::Args;

use crate::{cli::AzureStorageOptions, remote::RemoteSpecifier};

/// Options for removing blobs.
#[derive(Clone, Debug, Args)]
pub struct RemoveBlobsOptions {
    /// The blob to remove, as `wasb[s]://container/path`.
    pub remote: RemoteSpecifier,

    /// Remove every blob whose path starts with the given path.
    #[arg(long, short = 'p')]
    pub prefix: bool,

    /// Only print the blobs that would be removed.
    #[arg(long)]
    pub dry_run: bool,

    /// Options for configuring the Storage Account.
    #[command(flatten)]
    pub azure_storage: AzureStorageOptions,
}
