use std::path::PathBuf;

use clap::Args;

use crate::{cli::AzureStorageOptions, remote::RemoteSpecifier};

/// Options for downloading blobs.
#[derive(Clone, Debug, Args)]
pub struct DownloadBlobsOptions {
    /// The blob (or prefix, with --prefix) to download, as
    /// `wasb[s]://container/path`.
    pub remote: RemoteSpecifier,

    /// The local file or directory to download into.
    ///
    /// A missing path ending with a separator is created as a directory.
    pub path: PathBuf,

    /// Download every blob whose path starts with the given path.
    ///
    /// Blobs keep their paths relative to the last `/` of the given path.
    #[arg(long, short = 'p')]
    pub prefix: bool,

    /// Skip blobs whose local file already exists.
    #[arg(long)]
    pub skip_existing: bool,

    /// Only download blobs that differ from their local file.
    ///
    /// Files are compared by size, then by MD5 hash. Files larger than 64 MiB
    /// (or blobs without a stored hash) are compared by modification time
    /// instead.
    #[arg(long)]
    pub sync: bool,

    /// Only print the downloads that would happen.
    #[arg(long)]
    pub dry_run: bool,

    /// Options for configuring the Storage Account.
    #[command(flatten)]
    pub azure_storage: AzureStorageOptions,
}
