use std::path::PathBuf;

use clap::Args;

use crate::{cli::AzureStorageOptions, remote::RemoteSpecifier};

/// Options for uploading files.
#[derive(Clone, Debug, Args)]
pub struct UploadBlobsOptions {
    /// The files (or directories, with --recursive) to upload.
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Where to upload, as `wasb[s]://container/path`.
    ///
    /// A single file is uploaded to exactly this path unless it ends with `/`
    /// (or names only a container), in which case the file name is appended.
    /// Multiple files keep their paths relative to their common directory.
    pub remote: RemoteSpecifier,

    /// Upload directories and everything below them.
    #[arg(long, short = 'R')]
    pub recursive: bool,

    /// Only print the uploads that would happen.
    #[arg(long)]
    pub dry_run: bool,

    /// Options for configuring the Storage Account.
    #[command(flatten)]
    pub azure_storage: AzureStorageOptions,
}
