use clap::Args;

use crate::{cli::AzureStorageOptions, remote::RemoteSpecifier};

/// Options for listing blobs.
#[derive(Clone, Debug, Args)]
pub struct ListBlobsOptions {
    /// The container or blob prefix to list, as `wasb[s]://container/path`.
    ///
    /// Every blob whose path starts with the given path is listed.
    pub remote: RemoteSpecifier,

    /// Options for configuring the Storage Account.
    #[command(flatten)]
    pub azure_storage: AzureStorageOptions,
}
