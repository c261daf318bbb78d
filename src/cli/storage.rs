use std::num::NonZeroUsize;

use clap::Args;

use crate::cli::MaybeEnv;

/// Options for connecting to the storage account.
#[derive(Clone, Debug, Args)]
#[command(next_help_heading = "Storage Account")]
pub struct AzureStorageOptions {
    /// The name of the storage account.
    ///
    /// To use an environment variable instead, use the `env:` scheme. For
    /// example, `env:STORAGE_ACCOUNT` will use the value of the environment
    /// variable `STORAGE_ACCOUNT` as the account name.
    #[arg(long, default_value = "env:AZURE_STORAGE_ACCOUNT")]
    pub account_name: MaybeEnv<String>,

    /// The shared access key of the storage account.
    ///
    /// Supports the `env:` scheme as well. Passing the key directly exposes it
    /// to other users of this machine, so prefer an environment variable.
    #[arg(long, default_value = "env:AZURE_STORAGE_ACCESS_KEY")]
    pub access_key: MaybeEnv<String>,

    /// The maximum number of blocks transferred concurrently for a single file.
    #[arg(long, env = "AZURE_STORAGE_MAX_CONNECTIONS", default_value = "1")]
    pub max_connections: NonZeroUsize,
}
