use tracing::debug;

use crate::{cli::AzureStorageOptions, error::Error, storage::StorageConfig};

impl AzureStorageOptions {
    /// Resolves the storage account settings, reading the environment where
    /// requested.
    pub fn resolve(&self) -> Result<StorageConfig, Error> {
        let account_name = self.account_name.resolve()?.into_owned();
        let access_key = self.access_key.resolve()?.into_owned();
        debug!(
            account_name = %account_name,
            max_connections = %self.max_connections,
            "using storage account"
        );

        Ok(StorageConfig {
            account_name,
            access_key,
            max_connections: self.max_connections,
        })
    }
}
