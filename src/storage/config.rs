use std::{
    fmt::{Debug, Formatter},
    num::NonZeroUsize,
};

/// Everything needed to connect to a storage account.
#[derive(Clone)]
pub struct StorageConfig {
    /// The storage account name.
    pub account_name: String,

    /// The shared access key of the storage account.
    pub access_key: String,

    /// The maximum number of concurrent requests used for a single transfer.
    pub max_connections: NonZeroUsize,
}

impl Debug for StorageConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account_name", &self.account_name)
            .field("access_key", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
