use std::io::stdout;

use tracing::info;

use crate::{
    cli::{GlobalOptions, RemoveBlobsOptions},
    commands::Command,
    plan::plan_remove,
    progress::Silent,
    storage::AzureBlobStore,
    transfer::Executor,
};

impl Command for RemoveBlobsOptions {
    async fn execute(self, _global_options: &GlobalOptions) -> anyhow::Result<()> {
        let config = self.azure_storage.resolve()?;
        let store = AzureBlobStore::new(&config, self.remote.container());

        let blob_paths = plan_remove(&store, &self.remote, self.prefix)?;
        info!(prefix = self.prefix, remote = %self.remote, "removing blobs");

        Executor::new(&store, &Silent, stdout())
            .dry_run(self.dry_run)
            .remove(blob_paths, &self.remote)
            .await?
            .check()?;

        Ok(())
    }
}
