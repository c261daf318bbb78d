use std::{
    fs::create_dir_all,
    io::stdout,
    path::{absolute, is_separator},
};

use tracing::{debug, info};

use crate::{
    cli::{DownloadBlobsOptions, GlobalOptions},
    commands::Command,
    plan::{DownloadMode, DownloadOptions, plan_download},
    progress::TerminalProgress,
    storage::AzureBlobStore,
    transfer::Executor,
};

impl Command for DownloadBlobsOptions {
    async fn execute(self, _global_options: &GlobalOptions) -> anyhow::Result<()> {
        let config = self.azure_storage.resolve()?;

        // `out/` names a directory even before it exists
        if !self.path.exists() && self.path.to_string_lossy().ends_with(is_separator) {
            debug!(path = %self.path.display(), "creating destination directory");
            create_dir_all(&self.path)?;
        }
        let destination = absolute(&self.path)?;

        let store = AzureBlobStore::new(&config, self.remote.container());
        let options = DownloadOptions {
            mode: if self.prefix {
                DownloadMode::Prefix
            } else {
                DownloadMode::Single
            },
            skip_existing: self.skip_existing,
            sync: self.sync,
        };
        let plan = plan_download(&store, &self.remote, &destination, options).await?;
        info!(blobs = plan.len(), remote = %self.remote, "planned download");
        if plan.is_empty() {
            info!("nothing to download");
            return Ok(());
        }

        let progress = TerminalProgress::new();
        Executor::new(&store, &progress, stdout())
            .dry_run(self.dry_run)
            .download(&plan, &self.remote)
            .await?
            .check()?;

        Ok(())
    }
}
