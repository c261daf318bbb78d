use std::io::stdout;

use tracing::info;

use crate::{
    cli::{GlobalOptions, UploadBlobsOptions},
    commands::Command,
    local::collect_local_files,
    plan::plan_upload,
    progress::TerminalProgress,
    storage::AzureBlobStore,
    transfer::Executor,
};

impl Command for UploadBlobsOptions {
    async fn execute(self, _global_options: &GlobalOptions) -> anyhow::Result<()> {
        let config = self.azure_storage.resolve()?;

        // Plan everything before the first upload starts
        let files = collect_local_files(&self.paths, self.recursive)?;
        let plan = plan_upload(&files, &self.remote)?;
        info!(files = plan.len(), remote = %self.remote, "planned upload");

        let store = AzureBlobStore::new(&config, self.remote.container());
        let progress = TerminalProgress::new();
        Executor::new(&store, &progress, stdout())
            .dry_run(self.dry_run)
            .upload(&plan, &self.remote)
            .await?
            .check()?;

        Ok(())
    }
}
