use std::{
    env::current_dir,
    fmt::{Display, Formatter},
    io::{self, Write},
    path::{Path, PathBuf},
    pin::pin,
};

use anyhow::bail;
use futures::{Stream, TryStreamExt};
use tracing::{info, warn};

use crate::{
    plan::{DownloadPlan, UploadPlan},
    progress::ProgressSink,
    remote::RemoteSpecifier,
    storage::BlobStore,
};

/// How a single planned transfer ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Outcome {
    Succeeded,
    Failed,

    /// Not attempted because of `--dry-run`.
    Ignored,
}

/// Counts of outcomes for an executed plan.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TransferSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl TransferSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Ignored => self.ignored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.ignored
    }

    /// Fails if any transfer failed.
    pub fn check(self) -> anyhow::Result<Self> {
        if self.failed > 0 {
            bail!("{} of {} transfers failed", self.failed, self.total());
        }

        Ok(self)
    }
}

impl Display for TransferSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} ignored",
            self.succeeded, self.failed, self.ignored
        )
    }
}

/// Executes transfer plans against a blob store, one file at a time.
///
/// Each transfer writes a status line to `out`. A failed transfer is reported
/// and the remaining ones still run.
pub struct Executor<'a, S, W> {
    store: &'a S,
    progress: &'a dyn ProgressSink,
    out: W,
    dry_run: bool,
}

impl<'a, S, W> Executor<'a, S, W>
where
    S: BlobStore,
    W: Write,
{
    pub fn new(store: &'a S, progress: &'a dyn ProgressSink, out: W) -> Self {
        Self {
            store,
            progress,
            out,
            dry_run: false,
        }
    }

    /// Only print what would be transferred.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn upload(
        &mut self,
        plan: &UploadPlan,
        remote: &RemoteSpecifier,
    ) -> io::Result<TransferSummary> {
        let store = self.store;
        let progress = self.progress;
        let mut summary = TransferSummary::default();
        for (local_path, blob_path) in plan.iter() {
            let message = format!(
                "Upload `{}` into `{}`",
                relative_display(local_path),
                remote.blob_url(blob_path),
            );
            let outcome = self
                .step(message, store.upload(local_path, blob_path, progress))
                .await?;
            summary.record(outcome);
        }

        info!(%summary, "upload finished");
        Ok(summary)
    }

    pub async fn download(
        &mut self,
        plan: &DownloadPlan,
        remote: &RemoteSpecifier,
    ) -> io::Result<TransferSummary> {
        let store = self.store;
        let progress = self.progress;
        let mut summary = TransferSummary::default();
        for (blob_path, local_path) in plan.iter() {
            let message = format!(
                "Download `{}` into `{}`",
                remote.blob_url(blob_path),
                relative_display(local_path),
            );
            let outcome = self
                .step(message, store.download(blob_path, local_path, progress))
                .await?;
            summary.record(outcome);
        }

        info!(%summary, "download finished");
        Ok(summary)
    }

    /// Removes blobs as they are yielded, so a prefix listing is never held in
    /// memory as a whole. A failed listing stops the removal.
    pub async fn remove(
        &mut self,
        blob_paths: impl Stream<Item = anyhow::Result<String>>,
        remote: &RemoteSpecifier,
    ) -> anyhow::Result<TransferSummary> {
        let store = self.store;
        let mut summary = TransferSummary::default();
        let mut blob_paths = pin!(blob_paths);
        while let Some(blob_path) = blob_paths.try_next().await? {
            let message = format!("Remove blob from `{}`", remote.blob_url(&blob_path));
            let outcome = self.step(message, store.delete(&blob_path)).await?;
            summary.record(outcome);
        }

        info!(%summary, "remove finished");
        Ok(summary)
    }

    /// Prints the status line of one transfer and runs it unless dry running.
    async fn step(
        &mut self,
        message: String,
        action: impl Future<Output = anyhow::Result<()>>,
    ) -> io::Result<Outcome> {
        write!(self.out, "{message} ... ")?;
        self.out.flush()?;

        if self.dry_run {
            writeln!(self.out, "IGNORE (--dry-run)")?;
            return Ok(Outcome::Ignored);
        }

        match action.await {
            Ok(()) => {
                writeln!(self.out, "OK")?;
                Ok(Outcome::Succeeded)
            }
            Err(error) => {
                self.progress.finish();
                warn!("{message} failed: {error:#}");
                writeln!(self.out, "FAIL\n{error:#}")?;
                Ok(Outcome::Failed)
            }
        }
    }
}

/// Shows a path relative to the working directory when it lies below it.
fn relative_display(path: &Path) -> String {
    current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(path))
        .display()
        .to_string()
}
