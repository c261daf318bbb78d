use clap::{Parser, Subcommand};
use clap_cargo::style::CLAP_STYLING;

use crate::cli::{
    CompletionsOptions, DownloadBlobsOptions, GlobalOptions, ListBlobsOptions, RemoveBlobsOptions,
    UploadBlobsOptions,
};

/// List, remove, upload and download blobs in Azure Blob Storage.
///
/// Blobs are addressed as `wasb://container/path` or `wasbs://container/path`.
/// The storage account and its shared access key are read from the
/// `AZURE_STORAGE_ACCOUNT` and `AZURE_STORAGE_ACCESS_KEY` environment variables
/// unless given as options.
#[derive(Clone, Debug, Parser)]
#[command(
    styles = CLAP_STYLING,
    disable_help_subcommand = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub subcommand: CliCommand,

    /// Global options relevant to all subcommands.
    #[command(flatten)]
    pub global: GlobalOptions,
}

/// A subcommand to execute.
#[derive(Clone, Debug, Subcommand)]
pub enum CliCommand {
    /// Generate shell completions.
    ///
    /// Completions are written to stdout. Save them to the appropriate place
    /// for your shell.
    Completions(CompletionsOptions),

    /// List blobs.
    ///
    /// Prints the last modified time, size and URL of every blob under a path.
    Ls(ListBlobsOptions),

    /// Remove blobs.
    Rm(RemoveBlobsOptions),

    /// Upload local files as blobs.
    Put(UploadBlobsOptions),

    /// Download blobs to local files.
    Get(DownloadBlobsOptions),
}

const AFTER_HELP: &str = concat!(
    "Please submit all issues and feature requests on GitHub.\n",
    "\n",
    env!("CARGO_PKG_REPOSITORY"),
    "\n",
    "License: ",
    env!("CARGO_PKG_LICENSE"),
);

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::MaybeEnv;

    #[test]
    fn cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_put() {
        let cli = Cli::try_parse_from([
            "azblob", "put", "-R", "a.txt", "dir", "wasbs://container/backup/",
        ])
        .unwrap();

        let CliCommand::Put(options) = cli.subcommand else {
            panic!("expected put");
        };
        assert_eq!(options.paths, [PathBuf::from("a.txt"), PathBuf::from("dir")]);
        assert_eq!(options.remote.blob_path(), Some("backup/"));
        assert!(options.recursive);
        assert!(!options.dry_run);
        assert_eq!(
            options.azure_storage.account_name,
            MaybeEnv::EnvVar("AZURE_STORAGE_ACCOUNT".to_string()),
        );
    }

    #[test]
    fn parses_get() {
        let cli = Cli::try_parse_from([
            "azblob", "-vv", "get", "--prefix", "--sync", "wasb://container/logs/", "out/",
        ])
        .unwrap();

        assert_eq!(cli.global.verbose, 2);
        let CliCommand::Get(options) = cli.subcommand else {
            panic!("expected get");
        };
        assert!(options.prefix);
        assert!(options.sync);
        assert!(!options.skip_existing);
        assert_eq!(options.path, PathBuf::from("out/"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(Cli::try_parse_from(["azblob", "ls", "https://container/path"]).is_err());
    }

    #[test]
    fn put_requires_a_remote() {
        assert!(Cli::try_parse_from(["azblob", "put", "wasbs://container/a.txt"]).is_err());
    }
}
