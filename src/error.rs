use std::{error::Error as StdError, io, path::PathBuf};

use thiserror::Error;

/// Errors detected while configuring or planning a transfer.
///
/// Every variant except [`Error::Storage`] is raised before any network
/// transfer starts.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting was not found in the environment.
    #[error("environment variable is missing: `{name}`")]
    CredentialsMissing {
        /// The environment variable that was looked up.
        name: String,
    },

    /// A setting was found but could not be parsed.
    #[error("invalid value for `{name}`")]
    InvalidSetting {
        /// The environment variable or option name.
        name: String,

        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The remote locator does not use a `wasb` or `wasbs` scheme.
    #[error("remote path is not supported: `{0}` (expected format: `wasb[s]://container/blob-path`)")]
    InvalidRemotePath(String),

    /// The command needs a blob path but the locator only names a container.
    #[error("a blob path is required for this command")]
    BlobPathRequired,

    /// Two sources resolved to the same destination.
    #[error("cannot use the same path (`{}`) for multiple blobs", path.display())]
    DuplicateDestination { path: PathBuf },

    /// A blob key does not map to a path below the local destination, such as
    /// one with a `..` segment.
    #[error("blob path cannot be stored locally: `{path}`")]
    UnsafeBlobPath { path: String },

    /// The local path is a symlink, or a directory outside of recursive mode.
    #[error("{reason}: `{}`", path.display())]
    UnsupportedLocalPath { path: PathBuf, reason: &'static str },

    /// The local path does not exist.
    #[error("file does not exist: `{}`", path.display())]
    LocalPathNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// A failure reported by the blob storage client.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
