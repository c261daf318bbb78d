use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::Error;

/// Account endpoints accepted after the `@` in `container@account/path`.
const ACCOUNT_HOST_SUFFIX: &str = ".blob.core.windows.net";

/// The scheme of a remote locator.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Scheme {
    Wasb,
    Wasbs,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Wasb => "wasb",
            Scheme::Wasbs => "wasbs",
        }
    }
}

/// A parsed `wasb[s]://container[/path]` locator.
///
/// The blob path never holds an empty string. A locator that only names a
/// container has no blob path at all.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct RemoteSpecifier {
    scheme: Scheme,
    container: String,
    blob_path: Option<String>,
}

impl RemoteSpecifier {
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The path of the blob (or prefix) within the container, if any.
    pub fn blob_path(&self) -> Option<&str> {
        self.blob_path.as_deref()
    }

    /// Whether this locator denotes a directory-like location: the container
    /// root, or a path ending with `/`.
    pub fn is_directory(&self) -> bool {
        self.blob_path
            .as_deref()
            .is_none_or(|path| path.ends_with('/'))
    }

    /// The URL of the container itself.
    pub fn container_url(&self) -> String {
        format!("{}://{}", self.scheme.as_str(), self.container)
    }

    /// The URL of a blob within the same container.
    pub fn blob_url(&self, blob_path: &str) -> String {
        format!("{}/{}", self.container_url(), blob_path.trim_start_matches('/'))
    }
}

impl FromStr for RemoteSpecifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidRemotePath(s.to_string());

        let (scheme, rest) = s.split_once("://").ok_or_else(invalid)?;
        let scheme = if scheme.eq_ignore_ascii_case("wasbs") {
            Scheme::Wasbs
        } else if scheme.eq_ignore_ascii_case("wasb") {
            Scheme::Wasb
        } else {
            return Err(invalid());
        };

        // Split off the container, which ends at the first `/` or `@`
        let split = rest.find(['/', '@']).unwrap_or(rest.len());
        let (container, mut path) = rest.split_at(split);
        if container.is_empty() {
            return Err(invalid());
        }

        if let Some(after_at) = path.strip_prefix('@') {
            // Either `container@account.blob.core.windows.net/path` or the
            // shorthand `container@path`
            let (host, host_rest) = after_at.split_at(after_at.find('/').unwrap_or(after_at.len()));
            path = if host.ends_with(ACCOUNT_HOST_SUFFIX) {
                host_rest
            } else {
                after_at
            };
        }

        let path = path.trim_start_matches('/');
        Ok(RemoteSpecifier {
            scheme,
            container: container.to_string(),
            blob_path: (!path.is_empty()).then(|| path.to_string()),
        })
    }
}

impl Display for RemoteSpecifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.blob_path {
            Some(path) => write!(f, "{}", self.blob_url(path)),
            None => write!(f, "{}", self.container_url()),
        }
    }
}
