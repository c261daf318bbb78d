mod download;
mod remove;
mod upload;

use std::{
    collections::HashSet,
    hash::Hash,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

pub use download::*;
pub use remove::*;
pub use upload::*;

/// Pairs of local files and the blob paths they upload to.
pub type UploadPlan = TransferPlan<PathBuf, String>;

/// Pairs of blob paths and the local files they download to.
pub type DownloadPlan = TransferPlan<String, PathBuf>;

/// An ordered list of `(source, destination)` pairs, one per file to transfer.
///
/// Destinations are unique within a plan.
#[derive(Clone, Debug)]
pub struct TransferPlan<Source, Destination> {
    pairs: Vec<(Source, Destination)>,
    destinations: HashSet<Destination>,
}

impl<Source, Destination> TransferPlan<Source, Destination>
where
    Destination: AsRef<Path> + Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            destinations: HashSet::new(),
        }
    }

    /// Appends a pair, failing if another pair already has this destination.
    pub fn try_push(&mut self, source: Source, destination: Destination) -> Result<()> {
        if !self.destinations.insert(destination.clone()) {
            return Err(Error::DuplicateDestination {
                path: destination.as_ref().to_path_buf(),
            });
        }

        self.pairs.push((source, destination));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Source, &Destination)> {
        self.pairs.iter().map(|(source, destination)| (source, destination))
    }
}

impl<Source, Destination> Default for TransferPlan<Source, Destination>
where
    Destination: AsRef<Path> + Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Source, Destination> IntoIterator for TransferPlan<Source, Destination> {
    type Item = (Source, Destination);
    type IntoIter = std::vec::IntoIter<(Source, Destination)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
