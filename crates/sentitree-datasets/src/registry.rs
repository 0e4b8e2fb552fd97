//! Known corpus sources.

use crate::error::{DatasetError, Result};

/// Where a corpus archive lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSource {
    /// Registry key, also the default directory name under the data root.
    pub name: &'static str,
    /// Archive URL.
    pub url: &'static str,
}

impl DatasetSource {
    /// File name of the archive, taken from the last URL segment.
    #[must_use]
    pub fn archive_name(&self) -> &'static str {
        archive_name(self.url)
    }
}

/// Stanford Sentiment Treebank, PTB-style trees.
pub const SST: DatasetSource = DatasetSource {
    name: "sst",
    url: "http://nlp.stanford.edu/sentiment/trainDevTestTrees_PTB.zip",
};

/// All registered sources.
pub const DATASETS: &[DatasetSource] = &[SST];

/// Look up a source by registry key.
pub fn source(name: &str) -> Result<DatasetSource> {
    DATASETS
        .iter()
        .find(|s| s.name == name)
        .copied()
        .ok_or_else(|| DatasetError::UnknownDataset(name.to_string()))
}

/// Last path segment of `url`, without query or fragment.
pub(crate) fn archive_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
