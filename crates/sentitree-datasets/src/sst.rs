//! # Stanford Sentiment Treebank
//!
//! Loads the train/validation/test splits of SST from
//! `<root>/<name>/trees/{train,dev,test}.txt`, downloading the corpus on
//! first use.

use std::path::{Path, PathBuf};

use sentitree_core::parser::Tokenizer;
use sentitree_core::{Dataset, Example, Split};
use tracing::info;

use crate::download::download_extract;
use crate::error::Result;
use crate::reader::{read_tree_file, ExampleMapper, FilterFn, LabelMap};
use crate::registry;

/// Directory of the split files inside the extracted archive.
const TREES_DIR: &str = "trees";

/// Configuration for loading SST.
#[derive(Debug, Clone)]
pub struct SstConfig {
    /// Directory holding all downloaded corpora.
    pub root: PathBuf,
    /// Folder within `root` for this corpus.
    pub name: String,
    /// Emit one example per subtree in the training split.
    pub train_subtrees: bool,
    /// Keep five classes instead of folding to negative/neutral/positive.
    pub fine_grained: bool,
    /// Replace a previously downloaded copy.
    pub overwrite: bool,
    /// Archive location.
    pub url: String,
}

impl Default for SstConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".data"),
            name: registry::SST.name.to_string(),
            train_subtrees: false,
            fine_grained: false,
            overwrite: false,
            url: registry::SST.url.to_string(),
        }
    }
}

impl SstConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_train_subtrees(mut self, enabled: bool) -> Self {
        self.train_subtrees = enabled;
        self
    }

    pub fn with_fine_grained(mut self, enabled: bool) -> Self {
        self.fine_grained = enabled;
        self
    }

    pub fn with_overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Fetch the archive from a mirror instead of the registry URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Directory the archive is extracted into.
    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// Path of a split file.
    pub fn split_path(&self, split: Split) -> PathBuf {
        self.dataset_dir().join(TREES_DIR).join(split.file_name())
    }

    /// Subtree expansion only ever applies to the training split.
    fn subtrees_for(&self, split: Split) -> bool {
        self.train_subtrees && split == Split::Train
    }
}

/// The three loaded partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SstSplits {
    pub train: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
}

impl SstSplits {
    pub fn get(&self, split: Split) -> &Dataset {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }

    pub fn into_tuple(self) -> (Dataset, Dataset, Dataset) {
        (self.train, self.validation, self.test)
    }
}

/// SST loader with optional tokenizer and example filter.
///
/// # Examples
/// ```no_run
/// use sentitree_datasets::sst::{SstConfig, SstLoader};
///
/// // Drop all neutral examples.
/// let splits = SstLoader::new(SstConfig::new().with_train_subtrees(true))
///     .with_filter(|e| e.label() != "neutral")
///     .load()
///     .unwrap();
/// assert!(splits.train.iter().all(|e| e.label() != "neutral"));
/// ```
pub struct SstLoader {
    config: SstConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    filter: Option<Box<FilterFn>>,
}

impl SstLoader {
    pub fn new(config: SstConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            filter: None,
        }
    }

    /// Re-tokenize each tree's sentence instead of keeping its leaves.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Keep only examples for which `filter` returns `true`.
    pub fn with_filter(mut self, filter: impl Fn(&Example) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn config(&self) -> &SstConfig {
        &self.config
    }

    /// Make sure the corpus is on disk, downloading it if needed.
    pub fn fetch(&self) -> Result<PathBuf> {
        download_extract(
            &self.config.url,
            &self.config.name,
            &self.config.root,
            self.config.overwrite,
        )
    }

    /// Fetch the corpus and load all three splits.
    pub fn load(&self) -> Result<SstSplits> {
        self.fetch()?;

        Ok(SstSplits {
            train: self.load_split(Split::Train)?,
            validation: self.load_split(Split::Validation)?,
            test: self.load_split(Split::Test)?,
        })
    }

    /// Load one split from an already fetched corpus.
    pub fn load_split(&self, split: Split) -> Result<Dataset> {
        let path = self.config.split_path(split);
        let dataset = self.load_file(&path, self.config.subtrees_for(split))?;
        info!(%split, examples = dataset.len(), "loaded split");
        Ok(dataset)
    }

    fn load_file(&self, path: &Path, subtrees: bool) -> Result<Dataset> {
        let label_map = LabelMap::sst(self.config.fine_grained);
        let mapper = ExampleMapper::new(&label_map)
            .with_tokenizer(self.tokenizer.as_ref().map(|t| t.as_ref() as &dyn Tokenizer))
            .with_filter(self.filter.as_deref());

        let records = read_tree_file(path, subtrees)?;
        Ok(Dataset::new(mapper.map_all(path, records)?))
    }
}

/// Load SST with the default tokenizer and no filter.
pub fn load_sst(config: SstConfig) -> Result<SstSplits> {
    SstLoader::new(config).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_registry() {
        let config = SstConfig::default();
        assert_eq!(config.root, PathBuf::from(".data"));
        assert_eq!(config.name, "sst");
        assert!(config.url.ends_with("trainDevTestTrees_PTB.zip"));
        assert!(!config.train_subtrees && !config.fine_grained && !config.overwrite);
    }

    #[test]
    fn split_paths() {
        let config = SstConfig::new().with_root("/data").with_name("sst5");
        assert_eq!(
            config.split_path(Split::Validation),
            PathBuf::from("/data/sst5/trees/dev.txt")
        );
    }

    #[test]
    fn subtrees_only_for_train() {
        let config = SstConfig::new().with_train_subtrees(true);
        assert!(config.subtrees_for(Split::Train));
        assert!(!config.subtrees_for(Split::Validation));
        assert!(!config.subtrees_for(Split::Test));
    }
}
