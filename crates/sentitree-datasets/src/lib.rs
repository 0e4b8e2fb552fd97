//! # Sentitree Datasets
//!
//! Fetches labeled treebank corpora and turns them into
//! [`Dataset`](sentitree_core::Dataset)s of `(tokens, label)` examples.
//! Downloads are blocking and cached under a root directory; a corpus
//! already on disk is reused unless an overwrite is requested.

pub mod download;
pub mod error;
pub mod reader;
pub mod registry;
pub mod sst;

pub use download::{download, download_extract, extract, ArchiveFormat};
pub use error::{DatasetError, Result};
pub use reader::{read_tree_file, ExampleMapper, FilterFn, LabelMap, TreeRecord};
pub use registry::{source, DatasetSource, DATASETS, SST};
pub use sst::{load_sst, SstConfig, SstLoader, SstSplits};
