//! # Sentitree
//!
//! Sentiment treebank loading and batch encoding for text classification.
//!
//! - [`datasets`] downloads the Stanford Sentiment Treebank and parses its
//!   bracketed trees into `(tokens, label)` examples.
//! - [`core`] holds the example types, vocabularies and the CNN, LSTM and
//!   transformer batch encoders.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sentitree::core::{BatchEncoder, LabelEncoding, LstmEncoder, SpecialTokens, VocabBuilder};
//! use sentitree::datasets::{SstConfig, SstLoader};
//!
//! let splits = SstLoader::new(SstConfig::new()).load().unwrap();
//!
//! let mut builder = VocabBuilder::new().with_specials(SpecialTokens::standard());
//! builder.add_dataset(&splits.train);
//! builder.add_dataset(&splits.validation);
//! builder.add_dataset(&splits.test);
//! let vocab = Arc::new(builder.build());
//!
//! let encoder = LstmEncoder::new(vocab, Arc::new(LabelEncoding::sst(false)));
//! for batch in splits.train.batches(32) {
//!     let encoded = encoder.encode_batch(batch).unwrap();
//!     assert_eq!(encoded.lengths.len(), batch.len());
//! }
//! ```

pub use sentitree_core as core;
pub use sentitree_datasets as datasets;

pub use sentitree_core::{
    BatchEncoder, CnnEncoder, Dataset, Example, LabelEncoding, LstmEncoder, TransformerEncoder,
    Vocab,
};
pub use sentitree_datasets::{load_sst, SstConfig, SstLoader, SstSplits};
