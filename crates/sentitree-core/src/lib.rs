//! # Sentitree Core
//!
//! Building blocks for treebank-based text classification: the example
//! and dataset types, a bracketed tree parser, tokenizers, vocabularies,
//! label encodings and padded batch encoders producing `candle` tensors.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sentitree_core::encoder::{BatchEncoder, LstmEncoder};
//! use sentitree_core::parser::parse_line_tree;
//! use sentitree_core::{Example, LabelEncoding, SpecialTokens, Vocab};
//!
//! let (leaves, _) = parse_line_tree("(3 (2 a) (3 (3 fine) (2 film)))", false)
//!     .unwrap()
//!     .remove(0);
//! let example = Example::new(leaves, "positive");
//!
//! let vocab = Vocab::with_specials(["a", "fine", "film"], SpecialTokens::standard());
//! let encoder = LstmEncoder::new(Arc::new(vocab), Arc::new(LabelEncoding::sst(false)));
//! let batch = encoder.encode_batch(&[example]).unwrap();
//!
//! assert_eq!(batch.lengths, vec![3]);
//! ```
pub mod encoder;
pub mod error;
pub mod labels;
pub mod parser;
pub mod types;
pub mod vocab;

// Re-export primary API
pub use encoder::{
    BatchEncoder, CnnBatch, CnnEncoder, LstmBatch, LstmEncoder, TransformerBatch,
    TransformerEncoder,
};
pub use error::{Result, SentitreeError};
pub use labels::LabelEncoding;
pub use parser::{parse_line_tree, Tokenizer, Tree, WhitespaceTokenizer};
pub use types::{Dataset, Example, LabeledSequence, Split};
pub use vocab::{SpecialTokens, Vocab, VocabBuilder};
