pub mod tokenizer;
pub mod tree;

pub use tokenizer::{BasicEnglishTokenizer, HfTokenizer, Tokenizer, WhitespaceTokenizer};
pub use tree::{parse_line_tree, Node, Subtrees, Tree, MAX_DEPTH};
