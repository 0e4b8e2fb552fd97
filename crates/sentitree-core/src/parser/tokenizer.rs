//! # Tokenizers
//!
//! Turn a sentence into the token list stored on an [`Example`].
//! The treebank loader joins the leaves of a tree with single spaces and
//! hands that string to the configured tokenizer.
//!
//! [`Example`]: crate::types::Example

use std::path::Path;

use regex::Regex;
use tokenizers::Tokenizer as HfInner;

use crate::error::{Result, SentitreeError};

/// Splits text into tokens.
pub trait Tokenizer {
    /// Tokenize `text` into an ordered list of tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self(text))
    }
}

/// Splits on Unicode whitespace and keeps tokens verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(String::from).collect())
    }
}

/// Lower-cases text and splits punctuation into separate tokens.
///
/// Quotes are dropped, `;` and `:` become separators, and `<br />` line
/// breaks are removed.
#[derive(Debug, Clone)]
pub struct BasicEnglishTokenizer {
    rules: Vec<(Regex, &'static str)>,
}

impl BasicEnglishTokenizer {
    /// Constructs the tokenizer with its pre-compiled rewrite rules.
    ///
    /// # Errors
    ///
    /// Returns `SentitreeError::Regex` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        let rules = [
            (r"'", " '  "),
            (r#"""#, ""),
            (r"\.", " . "),
            (r"<br \/>", " "),
            (r",", " , "),
            (r"\(", " ( "),
            (r"\)", " ) "),
            (r"!", " ! "),
            (r"\?", " ? "),
            (r";", " "),
            (r":", " "),
            (r"\s+", " "),
        ];

        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| -> Result<(Regex, &'static str)> {
                Ok((Regex::new(pattern)?, replacement))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }
}

impl Tokenizer for BasicEnglishTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut line = text.to_lowercase();
        for (re, replacement) in &self.rules {
            line = re.replace_all(&line, *replacement).into_owned();
        }
        Ok(line.split_whitespace().map(String::from).collect())
    }
}

/// Adapter over a Hugging Face `tokenizer.json`.
///
/// Emits the model's token strings, without special tokens, so the result
/// can be looked up in a [`Vocab`](crate::vocab::Vocab) like any other
/// token list.
pub struct HfTokenizer {
    inner: HfInner,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let inner =
            HfInner::from_file(path).map_err(|e| SentitreeError::Tokenizer(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_tokenizer(inner: HfInner) -> Self {
        Self { inner }
    }
}

impl Tokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| SentitreeError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }
}
