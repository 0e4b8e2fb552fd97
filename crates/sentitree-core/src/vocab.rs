//! # Vocabulary
//!
//! Token-to-id mapping used to turn token sequences into tensors, with
//! optional padding and sequence-start/sequence-end markers.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SentitreeError};
use crate::types::Dataset;

/// Special tokens a vocabulary may define.
///
/// When present they are assigned the lowest ids, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// Padding token; its id fills the tail of short sequences.
    pub pad: Option<String>,
    /// Sequence-start marker prepended by the transformer encoder.
    pub cls: Option<String>,
    /// Sequence-end marker appended by the transformer encoder.
    pub sep: Option<String>,
}

impl SpecialTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<pad>`, `<cls>` and `<sep>`.
    pub fn standard() -> Self {
        Self::new()
            .with_pad("<pad>")
            .with_cls("<cls>")
            .with_sep("<sep>")
    }

    pub fn with_pad(mut self, token: impl Into<String>) -> Self {
        self.pad = Some(token.into());
        self
    }

    pub fn with_cls(mut self, token: impl Into<String>) -> Self {
        self.cls = Some(token.into());
        self
    }

    pub fn with_sep(mut self, token: impl Into<String>) -> Self {
        self.sep = Some(token.into());
        self
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.pad, &self.cls, &self.sep]
            .into_iter()
            .filter_map(|t| t.as_deref())
    }
}

/// A read-only token-to-id mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocab {
    itos: Vec<String>,
    stoi: HashMap<String, u32>,
    specials: SpecialTokens,
}

/// On-disk layout of a vocabulary.
#[derive(Serialize, Deserialize)]
struct VocabFile {
    specials: SpecialTokens,
    tokens: Vec<String>,
}

impl Vocab {
    /// Build a vocabulary without special tokens. Ids follow iteration
    /// order; repeated tokens keep their first id.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_specials(tokens, SpecialTokens::default())
    }

    /// Build a vocabulary whose special tokens come first.
    pub fn with_specials<I, S>(tokens: I, specials: SpecialTokens) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self {
            itos: Vec::new(),
            stoi: HashMap::new(),
            specials,
        };

        let specials: Vec<String> = vocab.specials.iter().map(String::from).collect();
        for token in specials {
            vocab.insert(token);
        }
        for token in tokens {
            vocab.insert(token.into());
        }

        vocab
    }

    fn insert(&mut self, token: String) {
        if !self.stoi.contains_key(&token) {
            let id = self.itos.len() as u32;
            self.stoi.insert(token.clone(), id);
            self.itos.push(token);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.itos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.stoi.contains_key(token)
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<u32> {
        self.stoi.get(token).copied()
    }

    /// Id of `token`.
    ///
    /// # Errors
    ///
    /// Returns `SentitreeError::UnknownToken` for out-of-vocabulary tokens.
    pub fn id(&self, token: &str) -> Result<u32> {
        self.get(token)
            .ok_or_else(|| SentitreeError::UnknownToken(token.to_string()))
    }

    #[must_use]
    pub fn token(&self, id: u32) -> Option<&str> {
        self.itos.get(id as usize).map(String::as_str)
    }

    /// Ids of every token, failing on the first unknown one.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<u32>> {
        tokens.iter().map(|t| self.id(t.as_ref())).collect()
    }

    #[must_use]
    pub fn specials(&self) -> &SpecialTokens {
        &self.specials
    }

    /// Id used to pad short sequences; `0` when no padding token is set.
    #[must_use]
    pub fn pad_id(&self) -> u32 {
        self.specials
            .pad
            .as_deref()
            .and_then(|t| self.get(t))
            .unwrap_or(0)
    }

    /// Id of the sequence-start marker.
    #[must_use]
    pub fn cls_id(&self) -> Option<u32> {
        self.specials.cls.as_deref().and_then(|t| self.get(t))
    }

    /// Id of the sequence-end marker.
    #[must_use]
    pub fn sep_id(&self) -> Option<u32> {
        self.specials.sep.as_deref().and_then(|t| self.get(t))
    }

    /// Write the vocabulary as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let specials: Vec<&str> = self.specials.iter().collect();
        let file = VocabFile {
            specials: self.specials.clone(),
            tokens: self
                .itos
                .iter()
                .filter(|t| !specials.contains(&t.as_str()))
                .cloned()
                .collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Read a vocabulary written by [`Vocab::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: VocabFile = serde_json::from_str(&content)?;
        Ok(Self::with_specials(file.tokens, file.specials))
    }
}

/// Counts tokens over datasets and builds a frequency-ordered [`Vocab`].
#[derive(Debug, Clone)]
pub struct VocabBuilder {
    counts: HashMap<String, usize>,
    min_freq: usize,
    max_size: Option<usize>,
    specials: SpecialTokens,
}

impl Default for VocabBuilder {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            min_freq: 1,
            max_size: None,
            specials: SpecialTokens::default(),
        }
    }
}

impl VocabBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop tokens seen fewer than `min_freq` times.
    pub fn with_min_freq(mut self, min_freq: usize) -> Self {
        self.min_freq = min_freq.max(1);
        self
    }

    /// Cap the number of regular (non-special) tokens.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_specials(mut self, specials: SpecialTokens) -> Self {
        self.specials = specials;
        self
    }

    pub fn add_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> &mut Self {
        for token in tokens {
            *self.counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }
        self
    }

    pub fn add_dataset(&mut self, dataset: &Dataset) -> &mut Self {
        for example in dataset {
            self.add_tokens(example.text());
        }
        self
    }

    /// Regular tokens ordered by descending frequency, ties broken
    /// lexicographically.
    pub fn build(&self) -> Vocab {
        let mut ranked: Vec<(&String, usize)> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count >= self.min_freq)
            .map(|(token, &count)| (token, count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        if let Some(max) = self.max_size {
            ranked.truncate(max);
        }

        debug!(
            counted = self.counts.len(),
            kept = ranked.len(),
            min_freq = self.min_freq,
            "built vocabulary"
        );

        Vocab::with_specials(
            ranked.into_iter().map(|(token, _)| token.clone()),
            self.specials.clone(),
        )
    }
}
