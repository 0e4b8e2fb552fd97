use std::fmt;

use serde::{Deserialize, Serialize};

/// A single labeled token sequence.
///
/// Examples are immutable once built: the loader creates them, filters see
/// them by reference, and encoders only read them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Example {
    text: Vec<String>,
    label: String,
}

impl Example {
    /// Creates a new example from its tokens and class name.
    #[must_use]
    pub fn new(text: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            text,
            label: label.into(),
        }
    }

    /// Ordered tokens of the example.
    #[must_use]
    pub fn text(&self) -> &[String] {
        &self.text
    }

    /// Class name of the example.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the example has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Splits the example into its tokens and label.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, String) {
        (self.text, self.label)
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.label, self.text.join(" "))
    }
}

/// Anything an encoder can turn into a row of a batch.
pub trait LabeledSequence {
    /// Tokens of the sequence, in order.
    fn tokens(&self) -> &[String];

    /// Class name attached to the sequence.
    fn label(&self) -> &str;
}

impl LabeledSequence for Example {
    fn tokens(&self) -> &[String] {
        &self.text
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl LabeledSequence for (Vec<String>, String) {
    fn tokens(&self) -> &[String] {
        &self.0
    }

    fn label(&self) -> &str {
        &self.1
    }
}

impl<T: LabeledSequence + ?Sized> LabeledSequence for &T {
    fn tokens(&self) -> &[String] {
        (**self).tokens()
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
