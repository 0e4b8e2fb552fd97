use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::slice;

use serde::{Deserialize, Serialize};

use super::example::Example;

/// The three partitions of a labeled corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    /// All splits, in load order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// File name of the split inside the corpus `trees/` directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Train => "train.txt",
            Self::Validation => "dev.txt",
            Self::Test => "test.txt",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Validation => write!(f, "validation"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// An ordered, read-only collection of examples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    #[must_use]
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Example> {
        self.examples.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Example> {
        self.examples.iter()
    }

    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Contiguous batches of `size` examples; the last one may be shorter.
    ///
    /// # Panics
    /// Panics if `size` is zero.
    pub fn batches(&self, size: usize) -> slice::Chunks<'_, Example> {
        self.examples.chunks(size)
    }

    /// Number of examples per class name.
    #[must_use]
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for example in &self.examples {
            *counts.entry(example.label()).or_insert(0) += 1;
        }
        counts
    }
}

impl From<Vec<Example>> for Dataset {
    fn from(examples: Vec<Example>) -> Self {
        Self::new(examples)
    }
}

impl FromIterator<Example> for Dataset {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Dataset {
    type Output = Example;

    fn index(&self, index: usize) -> &Example {
        &self.examples[index]
    }
}

impl IntoIterator for Dataset {
    type Item = Example;
    type IntoIter = std::vec::IntoIter<Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Example;
    type IntoIter = slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
