//! Label encoding: class name to integer id.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentitreeError};
use crate::types::Dataset;

/// Class names of the coarse (3-way) sentiment task, in id order.
pub const SST_COARSE_LABELS: &[&str] = &["negative", "neutral", "positive"];

/// Class names of the fine-grained (5-way) sentiment task, in id order.
pub const SST_FINE_LABELS: &[&str] = &[
    "very negative",
    "negative",
    "neutral",
    "positive",
    "very positive",
];

/// A read-only mapping from class name to id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoding {
    labels: Vec<String>,
    ids: HashMap<String, u32>,
}

impl LabelEncoding {
    /// Ids follow iteration order; repeated labels keep their first id.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut encoding = Self {
            labels: Vec::new(),
            ids: HashMap::new(),
        };
        for label in labels {
            let label = label.into();
            if !encoding.ids.contains_key(&label) {
                encoding.ids.insert(label.clone(), encoding.labels.len() as u32);
                encoding.labels.push(label);
            }
        }
        encoding
    }

    /// Sorted unique labels of `dataset`.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let labels: BTreeSet<&str> = dataset.iter().map(|e| e.label()).collect();
        Self::from_labels(labels)
    }

    /// Canonical sentiment classes, from most negative to most positive.
    pub fn sst(fine_grained: bool) -> Self {
        if fine_grained {
            Self::from_labels(SST_FINE_LABELS.iter().copied())
        } else {
            Self::from_labels(SST_COARSE_LABELS.iter().copied())
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    /// Id of `label`.
    ///
    /// # Errors
    ///
    /// Returns `SentitreeError::UnknownLabel` if the label is not encoded.
    pub fn id(&self, label: &str) -> Result<u32> {
        self.get(label)
            .ok_or_else(|| SentitreeError::UnknownLabel(label.to_string()))
    }

    #[must_use]
    pub fn label(&self, id: u32) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl From<Vec<String>> for LabelEncoding {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<LabelEncoding> for Vec<String> {
    fn from(encoding: LabelEncoding) -> Self {
        encoding.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Example;

    #[test]
    fn sst_label_orders() {
        let coarse = LabelEncoding::sst(false);
        assert_eq!(coarse.len(), 3);
        assert_eq!(coarse.get("negative"), Some(0));
        assert_eq!(coarse.get("positive"), Some(2));
        assert_eq!(coarse.get("very positive"), None);

        let fine = LabelEncoding::sst(true);
        assert_eq!(fine.len(), 5);
        assert_eq!(fine.label(0), Some("very negative"));
        assert_eq!(fine.id("very positive").unwrap(), 4);
    }

    #[test]
    fn from_dataset_sorts_labels() {
        let dataset = Dataset::new(vec![
            Example::new(vec!["x".into()], "positive"),
            Example::new(vec!["y".into()], "negative"),
            Example::new(vec!["z".into()], "positive"),
        ]);
        let encoding = LabelEncoding::from_dataset(&dataset);
        assert_eq!(encoding.labels(), ["negative", "positive"]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = LabelEncoding::sst(false).id("ecstatic").unwrap_err();
        assert!(matches!(err, SentitreeError::UnknownLabel(l) if l == "ecstatic"));
    }

    #[test]
    fn serializes_as_label_list() {
        let encoding = LabelEncoding::from_labels(["neg", "pos"]);
        let json = serde_json::to_string(&encoding).unwrap();
        assert_eq!(json, r#"["neg","pos"]"#);
        let back: LabelEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, encoding);
    }
}
