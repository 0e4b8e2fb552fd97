//! Reading split files and turning parsed trees into examples.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sentitree_core::parser::{parse_line_tree, Tokenizer};
use sentitree_core::{Example, SentitreeError};
use tracing::debug;

use crate::error::{DatasetError, Result};

/// Predicate deciding whether an example is kept.
pub type FilterFn = dyn Fn(&Example) -> bool;

/// Raw tree label to class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    names: HashMap<String, String>,
}

impl LabelMap {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Five sentiment levels `0..=4`, folded to three classes unless
    /// `fine_grained` is set.
    pub fn sst(fine_grained: bool) -> Self {
        let prefix = if fine_grained { "very " } else { "" };
        Self::new([
            ("0", format!("{prefix}negative")),
            ("1", "negative".to_string()),
            ("2", "neutral".to_string()),
            ("3", "positive".to_string()),
            ("4", format!("{prefix}positive")),
        ])
    }

    /// Class name of a raw tree label.
    pub fn get(&self, raw: &str) -> std::result::Result<&str, SentitreeError> {
        self.names
            .get(raw)
            .map(String::as_str)
            .ok_or_else(|| SentitreeError::UnknownTreeLabel(raw.to_string()))
    }
}

/// One tree, or subtree, read from a split file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    /// 1-based line the tree came from.
    pub line: usize,
    pub leaves: Vec<String>,
    pub label: String,
}

/// Parse every non-blank line of a tree file into records, expanding
/// subtrees when asked.
pub fn read_tree_file(path: &Path, subtrees: bool) -> Result<Vec<TreeRecord>> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = parse_line_tree(&line, subtrees).map_err(|source| DatasetError::Line {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.extend(parsed.into_iter().map(|(leaves, label)| TreeRecord {
            line: index + 1,
            leaves,
            label,
        }));
    }

    debug!(path = %path.display(), records = records.len(), subtrees, "read tree file");
    Ok(records)
}

/// Turns `(leaves, raw label)` pairs into examples.
pub struct ExampleMapper<'a> {
    label_map: &'a LabelMap,
    tokenizer: Option<&'a dyn Tokenizer>,
    filter: Option<&'a FilterFn>,
}

impl<'a> ExampleMapper<'a> {
    pub fn new(label_map: &'a LabelMap) -> Self {
        Self {
            label_map,
            tokenizer: None,
            filter: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Option<&'a dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_filter(mut self, filter: Option<&'a FilterFn>) -> Self {
        self.filter = filter;
        self
    }

    /// Build the example for one pair.
    ///
    /// Returns `Ok(None)` when tokenization leaves nothing or the filter
    /// rejects the example.
    ///
    /// # Errors
    ///
    /// Fails on a raw label missing from the label map or a tokenizer error.
    pub fn map(
        &self,
        leaves: Vec<String>,
        raw_label: &str,
    ) -> std::result::Result<Option<Example>, SentitreeError> {
        let label = self.label_map.get(raw_label)?;

        let text = match self.tokenizer {
            Some(tokenizer) => tokenizer.tokenize(&leaves.join(" "))?,
            None => leaves,
        };
        if text.is_empty() {
            return Ok(None);
        }

        let example = Example::new(text, label);
        if let Some(filter) = self.filter {
            if !filter(&example) {
                return Ok(None);
            }
        }

        Ok(Some(example))
    }

    /// Map every record read from `path`, dropping the ones
    /// [`ExampleMapper::map`] discards. Failures carry the record's line.
    pub fn map_all(&self, path: &Path, records: Vec<TreeRecord>) -> Result<Vec<Example>> {
        let mut examples = Vec::with_capacity(records.len());
        for record in records {
            let mapped = self
                .map(record.leaves, &record.label)
                .map_err(|source| DatasetError::Line {
                    path: path.to_path_buf(),
                    line: record.line,
                    source,
                })?;
            examples.extend(mapped);
        }
        Ok(examples)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sentitree_core::parser::BasicEnglishTokenizer;

    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn record(line: usize, text: &str, label: &str) -> TreeRecord {
        TreeRecord {
            line,
            leaves: words(text),
            label: label.to_string(),
        }
    }

    #[test]
    fn sst_label_map_coarse_and_fine() {
        let coarse = LabelMap::sst(false);
        assert_eq!(coarse.get("0").unwrap(), "negative");
        assert_eq!(coarse.get("4").unwrap(), "positive");
        assert_eq!(coarse.get("2").unwrap(), "neutral");

        let fine = LabelMap::sst(true);
        assert_eq!(fine.get("0").unwrap(), "very negative");
        assert_eq!(fine.get("1").unwrap(), "negative");
        assert_eq!(fine.get("4").unwrap(), "very positive");

        assert!(matches!(coarse.get("5"), Err(SentitreeError::UnknownTreeLabel(_))));
    }

    #[test]
    fn read_tree_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.txt");
        fs::write(&path, "(3 (2 a) (3 fine))\n\n(1 (1 dull))\n").unwrap();

        let records = read_tree_file(&path, false).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            TreeRecord {
                line: 3,
                leaves: words("dull"),
                label: "1".to_string(),
            }
        );

        let expanded = read_tree_file(&path, true).unwrap();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[..3].iter().all(|r| r.line == 1));
    }

    #[test]
    fn read_tree_file_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.txt");
        fs::write(&path, "(2 ok)\n(3 (2 broken)\n").unwrap();

        match read_tree_file(&path, false).unwrap_err() {
            DatasetError::Line { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(matches!(source, SentitreeError::MalformedTree { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_tree_file_names_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trees/train.txt");

        let err = read_tree_file(&path, false).unwrap_err();
        assert!(matches!(&err, DatasetError::Open { path: p, .. } if *p == path));
        assert!(err.to_string().contains("trees/train.txt"));
    }

    #[test]
    fn mapper_identity_split_keeps_leaves() {
        let labels = LabelMap::sst(false);
        let mapper = ExampleMapper::new(&labels);
        let example = mapper.map(words("It 's Fine"), "3").unwrap().unwrap();
        assert_eq!(example.text(), ["It", "'s", "Fine"]);
        assert_eq!(example.label(), "positive");
    }

    #[test]
    fn mapper_applies_tokenizer_and_filter() {
        let labels = LabelMap::sst(true);
        let tokenizer = BasicEnglishTokenizer::new().unwrap();
        let not_neutral = |e: &Example| e.label() != "neutral";
        let mapper = ExampleMapper::new(&labels)
            .with_tokenizer(Some(&tokenizer))
            .with_filter(Some(&not_neutral));

        let kept = mapper.map(words("Great , Really"), "4").unwrap().unwrap();
        assert_eq!(kept.text(), ["great", ",", "really"]);
        assert_eq!(kept.label(), "very positive");

        assert!(mapper.map(words("meh"), "2").unwrap().is_none());
    }

    #[test]
    fn mapper_drops_empty_token_lists() {
        let labels = LabelMap::sst(false);
        let drop_all = |_: &str| -> Vec<String> { Vec::new() };
        let mapper = ExampleMapper::new(&labels).with_tokenizer(Some(&drop_all));

        let records = vec![record(1, "a", "1"), record(2, "b", "3")];
        let examples = mapper.map_all(Path::new("dev.txt"), records).unwrap();
        assert!(examples.is_empty());
    }

    #[test]
    fn map_all_reports_line_of_unknown_label() {
        let labels = LabelMap::sst(false);
        let records = vec![record(1, "fine", "3"), record(4, "odd", "7")];

        match ExampleMapper::new(&labels)
            .map_all(Path::new("dev.txt"), records)
            .unwrap_err()
        {
            DatasetError::Line { path, line, source } => {
                assert_eq!(path, Path::new("dev.txt"));
                assert_eq!(line, 4);
                assert!(matches!(source, SentitreeError::UnknownTreeLabel(l) if l == "7"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mapper_unknown_raw_label() {
        let labels = LabelMap::sst(false);
        let err = ExampleMapper::new(&labels).map(words("x"), "9").unwrap_err();
        assert!(matches!(err, SentitreeError::UnknownTreeLabel(l) if l == "9"));
    }
}
