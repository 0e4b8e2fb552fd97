use std::sync::Arc;

use candle_core::{Device, Tensor};

use super::{encode_rows, label_tensor, pad_and_stack, BatchEncoder};
use crate::error::Result;
use crate::labels::LabelEncoding;
use crate::types::LabeledSequence;
use crate::vocab::Vocab;

/// Padded token ids and label ids for a convolutional classifier.
#[derive(Debug, Clone)]
pub struct CnnBatch {
    /// `[batch, max_len]` token ids, right-padded with the vocabulary pad id.
    pub tokens: Tensor,
    /// `[batch]` label ids.
    pub labels: Tensor,
}

/// Encoder for convolutional text classifiers.
#[derive(Debug, Clone)]
pub struct CnnEncoder {
    vocab: Arc<Vocab>,
    label_encoding: Arc<LabelEncoding>,
    device: Device,
}

impl CnnEncoder {
    pub fn new(vocab: Arc<Vocab>, label_encoding: Arc<LabelEncoding>) -> Self {
        Self {
            vocab,
            label_encoding,
            device: Device::Cpu,
        }
    }

    /// Place the produced tensors on `device`.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

impl BatchEncoder for CnnEncoder {
    type Batch = CnnBatch;

    fn encode_batch<T: LabeledSequence>(&self, batch: &[T]) -> Result<CnnBatch> {
        let rows = encode_rows(&self.vocab, &self.label_encoding, batch, None)?;

        Ok(CnnBatch {
            tokens: pad_and_stack(&rows.ids, self.vocab.pad_id(), &self.device)?,
            labels: label_tensor(rows.labels, &self.device)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SentitreeError;
    use crate::types::Example;
    use crate::vocab::SpecialTokens;

    fn example(text: &str, label: &str) -> Example {
        Example::new(text.split_whitespace().map(String::from).collect(), label)
    }

    fn encoder() -> CnnEncoder {
        let vocab = Vocab::with_specials(
            ["a", "good", "film", "bad"],
            SpecialTokens::new().with_pad("<pad>"),
        );
        CnnEncoder::new(Arc::new(vocab), Arc::new(LabelEncoding::sst(false)))
    }

    #[test]
    fn test_cnn_pads_to_longest() {
        let batch = vec![example("a good film", "positive"), example("bad", "negative")];
        let out = encoder().encode_batch(&batch).unwrap();

        assert_eq!(out.tokens.dims(), &[2, 3]);
        assert_eq!(
            out.tokens.to_vec2::<i64>().unwrap(),
            vec![vec![1, 2, 3], vec![4, 0, 0]]
        );
        assert_eq!(out.labels.to_vec1::<i64>().unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_cnn_accepts_raw_pairs() {
        let batch = vec![(vec!["film".to_string()], "neutral".to_string())];
        let out = encoder().encode_batch(&batch).unwrap();
        assert_eq!(out.tokens.to_vec2::<i64>().unwrap(), vec![vec![3]]);
        assert_eq!(out.labels.to_vec1::<i64>().unwrap(), vec![1]);
    }

    #[test]
    fn test_cnn_unknown_token() {
        let batch = vec![example("a terrible film", "negative")];
        let err = encoder().encode_batch(&batch).unwrap_err();
        assert!(matches!(err, SentitreeError::UnknownToken(t) if t == "terrible"));
    }

    #[test]
    fn test_cnn_unknown_label() {
        let batch = vec![example("a film", "very positive")];
        let err = encoder().encode_batch(&batch).unwrap_err();
        assert!(matches!(err, SentitreeError::UnknownLabel(_)));
    }
}
