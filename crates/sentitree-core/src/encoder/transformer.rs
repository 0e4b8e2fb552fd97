use std::sync::Arc;

use candle_core::{Device, Tensor};

use super::{encode_rows, label_tensor, pad_and_stack, BatchEncoder};
use crate::error::{Result, SentitreeError};
use crate::labels::LabelEncoding;
use crate::types::LabeledSequence;
use crate::vocab::Vocab;

/// Marker-wrapped, padded token ids and label ids for a transformer
/// classifier.
#[derive(Debug, Clone)]
pub struct TransformerBatch {
    /// `[batch, max_len + 2]` token ids: `cls`, tokens, `sep`, then padding.
    pub tokens: Tensor,
    /// `[batch]` label ids.
    pub labels: Tensor,
}

/// Encoder for transformer classifiers.
///
/// Every sequence is wrapped in the vocabulary's sequence-start and
/// sequence-end markers before padding.
#[derive(Debug, Clone)]
pub struct TransformerEncoder {
    vocab: Arc<Vocab>,
    label_encoding: Arc<LabelEncoding>,
    cls_id: u32,
    sep_id: u32,
    device: Device,
}

impl TransformerEncoder {
    /// # Errors
    ///
    /// Returns `SentitreeError::MissingSpecialTokens` if the vocabulary
    /// defines no sequence-start or no sequence-end token.
    pub fn new(vocab: Arc<Vocab>, label_encoding: Arc<LabelEncoding>) -> Result<Self> {
        let cls_id = vocab
            .cls_id()
            .ok_or(SentitreeError::MissingSpecialTokens("sequence-start"))?;
        let sep_id = vocab
            .sep_id()
            .ok_or(SentitreeError::MissingSpecialTokens("sequence-end"))?;

        Ok(Self {
            vocab,
            label_encoding,
            cls_id,
            sep_id,
            device: Device::Cpu,
        })
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

impl BatchEncoder for TransformerEncoder {
    type Batch = TransformerBatch;

    fn encode_batch<T: LabeledSequence>(&self, batch: &[T]) -> Result<TransformerBatch> {
        let markers = Some((self.cls_id, self.sep_id));
        let rows = encode_rows(&self.vocab, &self.label_encoding, batch, markers)?;

        Ok(TransformerBatch {
            tokens: pad_and_stack(&rows.ids, self.vocab.pad_id(), &self.device)?,
            labels: label_tensor(rows.labels, &self.device)?,
        })
    }
}
