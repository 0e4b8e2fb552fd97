use std::sync::Arc;

use candle_core::{Device, Tensor};

use super::{encode_rows, label_tensor, pad_and_stack, BatchEncoder};
use crate::error::Result;
use crate::labels::LabelEncoding;
use crate::types::LabeledSequence;
use crate::vocab::Vocab;

/// Padded token ids, label ids and true sequence lengths for a recurrent
/// classifier.
#[derive(Debug, Clone)]
pub struct LstmBatch {
    /// `[batch, max_len]` token ids, right-padded with the vocabulary pad id.
    pub tokens: Tensor,
    /// `[batch]` label ids.
    pub labels: Tensor,
    /// Length of each sequence before padding, in batch order. Needed to
    /// pack the padded batch.
    pub lengths: Vec<usize>,
}

/// Encoder for recurrent (LSTM/GRU) text classifiers.
#[derive(Debug, Clone)]
pub struct LstmEncoder {
    vocab: Arc<Vocab>,
    label_encoding: Arc<LabelEncoding>,
    device: Device,
}

impl LstmEncoder {
    pub fn new(vocab: Arc<Vocab>, label_encoding: Arc<LabelEncoding>) -> Self {
        Self {
            vocab,
            label_encoding,
            device: Device::Cpu,
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

impl BatchEncoder for LstmEncoder {
    type Batch = LstmBatch;

    fn encode_batch<T: LabeledSequence>(&self, batch: &[T]) -> Result<LstmBatch> {
        let rows = encode_rows(&self.vocab, &self.label_encoding, batch, None)?;
        let lengths = rows.ids.iter().map(Vec::len).collect();

        Ok(LstmBatch {
            tokens: pad_and_stack(&rows.ids, self.vocab.pad_id(), &self.device)?,
            labels: label_tensor(rows.labels, &self.device)?,
            lengths,
        })
    }
}
