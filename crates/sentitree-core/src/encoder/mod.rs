//! # Batch Encoders
//!
//! Turn a list of labeled token sequences into padded `i64` tensors for
//! the three supported model families. Every encoder maps tokens through a
//! [`Vocab`] and labels through a [`LabelEncoding`]; a token or label
//! missing from either mapping fails the whole batch.

pub mod cnn;
pub mod lstm;
pub mod transformer;

pub use cnn::{CnnBatch, CnnEncoder};
pub use lstm::{LstmBatch, LstmEncoder};
pub use transformer::{TransformerBatch, TransformerEncoder};

use candle_core::{Device, Tensor};

use crate::error::{Result, SentitreeError};
use crate::labels::LabelEncoding;
use crate::types::LabeledSequence;
use crate::vocab::Vocab;

/// Converts a batch of labeled sequences into tensors.
pub trait BatchEncoder {
    /// Tensors produced for one batch.
    type Batch;

    /// Encode `batch` into tensors on the encoder's device.
    ///
    /// # Errors
    ///
    /// Fails on an empty batch, an out-of-vocabulary token, or a label
    /// missing from the label encoding.
    fn encode_batch<T: LabeledSequence>(&self, batch: &[T]) -> Result<Self::Batch>;
}

/// Token ids and label ids of a batch before padding.
struct EncodedRows {
    ids: Vec<Vec<u32>>,
    labels: Vec<i64>,
}

/// Look up every token and label of `batch`, optionally wrapping each
/// sequence in `(start, end)` markers.
fn encode_rows<T: LabeledSequence>(
    vocab: &Vocab,
    label_encoding: &LabelEncoding,
    batch: &[T],
    markers: Option<(u32, u32)>,
) -> Result<EncodedRows> {
    if batch.is_empty() {
        return Err(SentitreeError::EmptyBatch);
    }

    let mut ids = Vec::with_capacity(batch.len());
    let mut labels = Vec::with_capacity(batch.len());

    for item in batch {
        let mut row = Vec::with_capacity(item.tokens().len() + 2);
        if let Some((start, _)) = markers {
            row.push(start);
        }
        for token in item.tokens() {
            row.push(vocab.id(token)?);
        }
        if let Some((_, end)) = markers {
            row.push(end);
        }

        ids.push(row);
        labels.push(i64::from(label_encoding.id(item.label())?));
    }

    Ok(EncodedRows { ids, labels })
}

/// Right-pad every row to the longest one and stack into `[batch, max_len]`.
fn pad_and_stack(rows: &[Vec<u32>], pad_id: u32, device: &Device) -> Result<Tensor> {
    let max_len = rows.iter().map(Vec::len).max().unwrap_or(0);
    let pad = i64::from(pad_id);

    let mut data = Vec::with_capacity(rows.len() * max_len);
    for row in rows {
        data.extend(row.iter().map(|&id| i64::from(id)));
        data.extend(std::iter::repeat_n(pad, max_len - row.len()));
    }

    Ok(Tensor::from_vec(data, (rows.len(), max_len), device)?)
}

fn label_tensor(labels: Vec<i64>, device: &Device) -> Result<Tensor> {
    let len = labels.len();
    Ok(Tensor::from_vec(labels, len, device)?)
}
