pub mod dataset;
pub mod example;

pub use dataset::{Dataset, Split};
pub use example::{Example, LabeledSequence};
