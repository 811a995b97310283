//! Defines dataset errors.

use std::path::PathBuf;

use ndarray_npy::ReadNpyError;

/// An error type for all operations on a [`DataContainer`](super::DataContainer).
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// An array file could not be opened, read or decoded into the requested element type.
    #[error("failed to load array from {path:?}")]
    Load {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O or format error.
        #[source]
        source: ReadNpyError,
    },
    /// A zero-dimensional array was given where a sample axis is required.
    #[error("array has no sample axis")]
    MissingSampleAxis,
    /// A sample was requested past the end of the sample axis.
    #[error("sample index {index} is out of bounds for an array of {len} samples")]
    SampleOutOfBounds {
        /// The requested sample.
        index: usize,
        /// The number of samples available.
        len: usize,
    },
    /// The operation requires arrays to have been loaded.
    #[error("no arrays have been loaded")]
    NotLoaded,
    /// The operation requires the loaded arrays to have been split.
    #[error("the dataset has not been split")]
    NotSplit,
    /// The test fraction is not strictly between 0 and 1.
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
    /// Features and labels disagree on the number of samples.
    #[error("inconsistent number of samples: {features} features and {labels} labels")]
    LengthMismatch {
        /// Samples in the feature array.
        features: usize,
        /// Samples in the label array.
        labels: usize,
    },
    /// The split would leave one of the groups without samples.
    #[error("split leaves an empty partition ({train} train, {test} test)")]
    EmptyPartition {
        /// Samples that would be assigned to the train group.
        train: usize,
        /// Samples that would be assigned to the test group.
        test: usize,
    },
}
