//! Shuffling and partitioning of paired arrays along the sample axis.

use ndarray::{ArrayD, Axis};
use rand::{seq::SliceRandom, Rng};

use super::error::DatasetError;

/// The fraction of samples put in the test group when the caller does not choose one.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// The train and test subsets of a features/labels pair.
///
/// Row `i` of a feature array always belongs with row `i` of the label array of the same group.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<F, L> {
    /// Features of the training samples.
    pub train_features: ArrayD<F>,
    /// Labels of the training samples.
    pub train_labels: ArrayD<L>,
    /// Features of the testing samples.
    pub test_features: ArrayD<F>,
    /// Labels of the testing samples.
    pub test_labels: ArrayD<L>,
}

impl<F, L> Partition<F, L> {
    /// Return the number of samples in the train group.
    pub fn train_len(&self) -> usize {
        self.train_labels.len_of(Axis(0))
    }

    /// Return the number of samples in the test group.
    pub fn test_len(&self) -> usize {
        self.test_labels.len_of(Axis(0))
    }
}

/// Return the number of test samples taken out of `n` samples for the given fraction.
///
/// The count is rounded up, so any non-empty dataset yields at least one test sample.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidFraction`] unless `0 < fraction < 1`.
pub fn test_len(fraction: f64, n: usize) -> Result<usize, DatasetError> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(DatasetError::InvalidFraction(fraction));
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let len = (fraction * n as f64).ceil() as usize;
    Ok(len.min(n))
}

/// Shuffle the samples of `features` and `labels` together and split them into a train and a
/// test group.
///
/// A random permutation of the sample indices is drawn from `rng`. The first
/// [`test_len`] indices form the test group and the rest form the train group, so both arrays
/// are gathered with the same index list.
///
/// # Errors
///
/// Returns an error if either array has no sample axis, if the arrays disagree on the number of
/// samples, if the fraction is invalid, or if one of the groups would be empty.
pub fn shuffle_split<F, L, R>(
    features: &ArrayD<F>,
    labels: &ArrayD<L>,
    fraction: f64,
    rng: &mut R,
) -> Result<Partition<F, L>, DatasetError>
where
    F: Clone,
    L: Clone,
    R: Rng + ?Sized,
{
    let n_features = samples(features)?;
    let n_labels = samples(labels)?;
    if n_features != n_labels {
        return Err(DatasetError::LengthMismatch {
            features: n_features,
            labels: n_labels,
        });
    }

    let n_test = test_len(fraction, n_labels)?;
    let n_train = n_labels - n_test;
    if n_train == 0 || n_test == 0 {
        return Err(DatasetError::EmptyPartition {
            train: n_train,
            test: n_test,
        });
    }

    let mut order: Vec<usize> = (0..n_labels).collect();
    order.shuffle(rng);
    let (test, train) = order.split_at(n_test);

    Ok(Partition {
        train_features: features.select(Axis(0), train),
        train_labels: labels.select(Axis(0), train),
        test_features: features.select(Axis(0), test),
        test_labels: labels.select(Axis(0), test),
    })
}

/// Return the length of the sample axis.
pub(super) fn samples<A>(array: &ArrayD<A>) -> Result<usize, DatasetError> {
    array
        .shape()
        .first()
        .copied()
        .ok_or(DatasetError::MissingSampleAxis)
}
