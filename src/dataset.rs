//! Data structures and methods for dealing with datasets.
//!
//! A [`DataContainer`] owns a feature array and a label array whose first axis indexes the
//! samples. It goes through three states: constructed, loaded and split.
//!
//! ```no_run
//! use holdout::dataset::DataContainer;
//!
//! # fn main() -> Result<(), holdout::dataset::DatasetError> {
//! let mut data = DataContainer::<f32, i64>::new(3);
//! data.load("labels.npy", "images.npy")?;
//! data.split(0.3)?;
//! println!("{} training samples", data.train_labels()?.len());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use ndarray::{ArrayD, Axis};
use ndarray_npy::ReadableElement;
use rand::Rng;
use tracing::{debug, info};

mod error;
pub mod split;

pub use error::DatasetError;
pub use split::{shuffle_split, Partition, DEFAULT_TEST_FRACTION};

/// The output size used by [`DataContainer::default`].
pub const DEFAULT_OUTPUT_SIZE: usize = 5;

/// A container of features and labels that can be split into train and test partitions.
///
/// `F` is the element type of the feature array and `L` the element type of the label array.
#[derive(Debug, Clone)]
pub struct DataContainer<F = f32, L = f32> {
    output_size: usize,
    shape: Vec<usize>,
    length: usize,
    arrays: Option<Arrays<F, L>>,
    partition: Option<Partition<F, L>>,
}

#[derive(Debug, Clone)]
struct Arrays<F, L> {
    features: ArrayD<F>,
    labels: ArrayD<L>,
}

impl<F, L> Default for DataContainer<F, L> {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_SIZE)
    }
}

impl<F, L> DataContainer<F, L> {
    /// Create an empty container.
    ///
    /// `output_size` is the dimensionality of a model's output and is only kept as metadata.
    pub fn new(output_size: usize) -> Self {
        Self {
            output_size,
            shape: Vec::new(),
            length: 0,
            arrays: None,
            partition: None,
        }
    }

    /// Read the labels and the features from two `.npy` files.
    ///
    /// Both files are read before the container is modified. See [`Self::load_arrays`] for the
    /// checks done on the arrays.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Load`] if a file can't be read or doesn't hold an array of the
    /// requested element type, and any error from [`Self::load_arrays`].
    pub fn load<P, Q>(&mut self, label_path: P, data_path: Q) -> Result<(), DatasetError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: ReadableElement,
        L: ReadableElement,
    {
        let labels = read_array(label_path.as_ref())?;
        let features = read_array(data_path.as_ref())?;
        self.load_arrays(labels, features)
    }

    /// Replace the stored arrays, discarding any previous partition.
    ///
    /// The length is taken from the label array, and the sample shape from the *second*
    /// feature sample. Whether the two arrays have the same number of samples is only checked
    /// when splitting.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingSampleAxis`] if the labels are zero-dimensional, and
    /// [`DatasetError::SampleOutOfBounds`] if there are fewer than 2 feature samples.
    pub fn load_arrays(
        &mut self,
        labels: ArrayD<L>,
        features: ArrayD<F>,
    ) -> Result<(), DatasetError> {
        let length = split::samples(&labels)?;
        let shape = sample_shape(&features, 1)?;

        info!(
            features = ?features.shape(),
            labels = ?labels.shape(),
            "loaded arrays"
        );

        self.length = length;
        self.shape = shape;
        self.arrays = Some(Arrays { features, labels });
        self.partition = None;
        Ok(())
    }

    /// Shuffle the loaded samples and split them, putting `fraction` of them in the test group.
    ///
    /// The shuffle uses the thread-local generator, so repeated calls give different
    /// partitions. Use [`Self::split_with_rng`] for reproducible ones.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotLoaded`] before a successful load, and any error from
    /// [`shuffle_split`].
    pub fn split(&mut self, fraction: f64) -> Result<(), DatasetError>
    where
        F: Clone,
        L: Clone,
    {
        self.split_with_rng(fraction, &mut rand::thread_rng())
    }

    /// Split with [`DEFAULT_TEST_FRACTION`] of the samples in the test group.
    ///
    /// # Errors
    ///
    /// See [`Self::split`].
    pub fn split_default(&mut self) -> Result<(), DatasetError>
    where
        F: Clone,
        L: Clone,
    {
        self.split(DEFAULT_TEST_FRACTION)
    }

    /// Shuffle the loaded samples with `rng` and split them, putting `fraction` of them in the
    /// test group.
    ///
    /// # Errors
    ///
    /// See [`Self::split`].
    pub fn split_with_rng<R>(&mut self, fraction: f64, rng: &mut R) -> Result<(), DatasetError>
    where
        F: Clone,
        L: Clone,
        R: Rng + ?Sized,
    {
        let arrays = self.arrays.as_ref().ok_or(DatasetError::NotLoaded)?;
        let partition = shuffle_split(&arrays.features, &arrays.labels, fraction, rng)?;
        debug!(
            train = partition.train_len(),
            test = partition.test_len(),
            "split dataset"
        );
        self.partition = Some(partition);
        Ok(())
    }

    /// Return the shape of a single feature sample, empty before loading.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the output size given at construction.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Return the number of samples in the label array, 0 before loading.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Return whether arrays have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.arrays.is_some()
    }

    /// Return whether the loaded arrays have been split.
    pub fn is_split(&self) -> bool {
        self.partition.is_some()
    }

    /// Return the loaded feature array.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotLoaded`] before loading.
    pub fn features(&self) -> Result<&ArrayD<F>, DatasetError> {
        Ok(&self.arrays()?.features)
    }

    /// Return the loaded label array.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotLoaded`] before loading.
    pub fn labels(&self) -> Result<&ArrayD<L>, DatasetError> {
        Ok(&self.arrays()?.labels)
    }

    /// Return the current partition.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotSplit`] before splitting.
    pub fn partition(&self) -> Result<&Partition<F, L>, DatasetError> {
        self.partition.as_ref().ok_or(DatasetError::NotSplit)
    }

    /// Return the features of the train group.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotSplit`] before splitting.
    pub fn train_features(&self) -> Result<&ArrayD<F>, DatasetError> {
        Ok(&self.partition()?.train_features)
    }

    /// Return the labels of the train group.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotSplit`] before splitting.
    pub fn train_labels(&self) -> Result<&ArrayD<L>, DatasetError> {
        Ok(&self.partition()?.train_labels)
    }

    /// Return the features of the test group.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotSplit`] before splitting.
    pub fn test_features(&self) -> Result<&ArrayD<F>, DatasetError> {
        Ok(&self.partition()?.test_features)
    }

    /// Return the labels of the test group.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotSplit`] before splitting.
    pub fn test_labels(&self) -> Result<&ArrayD<L>, DatasetError> {
        Ok(&self.partition()?.test_labels)
    }

    fn arrays(&self) -> Result<&Arrays<F, L>, DatasetError> {
        self.arrays.as_ref().ok_or(DatasetError::NotLoaded)
    }
}

fn read_array<A>(path: &Path) -> Result<ArrayD<A>, DatasetError>
where
    A: ReadableElement,
{
    ndarray_npy::read_npy(path).map_err(|source| DatasetError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Return the shape of the sample at `index`, without the sample axis.
fn sample_shape<A>(array: &ArrayD<A>, index: usize) -> Result<Vec<usize>, DatasetError> {
    let len = array.shape().first().copied().unwrap_or(0);
    if index >= len {
        return Err(DatasetError::SampleOutOfBounds { index, len });
    }
    Ok(array.index_axis(Axis(0), index).shape().to_vec())
}
