use std::path::{Path, PathBuf};

use holdout::dataset::{DataContainer, DatasetError};
use ndarray::{ArrayD, Axis, IxDyn};
use ndarray_npy::{write_npy, WritableElement};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use tempfile::TempDir;

#[test]
fn load_and_split_images() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f32>::zeros(IxDyn(&[10, 4, 4])));
    let label_path = write(dir.path(), "labels.npy", &ArrayD::<i64>::zeros(IxDyn(&[10])));

    let mut data = DataContainer::<f32, i64>::new(3);
    data.load(&label_path, &data_path).unwrap();
    assert_eq!(data.length(), 10);
    assert_eq!(data.shape(), &[4, 4]);
    assert_eq!(data.output_size(), 3);

    data.split(0.3).unwrap();
    assert_eq!(data.test_features().unwrap().len_of(Axis(0)), 3);
    assert_eq!(data.train_features().unwrap().len_of(Axis(0)), 7);
    assert_eq!(data.test_labels().unwrap().len(), 3);
    assert_eq!(data.train_labels().unwrap().len(), 7);
    assert_eq!(data.train_features().unwrap().shape(), &[7, 4, 4]);
}

#[test]
fn split_keeps_features_with_their_labels() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(12345);
    let (features, labels) = marked(&mut rng, 40, 6);
    let data_path = write(dir.path(), "features.npy", &features);
    let label_path = write(dir.path(), "labels.npy", &labels);

    let mut data = DataContainer::<f64, i64>::default();
    data.load(&label_path, &data_path).unwrap();
    assert_eq!(data.features().unwrap(), &features);
    assert_eq!(data.labels().unwrap(), &labels);

    data.split_with_rng(0.2, &mut rng).unwrap();
    assert_aligned(data.train_features().unwrap(), data.train_labels().unwrap());
    assert_aligned(data.test_features().unwrap(), data.test_labels().unwrap());
    assert_eq!(data.test_labels().unwrap().len(), 8);
    assert_eq!(data.train_labels().unwrap().len(), 32);
}

#[test]
fn unseeded_splits_differ() {
    let mut rng = StdRng::seed_from_u64(0);
    let (features, labels) = marked(&mut rng, 200, 2);
    let mut data = DataContainer::<f64, i64>::default();
    data.load_arrays(labels, features).unwrap();

    data.split(0.5).unwrap();
    let first = data.test_labels().unwrap().clone();
    data.split(0.5).unwrap();
    let second = data.test_labels().unwrap().clone();
    // Two shuffles of 200 samples agree with negligible probability.
    assert_ne!(first, second);
}

#[test]
fn seeded_splits_agree() {
    let mut rng = StdRng::seed_from_u64(0);
    let (features, labels) = marked(&mut rng, 30, 2);
    let mut data = DataContainer::<f64, i64>::default();
    data.load_arrays(labels, features).unwrap();

    data.split_with_rng(0.3, &mut StdRng::seed_from_u64(9)).unwrap();
    let first = data.partition().unwrap().clone();
    data.split_with_rng(0.3, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(data.partition().unwrap(), &first);
}

#[test]
fn load_missing_file() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f32>::zeros(IxDyn(&[4, 2])));
    let label_path = dir.path().join("missing.npy");

    let mut data = DataContainer::<f32, i64>::new(3);
    let err = data.load(&label_path, &data_path).unwrap_err();
    match err {
        DatasetError::Load { path, .. } => assert_eq!(path, label_path),
        err => panic!("unexpected error: {err}"),
    }
    assert!(!data.is_loaded());
    assert_eq!(data.length(), 0);
}

#[test]
fn load_wrong_element_type() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f64>::zeros(IxDyn(&[4, 2])));
    let label_path = write(dir.path(), "labels.npy", &ArrayD::<i64>::zeros(IxDyn(&[4])));

    let mut data = DataContainer::<f32, i64>::new(3);
    let err = data.load(&label_path, &data_path).unwrap_err();
    assert!(matches!(err, DatasetError::Load { path, .. } if path == data_path));
}

#[test]
fn load_file_that_is_not_npy() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f32>::zeros(IxDyn(&[4, 2])));
    let label_path = dir.path().join("labels.npy");
    std::fs::write(&label_path, b"not an array").unwrap();

    let mut data = DataContainer::<f32, i64>::new(3);
    assert!(matches!(
        data.load(&label_path, &data_path),
        Err(DatasetError::Load { .. })
    ));
}

#[test]
fn load_single_feature_sample() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f32>::zeros(IxDyn(&[1, 4, 4])));
    let label_path = write(dir.path(), "labels.npy", &ArrayD::<i64>::zeros(IxDyn(&[1])));

    let mut data = DataContainer::<f32, i64>::new(3);
    assert!(matches!(
        data.load(&label_path, &data_path),
        Err(DatasetError::SampleOutOfBounds { index: 1, len: 1 })
    ));
}

#[test]
fn mismatched_lengths_fail_at_split() {
    let dir = TempDir::new().unwrap();
    let data_path = write(dir.path(), "images.npy", &ArrayD::<f32>::zeros(IxDyn(&[12, 3])));
    let label_path = write(dir.path(), "labels.npy", &ArrayD::<i64>::zeros(IxDyn(&[10])));

    let mut data = DataContainer::<f32, i64>::new(3);
    data.load(&label_path, &data_path).unwrap();
    assert_eq!(data.length(), 10);
    assert!(matches!(
        data.split(0.2),
        Err(DatasetError::LengthMismatch {
            features: 12,
            labels: 10
        })
    ));
}

#[test]
fn split_before_load_and_accessors_before_split() {
    let mut data = DataContainer::<f32, i64>::new(3);
    assert!(matches!(data.split_default(), Err(DatasetError::NotLoaded)));
    assert!(matches!(data.partition(), Err(DatasetError::NotSplit)));
    assert!(matches!(data.train_features(), Err(DatasetError::NotSplit)));
    assert!(matches!(data.test_labels(), Err(DatasetError::NotSplit)));
}

#[test]
fn errors_have_messages() {
    let err = DatasetError::SampleOutOfBounds { index: 1, len: 1 };
    assert_eq!(
        err.to_string(),
        "sample index 1 is out of bounds for an array of 1 samples"
    );
    let err = DatasetError::InvalidFraction(1.5);
    assert_eq!(err.to_string(), "test fraction must be in (0, 1), got 1.5");
}

/// Build `n` feature rows whose first column is the row's label, the rest being noise.
fn marked<R: Rng>(rng: &mut R, n: usize, width: usize) -> (ArrayD<f64>, ArrayD<i64>) {
    #[allow(clippy::cast_precision_loss)]
    let features = ArrayD::from_shape_fn(IxDyn(&[n, width]), |idx| {
        if idx[1] == 0 {
            idx[0] as f64
        } else {
            rng.sample(StandardNormal)
        }
    });
    let labels = ArrayD::from_shape_fn(IxDyn(&[n]), |idx| idx[0] as i64);
    (features, labels)
}

fn assert_aligned(features: &ArrayD<f64>, labels: &ArrayD<i64>) {
    assert_eq!(features.len_of(Axis(0)), labels.len());
    for (row, label) in features.axis_iter(Axis(0)).zip(labels.iter()) {
        #[allow(clippy::cast_precision_loss)]
        let marker = *label as f64;
        assert!((row[0] - marker).abs() <= f64::EPSILON, "{row:?} != {label}");
    }
}

fn write<A: WritableElement>(dir: &Path, name: &str, array: &ArrayD<A>) -> PathBuf {
    let path = dir.join(name);
    write_npy(&path, array).unwrap();
    path
}
