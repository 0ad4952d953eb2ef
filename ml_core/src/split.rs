use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::MlError;

/// A design matrix and its labels split into a training and a test part.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Randomly splits samples into a training and a held-out test set.
///
/// # Args
/// * `x` - The design matrix, one sample per row.
/// * `y` - One label per sample.
/// * `test_size` - Fraction of samples held out, in `(0, 1)`.
/// * `seed` - Seed for the shuffle; `None` draws one from the OS.
///
/// # Returns
/// The split, with `ceil(test_size * n)` test samples clamped so both parts
/// hold at least one sample.
///
/// # Errors
/// Returns `MlError::InvalidInput` for a `test_size` outside `(0, 1)` or fewer
/// than two samples, and `MlError::ShapeMismatch` if `x` and `y` disagree.
pub fn train_test_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    test_size: f64,
    seed: Option<u64>,
) -> Result<Split, MlError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::InvalidInput("test size must be within (0, 1)"));
    }

    let n = x.nrows();
    if y.len() != n {
        return Err(MlError::ShapeMismatch {
            what: "labels",
            got: y.len(),
            expected: n,
        });
    }

    if n < 2 {
        return Err(MlError::InvalidInput(
            "at least two samples are needed to split",
        ));
    }

    let n_test = ((test_size * n as f64).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut generate_rng(seed));
    let (test_idx, train_idx) = indices.split_at(n_test);

    debug!(train = train_idx.len(), test = test_idx.len(); "dataset split");

    Ok(Split {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}

fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2};

    use super::*;

    fn dataset(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn sizes_follow_test_fraction() {
        let (x, y) = dataset(10);
        let split = train_test_split(x.view(), y.view(), 0.2, Some(42)).unwrap();

        assert_eq!(split.x_train.dim(), (8, 2));
        assert_eq!(split.x_test.dim(), (2, 2));
        assert_eq!(split.y_train.len(), 8);
        assert_eq!(split.y_test.len(), 2);
    }

    #[test]
    fn rows_and_labels_stay_paired() {
        let (x, y) = dataset(25);
        let split = train_test_split(x.view(), y.view(), 0.3, Some(7)).unwrap();

        for (row, label) in split.x_train.rows().into_iter().zip(&split.y_train) {
            assert_eq!(row[0], label * 2.0);
        }
        for (row, label) in split.x_test.rows().into_iter().zip(&split.y_test) {
            assert_eq!(row[0], label * 2.0);
        }

        let mut all: Vec<f64> = split.y_train.iter().chain(&split.y_test).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, y.to_vec());
    }

    #[test]
    fn same_seed_same_split() {
        let (x, y) = dataset(30);
        let a = train_test_split(x.view(), y.view(), 0.2, Some(42)).unwrap();
        let b = train_test_split(x.view(), y.view(), 0.2, Some(42)).unwrap();

        assert_eq!(a.y_test, b.y_test);
        assert_eq!(a.x_train, b.x_train);
    }

    #[test]
    fn both_parts_are_never_empty() {
        let (x, y) = dataset(2);
        let split = train_test_split(x.view(), y.view(), 0.01, None).unwrap();
        assert_eq!(split.y_test.len(), 1);
        assert_eq!(split.y_train.len(), 1);

        let split = train_test_split(x.view(), y.view(), 0.99, None).unwrap();
        assert_eq!(split.y_test.len(), 1);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let (x, y) = dataset(1);
        assert!(train_test_split(x.view(), y.view(), 0.2, None).is_err());

        let (x, y) = dataset(4);
        assert!(train_test_split(x.view(), y.view(), 0.0, None).is_err());
        assert!(train_test_split(x.view(), y.view(), 1.0, None).is_err());
        assert!(train_test_split(x.view(), y.view(), f64::NAN, None).is_err());
        assert!(train_test_split(x.view(), y.slice(ndarray::s![..3]), 0.5, None).is_err());
    }
}
