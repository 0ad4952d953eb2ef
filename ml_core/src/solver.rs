//! Dense symmetric linear algebra used by the least squares fit.

use ndarray::{Array1, Array2, ArrayView1};

const MAX_SWEEPS: usize = 100;

/// Eigenvalues smaller than this fraction of the largest one are treated as zero.
const RCOND: f64 = 1e-10;

/// Eigendecomposition of a symmetric matrix through cyclic Jacobi rotations.
///
/// # Returns
/// The eigenvalues and a matrix whose `i`-th column is the eigenvector of the
/// `i`-th eigenvalue. Eigenvalues are not sorted.
pub(crate) fn symmetric_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::eye(n);

    let norm = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        return (Array1::zeros(n), v);
    }

    for _ in 0..MAX_SWEEPS {
        let off = (0..n)
            .flat_map(|p| (p + 1..n).map(move |q| (p, q)))
            .map(|(p, q)| a[[p, q]] * a[[p, q]])
            .sum::<f64>()
            .sqrt();

        if off <= f64::EPSILON * norm {
            break;
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }

                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = t * c;

                for k in 0..n {
                    let (akp, akq) = (a[[k, p]], a[[k, q]]);
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }

                for k in 0..n {
                    let (apk, aqk) = (a[[p, k]], a[[q, k]]);
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }

                for k in 0..n {
                    let (vkp, vkq) = (v[[k, p]], v[[k, q]]);
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

/// Minimum norm solution of `gram · w = rhs` for a symmetric positive
/// semi-definite `gram`, i.e. `w = gram⁺ · rhs`.
///
/// Directions whose eigenvalue falls under `RCOND` times the largest one are
/// left out of the solution, so singular systems resolve to the solution with
/// the smallest euclidean norm.
pub(crate) fn min_norm_solve(gram: Array2<f64>, rhs: ArrayView1<f64>) -> Array1<f64> {
    let n = gram.nrows();
    let (eigvals, eigvecs) = symmetric_eigen(gram);

    let mut w = Array1::zeros(n);
    let max = eigvals.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return w;
    }

    let cutoff = max * RCOND;
    for (i, &lambda) in eigvals.iter().enumerate() {
        if lambda > cutoff {
            let u = eigvecs.column(i);
            w.scaled_add(u.dot(&rhs) / lambda, &u);
        }
    }

    w
}
