mod inverse_path_test;

use crate::core::dynamics::SequenceBatch;
use crate::core::params::{NetworkShape, ParameterStore, WeightInit};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 작은 고정 네트워크와 입력
pub(super) fn small_problem(seed: u64) -> (ParameterStore, SequenceBatch) {
    let shape = NetworkShape { n_inp: 3, n_hid: 5, n_out: 2 };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut params = ParameterStore::new(shape, WeightInit::Orthogonal, &mut rng).unwrap();
    for name in crate::core::params::ParamName::ALL {
        let p = params.get_mut(name);
        if p.value.nrows() == 1 {
            p.value = DMatrix::from_fn(1, p.value.ncols(), |_, j| 0.05 * (j as f64 - 1.0));
        }
    }
    let steps = (0..4)
        .map(|k| DMatrix::from_fn(4, 3, |i, j| ((k * 5 + i * 3 + j) as f64 * 0.43).sin()))
        .collect();
    (params, SequenceBatch::new(steps).unwrap())
}

/// 중앙 차분 그래디언트
pub(super) fn finite_difference<F>(value: &DMatrix<f64>, mut loss: F) -> DMatrix<f64>
where
    F: FnMut(&DMatrix<f64>) -> f64,
{
    let eps = 1e-6;
    let mut grad = DMatrix::zeros(value.nrows(), value.ncols());
    for i in 0..value.nrows() {
        for j in 0..value.ncols() {
            let mut plus = value.clone();
            plus[(i, j)] += eps;
            let mut minus = value.clone();
            minus[(i, j)] -= eps;
            grad[(i, j)] = (loss(&plus) - loss(&minus)) / (2.0 * eps);
        }
    }
    grad
}

/// ‖a − b‖ / max(‖a‖, ‖b‖)
pub(super) fn relative_error(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    let denom = a.norm().max(b.norm()).max(1e-12);
    (a - b).norm() / denom
}
