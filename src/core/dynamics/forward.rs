//! 순방향 동역학 F(x, h_prev) = tanh(h_s Whh + x Wxh + bh)

use nalgebra::DMatrix;
use rand::Rng;

use super::sampling::SamplingStrategy;
use super::trajectory::{SequenceBatch, Trajectory};
use crate::core::math::{add_row_broadcast, tanh};
use crate::core::params::{ParamName, ParameterStore};

/// 한 시점 순방향 전이
///
/// 결정적 전략이면 rng를 건드리지 않는 순수 함수다.
pub fn forward_step<R: Rng + ?Sized>(
    params: &ParameterStore,
    sampling: SamplingStrategy,
    x: &DMatrix<f64>,
    h_prev: &DMatrix<f64>,
    rng: &mut R,
) -> DMatrix<f64> {
    let hs = sampling.apply(h_prev, rng);
    let z = &hs * params.value(ParamName::Whh) + x * params.value(ParamName::Wxh);
    tanh(&add_row_broadcast(&z, params.value(ParamName::Bh)))
}

/// 영 상태에서 시작해 전체 시퀀스의 은닉 궤적 생성
pub fn run_hidden<R: Rng + ?Sized>(
    params: &ParameterStore,
    sampling: SamplingStrategy,
    xs: &SequenceBatch,
    rng: &mut R,
) -> Trajectory {
    let n_hid = params.shape().n_hid;
    let mut h = Trajectory::with_capacity(xs.len());
    let mut prev = DMatrix::zeros(xs.batch_size(), n_hid);

    for x in xs.iter() {
        let next = forward_step(params, sampling, x, &prev, rng);
        h.push(next.clone());
        prev = next;
    }
    h
}
