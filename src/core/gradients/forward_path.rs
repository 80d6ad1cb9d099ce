//! 순방향 경로(Whh, Wxh, bh) 그래디언트
//!
//! h[t]를 예측, h_[t]를 정답으로 보고 시점별 국소 오차를 투영한다.
//!
//! ```text
//! δ_t = 2 (h[t] − h_[t]) ⊙ (1 − h[t]²)
//! ∂Whh += h[t-1]ᵀ δ_t / B,  ∂Wxh += x[t-1]ᵀ δ_t / B,  ∂bh += Σ_b δ_t / B
//! ```
//!
//! t = 0 에서 h[-1], x[-1] 은 영 초기 상태/영 입력으로 둔다. 따라서 t = 0 은
//! bh 에만 기여한다.

use anyhow::{ensure, Result};
use nalgebra::DMatrix;

use crate::core::dynamics::{SequenceBatch, Trajectory};
use crate::core::math::{column_sum, tanh_derivative_from_output};
use crate::core::params::{ParamName, ParameterStore};

/// 순환 순방향 파라미터 그래디언트
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardGradients {
    pub whh: DMatrix<f64>,
    pub wxh: DMatrix<f64>,
    pub bh: DMatrix<f64>,
}

impl ForwardGradients {
    pub fn zeros(n_inp: usize, n_hid: usize) -> Self {
        Self {
            whh: DMatrix::zeros(n_hid, n_hid),
            wxh: DMatrix::zeros(n_inp, n_hid),
            bh: DMatrix::zeros(1, n_hid),
        }
    }

    /// 실제 궤적 h와 목표 궤적 h_ 의 차이로부터 그래디언트 합산
    pub fn compute(xs: &SequenceBatch, h: &Trajectory, targets: &Trajectory) -> Result<Self> {
        ensure!(!h.is_empty(), "hidden trajectory is empty");
        ensure!(
            xs.len() == h.len() && targets.len() == h.len(),
            "sequence lengths differ: inputs {}, hidden {}, targets {}",
            xs.len(),
            h.len(),
            targets.len()
        );

        let batch = h[0].nrows();
        let n_hid = h[0].ncols();
        let n_inp = xs.input_dim();
        let scale = batch.max(1) as f64;
        let mut grads = Self::zeros(n_inp, n_hid);

        for t in 0..h.len() {
            let error = &h[t] - &targets[t];
            let delta = (error * 2.0).component_mul(&tanh_derivative_from_output(&h[t]));

            if t > 0 {
                grads.whh += h[t - 1].transpose() * &delta / scale;
                grads.wxh += xs[t - 1].transpose() * &delta / scale;
            }
            grads.bh += column_sum(&delta) / scale;
        }
        Ok(grads)
    }

    pub fn write_to(self, store: &mut ParameterStore) -> Result<()> {
        store.set_grad(ParamName::Whh, self.whh)?;
        store.set_grad(ParamName::Wxh, self.wxh)?;
        store.set_grad(ParamName::Bh, self.bh)
    }
}
