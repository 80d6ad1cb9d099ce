//! 역방향 경로(Vhh, ch) 그래디언트
//!
//! 각 시점 t ≥ 1 에서 잡음 섞인 상태 hn = h[t] + n_h, xn = x[t] + n_x 에 대해
//!
//! ```text
//! hp = F(xn, hn),  ĥ = G(xn, hp),  e = ĥ − hn
//! δ  = 2 e ⊙ (1 − ĥ²)
//! ∂Vhh += hpᵀ δ / B,  ∂ch += Σ_b δ / B
//! ```
//!
//! hp를 고정했을 때 L = (1/B) Σ_b ‖ĥ_b − hn_b‖² 의 정확한 그래디언트다.

use anyhow::{ensure, Result};
use nalgebra::DMatrix;
use rand::Rng;

use crate::core::dynamics::{forward_step, inverse_step, SamplingStrategy, SequenceBatch, Trajectory};
use crate::core::math::{column_sum, corrupt, tanh_derivative_from_output};
use crate::core::params::{ParamName, ParameterStore};

/// 역방향 파라미터 그래디언트
#[derive(Debug, Clone, PartialEq)]
pub struct InverseGradients {
    pub vhh: DMatrix<f64>,
    pub ch: DMatrix<f64>,
}

impl InverseGradients {
    pub fn zeros(n_hid: usize) -> Self {
        Self {
            vhh: DMatrix::zeros(n_hid, n_hid),
            ch: DMatrix::zeros(1, n_hid),
        }
    }

    /// 모든 시점의 국소 재구성 그래디언트 합
    ///
    /// `reconstruction_noise` 는 시점마다 새로 뽑아 고정한 가우시안 노이즈의 표준편차다.
    pub fn compute<R: Rng + ?Sized>(
        params: &ParameterStore,
        sampling: SamplingStrategy,
        xs: &SequenceBatch,
        h: &Trajectory,
        reconstruction_noise: f64,
        rng: &mut R,
    ) -> Result<Self> {
        ensure!(
            xs.len() == h.len(),
            "input length {} does not match trajectory length {}",
            xs.len(),
            h.len()
        );

        let mut grads = Self::zeros(params.shape().n_hid);
        for t in 1..h.len() {
            let hn = corrupt(&h[t], reconstruction_noise, rng)?;
            let xn = corrupt(&xs[t], reconstruction_noise, rng)?;
            grads.accumulate_step(params, sampling, &xn, &hn, rng);
        }
        Ok(grads)
    }

    fn accumulate_step<R: Rng + ?Sized>(
        &mut self,
        params: &ParameterStore,
        sampling: SamplingStrategy,
        x: &DMatrix<f64>,
        hn: &DMatrix<f64>,
        rng: &mut R,
    ) {
        let batch = hn.nrows().max(1) as f64;
        let hp = forward_step(params, sampling, x, hn, rng);
        let reconstruction = inverse_step(params, x, &hp);
        let error = &reconstruction - hn;
        let delta = (error * 2.0).component_mul(&tanh_derivative_from_output(&reconstruction));

        self.vhh += hp.transpose() * &delta / batch;
        self.ch += column_sum(&delta) / batch;
    }

    pub fn write_to(self, store: &mut ParameterStore) -> Result<()> {
        store.set_grad(ParamName::Vhh, self.vhh)?;
        store.set_grad(ParamName::Ch, self.ch)
    }
}
