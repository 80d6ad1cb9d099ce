//! 목표 생성기 - 차분 목표 전파(difference target propagation)
//!
//! 마지막 시점 목표는 출력 오차를 Whyᵀ 로 역투영해 보정한 h[T-1] 이고,
//! 그 이전 시점은 역사상 G를 통해 거꾸로 전파한다:
//!
//! ```text
//! h_[T-1] = h[T-1] − hs_tmax + (hs_tmax − ilr · error Whyᵀ / B)
//! h_[t]   = h[t] − G(x[t+1], h[t+1]) + G(x[t+1], h_[t+1])
//! ```

use anyhow::{ensure, Result};
use nalgebra::DMatrix;

use crate::core::dynamics::{InverseMapping, SequenceBatch, Trajectory};

/// 목표 궤적 생성기
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGenerator {
    /// 역방향 학습률 (마지막 시점 보정 스텝 크기)
    pub ilr: f64,
}

impl TargetGenerator {
    pub fn new(ilr: f64) -> Self {
        Self { ilr }
    }

    /// 마지막 시점 목표
    ///
    /// `hs_tmax` 는 출력 계산에 쓰인 마지막 은닉 상태다.
    pub fn final_target(
        &self,
        h_last: &DMatrix<f64>,
        hs_tmax: &DMatrix<f64>,
        why: &DMatrix<f64>,
        error: &DMatrix<f64>,
    ) -> DMatrix<f64> {
        let batch = error.nrows().max(1) as f64;
        let back_projected = error * why.transpose() / batch;
        let nudged = hs_tmax - back_projected * self.ilr;
        h_last - hs_tmax + nudged
    }

    /// 전체 목표 궤적 h_ 생성
    pub fn generate<G: InverseMapping>(
        &self,
        inverse: &G,
        xs: &SequenceBatch,
        hs_tmax: &DMatrix<f64>,
        h: &Trajectory,
        why: &DMatrix<f64>,
        error: &DMatrix<f64>,
    ) -> Result<Trajectory> {
        ensure!(!h.is_empty(), "hidden trajectory is empty");
        ensure!(
            xs.len() == h.len(),
            "input length {} does not match trajectory length {}",
            xs.len(),
            h.len()
        );
        ensure!(
            error.nrows() == hs_tmax.nrows(),
            "error batch {} does not match hidden batch {}",
            error.nrows(),
            hs_tmax.nrows()
        );

        let seq_len = h.len();
        let last = self.final_target(&h[seq_len - 1], hs_tmax, why, error);

        // 뒤에서부터 채운 뒤 뒤집어 시점 순서로 만든다
        let mut reversed = Vec::with_capacity(seq_len);
        reversed.push(last);
        for t in (0..seq_len - 1).rev() {
            let next_target = &reversed[reversed.len() - 1];
            let target = &h[t] - inverse.apply(&xs[t + 1], &h[t + 1])
                + inverse.apply(&xs[t + 1], next_target);
            reversed.push(target);
        }
        reversed.reverse();

        Ok(Trajectory::from_states(reversed))
    }
}
