//! 은닉 상태 확률적 이진화 전략

use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// F 입력 직전에 은닉 상태에 적용되는 샘플링 전략
///
/// `stochastic`/`hybrid` 두 플래그에서 하나의 값으로 결정된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingStrategy {
    /// 샘플링 없음
    Deterministic,
    /// 모든 원소를 draw < value 인 베르누이 시행으로 이진화
    Bernoulli,
    /// 배치 앞 절반 행만 이진화, 나머지는 그대로 통과
    Hybrid,
}

impl SamplingStrategy {
    pub fn from_flags(stochastic: bool, hybrid: bool) -> Self {
        match (stochastic, hybrid) {
            (false, _) => SamplingStrategy::Deterministic,
            (true, false) => SamplingStrategy::Bernoulli,
            (true, true) => SamplingStrategy::Hybrid,
        }
    }

    pub fn is_stochastic(&self) -> bool {
        !matches!(self, SamplingStrategy::Deterministic)
    }

    /// 전략에 따라 샘플링된 은닉 상태 반환
    pub fn apply<R: Rng + ?Sized>(&self, h: &DMatrix<f64>, rng: &mut R) -> DMatrix<f64> {
        match self {
            SamplingStrategy::Deterministic => h.clone(),
            SamplingStrategy::Bernoulli => binarize_rows(h, h.nrows(), rng),
            SamplingStrategy::Hybrid => binarize_rows(h, h.nrows() / 2, rng),
        }
    }
}

/// 앞쪽 `rows` 개 행을 이진화
fn binarize_rows<R: Rng + ?Sized>(h: &DMatrix<f64>, rows: usize, rng: &mut R) -> DMatrix<f64> {
    let mut out = h.clone();
    for i in 0..rows {
        for j in 0..out.ncols() {
            let draw: f64 = rng.gen();
            out[(i, j)] = if draw < h[(i, j)] { 1.0 } else { 0.0 };
        }
    }
    out
}
