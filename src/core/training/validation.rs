//! 검증 분할 평가

use anyhow::{anyhow, Result};
use nalgebra::DMatrix;
use rand::Rng;

use crate::core::dynamics::{run_hidden, SamplingStrategy, SequenceBatch};
use crate::core::gradients::{output_layer, OutputActivation};
use crate::core::math::argmax_rows;
use crate::core::params::ParameterStore;

/// 검증 비용과 오차율
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationResult {
    pub cost: f64,
    /// 틀린 표본 비율 [0, 1]
    pub error: f64,
}

impl ValidationResult {
    /// 100 · (1 − error)
    pub fn accuracy(&self) -> f64 {
        100.0 * (1.0 - self.error)
    }
}

/// 평가 방식
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationSettings {
    pub sampling: SamplingStrategy,
    pub output: OutputActivation,
    /// 확률적 전이일 때 평균낼 실행 수
    pub samples: usize,
    pub linear_tolerance: f64,
}

/// 영 상태에서 전체 시퀀스를 돌려 출력 계산
pub fn predict<R: Rng + ?Sized>(
    params: &ParameterStore,
    sampling: SamplingStrategy,
    output: OutputActivation,
    xs: &SequenceBatch,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    let h = run_hidden(params, sampling, xs, rng);
    let last = h.last().ok_or_else(|| anyhow!("validation sequence is empty"))?;
    Ok(output_layer(params, output, last))
}

pub fn evaluate<R: Rng + ?Sized>(
    params: &ParameterStore,
    settings: &ValidationSettings,
    xs: &SequenceBatch,
    labels: &DMatrix<f64>,
    rng: &mut R,
) -> Result<ValidationResult> {
    let runs = if settings.sampling.is_stochastic() {
        settings.samples.max(1)
    } else {
        1
    };

    let mut out = predict(params, settings.sampling, settings.output, xs, rng)?;
    for _ in 1..runs {
        out += predict(params, settings.sampling, settings.output, xs, rng)?;
    }
    out /= runs as f64;

    let cost = settings.output.cost(&out, labels);
    let n = out.nrows().max(1) as f64;
    let wrong = match settings.output {
        OutputActivation::Softmax => argmax_rows(&out)
            .into_iter()
            .zip(argmax_rows(labels))
            .filter(|(p, y)| p != y)
            .count(),
        OutputActivation::Linear => (&out - labels)
            .row_iter()
            .filter(|row| row.iter().map(|e| e * e).sum::<f64>() > settings.linear_tolerance)
            .count(),
    };

    Ok(ValidationResult { cost, error: wrong as f64 / n })
}
