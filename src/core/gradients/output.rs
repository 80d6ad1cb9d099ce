//! 출력층 - 활성화, 비용, 닫힌 형태 그래디언트

use anyhow::{anyhow, ensure, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::math::{add_row_broadcast, column_mean, softmax_rows};
use crate::core::params::{ParamName, ParameterStore};

/// 출력층 활성화 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    /// 분류: softmax + 교차 엔트로피
    Softmax,
    /// 회귀: 항등 + 제곱 오차
    Linear,
}

impl OutputActivation {
    pub fn activate(&self, pre: &DMatrix<f64>) -> DMatrix<f64> {
        match self {
            OutputActivation::Softmax => softmax_rows(pre),
            OutputActivation::Linear => pre.clone(),
        }
    }

    /// 배치 평균 비용
    ///
    /// softmax: mean_b Σ_k −y log ŷ, linear: mean_b ½ Σ_k (ŷ − y)².
    /// 두 경우 모두 활성화 이전 값에 대한 그래디언트가 (ŷ − y)/B 가 된다.
    pub fn cost(&self, out: &DMatrix<f64>, labels: &DMatrix<f64>) -> f64 {
        let batch = out.nrows().max(1) as f64;
        match self {
            OutputActivation::Softmax => {
                let total: f64 = out
                    .iter()
                    .zip(labels.iter())
                    .map(|(&p, &y)| if y == 0.0 { 0.0 } else { -y * p.ln() })
                    .sum();
                total / batch
            }
            OutputActivation::Linear => {
                let total: f64 = out.iter().zip(labels.iter()).map(|(&p, &y)| (p - y) * (p - y)).sum();
                0.5 * total / batch
            }
        }
    }
}

impl fmt::Display for OutputActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputActivation::Softmax => f.write_str("softmax"),
            OutputActivation::Linear => f.write_str("linear"),
        }
    }
}

impl FromStr for OutputActivation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "softmax" => Ok(OutputActivation::Softmax),
            "linear" => Ok(OutputActivation::Linear),
            other => Err(anyhow!("Unsupported classification type: {}", other)),
        }
    }
}

/// out = act(hs_tmax Why + by)
pub fn output_layer(
    params: &ParameterStore,
    activation: OutputActivation,
    hs_tmax: &DMatrix<f64>,
) -> DMatrix<f64> {
    let pre = hs_tmax * params.value(ParamName::Why);
    activation.activate(&add_row_broadcast(&pre, params.value(ParamName::By)))
}

/// 출력층 그래디언트
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGradients {
    pub why: DMatrix<f64>,
    pub by: DMatrix<f64>,
}

impl OutputGradients {
    /// ∂Why = h[T-1]ᵀ error / B, ∂by = mean_b(error)
    pub fn compute(h_last: &DMatrix<f64>, error: &DMatrix<f64>) -> Result<Self> {
        ensure!(
            h_last.nrows() == error.nrows(),
            "hidden batch {} does not match error batch {}",
            h_last.nrows(),
            error.nrows()
        );
        let batch = error.nrows().max(1) as f64;
        Ok(Self {
            why: h_last.transpose() * error / batch,
            by: column_mean(error),
        })
    }

    pub fn write_to(self, store: &mut ParameterStore) -> Result<()> {
        store.set_grad(ParamName::Why, self.why)?;
        store.set_grad(ParamName::By, self.by)
    }
}
