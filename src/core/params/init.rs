//! 가중치 초기화 - 순환 행렬의 직교성 보장

use anyhow::{anyhow, Result};
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 가중치 초기화 방식
///
/// 두 방식 모두 무작위 행렬 A를 뽑은 뒤 SVD(A) = U Σ Vᵀ 에서 U Vᵀ 를 취하므로
/// 정사각 행렬은 직교, 직사각 행렬은 반직교(semi-orthogonal)가 된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// 표준 정규분포 표본의 직교화
    Orthogonal,
    /// ±sqrt(6 / (fan_in + fan_out)) 균등분포 표본의 직교화
    ScaledOrthogonal,
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Orthogonal
    }
}

impl WeightInit {
    /// rows × cols 행렬 생성
    pub fn sample<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Result<DMatrix<f64>> {
        let raw = match self {
            WeightInit::Orthogonal => {
                DMatrix::from_fn(rows, cols, |_, _| StandardNormal.sample(&mut *rng))
            }
            WeightInit::ScaledOrthogonal => {
                let irange = (6.0 / (rows + cols) as f64).sqrt();
                let dist = Uniform::new_inclusive(-irange, irange);
                DMatrix::from_fn(rows, cols, |_, _| dist.sample(&mut *rng))
            }
        };
        orthogonalize(raw)
    }
}

/// U Vᵀ 로 직교화
pub fn orthogonalize(m: DMatrix<f64>) -> Result<DMatrix<f64>> {
    if m.is_empty() {
        return Ok(m);
    }
    let svd = m.svd(true, true);
    let u = svd.u.ok_or_else(|| anyhow!("SVD U matrix not computed"))?;
    let v_t = svd.v_t.ok_or_else(|| anyhow!("SVD V^T matrix not computed"))?;
    Ok(u * v_t)
}

impl fmt::Display for WeightInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightInit::Orthogonal => f.write_str("orthogonal"),
            WeightInit::ScaledOrthogonal => f.write_str("scaled_orthogonal"),
        }
    }
}

impl FromStr for WeightInit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "orthogonal" => Ok(WeightInit::Orthogonal),
            "scaled_orthogonal" | "rand_ortho" => Ok(WeightInit::ScaledOrthogonal),
            other => Err(anyhow!("Unsupported weight initialisation: {}", other)),
        }
    }
}
