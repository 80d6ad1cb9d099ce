//! 가우시안 노이즈 생성

use anyhow::{anyhow, ensure, Result};
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// N(0, std²) 표본 행렬. std = 0 이면 rng를 소비하지 않고 영 행렬 반환
///
/// 음수이거나 유한하지 않은 std 는 오류
pub fn gaussian_noise<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    std: f64,
    rng: &mut R,
) -> Result<DMatrix<f64>> {
    ensure!(std.is_finite() && std >= 0.0, "invalid noise std {}", std);
    if std == 0.0 {
        return Ok(DMatrix::zeros(rows, cols));
    }
    let normal = Normal::new(0.0, std).map_err(|e| anyhow!("invalid noise std {}: {}", std, e))?;
    Ok(DMatrix::from_fn(rows, cols, |_, _| normal.sample(&mut *rng)))
}

/// 같은 형상의 노이즈를 더한 사본
pub fn corrupt<R: Rng + ?Sized>(m: &DMatrix<f64>, std: f64, rng: &mut R) -> Result<DMatrix<f64>> {
    Ok(m + gaussian_noise(m.nrows(), m.ncols(), std, rng)?)
}
