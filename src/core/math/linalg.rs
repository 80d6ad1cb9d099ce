//! 행렬 보조 연산 - nalgebra DMatrix 위에서 배치 단위 연산을 제공

use nalgebra::DMatrix;

/// 행 벡터(1×n)를 모든 배치 행에 더함
pub fn add_row_broadcast(m: &DMatrix<f64>, row: &DMatrix<f64>) -> DMatrix<f64> {
    assert_eq!(row.nrows(), 1, "bias must be a row vector");
    assert_eq!(m.ncols(), row.ncols(), "bias width mismatch");
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)] + row[(0, j)])
}

/// 배치 방향(행) 합 → 1×n 행 벡터
pub fn column_sum(m: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(1, m.ncols(), |_, j| m.column(j).sum())
}

/// 배치 방향(행) 평균 → 1×n 행 벡터
pub fn column_mean(m: &DMatrix<f64>) -> DMatrix<f64> {
    let rows = m.nrows().max(1) as f64;
    column_sum(m) / rows
}

/// 원소별 tanh
pub fn tanh(m: &DMatrix<f64>) -> DMatrix<f64> {
    m.map(f64::tanh)
}

/// tanh 출력 a = tanh(z)로부터 도함수 1 - a² 계산
pub fn tanh_derivative_from_output(activated: &DMatrix<f64>) -> DMatrix<f64> {
    activated.map(|a| 1.0 - a * a)
}

/// 행 단위 softmax (최댓값을 빼서 오버플로 방지)
pub fn softmax_rows(m: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = m.clone();
    for i in 0..out.nrows() {
        let max = out.row(i).max();
        let mut sum = 0.0;
        for j in 0..out.ncols() {
            let e = (out[(i, j)] - max).exp();
            out[(i, j)] = e;
            sum += e;
        }
        for j in 0..out.ncols() {
            out[(i, j)] /= sum;
        }
    }
    out
}

/// 각 행의 최댓값 인덱스
pub fn argmax_rows(m: &DMatrix<f64>) -> Vec<usize> {
    (0..m.nrows())
        .map(|i| {
            let mut best = 0;
            for j in 1..m.ncols() {
                if m[(i, j)] > m[(i, best)] {
                    best = j;
                }
            }
            best
        })
        .collect()
}

pub fn contains_nan(m: &DMatrix<f64>) -> bool {
    m.iter().any(|v| v.is_nan())
}

/// 스펙트럼 반경 ρ(W) = max |λ_i|
///
/// 정사각 행렬이 아니거나 NaN을 포함하면 None
pub fn spectral_radius(m: &DMatrix<f64>) -> Option<f64> {
    if !m.is_square() || m.nrows() == 0 || contains_nan(m) {
        return None;
    }
    let eigenvalues = m.complex_eigenvalues();
    eigenvalues.iter().map(|c| c.norm_sqr().sqrt()).reduce(f64::max)
}

/// 프로베니우스 노름
pub fn frobenius_norm(m: &DMatrix<f64>) -> f64 {
    m.norm()
}
