use crate::core::math::*;
use approx::assert_relative_eq;
use nalgebra::DMatrix;

#[test]
fn 편향_브로드캐스트_테스트() {
    let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let bias = DMatrix::from_row_slice(1, 3, &[0.5, -1.0, 2.0]);

    let out = add_row_broadcast(&m, &bias);

    assert_eq!(out, DMatrix::from_row_slice(2, 3, &[1.5, 1.0, 5.0, 4.5, 4.0, 8.0]));
}

#[test]
fn 열_합과_평균_테스트() {
    let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 6.0]);

    assert_eq!(column_sum(&m), DMatrix::from_row_slice(1, 2, &[4.0, 8.0]));
    assert_eq!(column_mean(&m), DMatrix::from_row_slice(1, 2, &[2.0, 4.0]));
}

#[test]
fn tanh_도함수_테스트() {
    let z = DMatrix::from_row_slice(1, 3, &[-1.5, 0.0, 0.7]);
    let a = tanh(&z);
    let d = tanh_derivative_from_output(&a);

    for j in 0..3 {
        let eps = 1e-6;
        let numeric = ((z[(0, j)] + eps).tanh() - (z[(0, j)] - eps).tanh()) / (2.0 * eps);
        assert_relative_eq!(d[(0, j)], numeric, epsilon = 1e-8);
    }
}

#[test]
fn softmax_행_정규화_테스트() {
    let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 1000.0, 1000.0, 1000.0]);
    let p = softmax_rows(&m);

    for i in 0..2 {
        assert_relative_eq!(p.row(i).sum(), 1.0, epsilon = 1e-12);
    }
    // 큰 입력에서도 오버플로 없이 균등 분포
    assert_relative_eq!(p[(1, 0)], 1.0 / 3.0, epsilon = 1e-12);
    assert!(p[(0, 2)] > p[(0, 1)] && p[(0, 1)] > p[(0, 0)]);
}

#[test]
fn argmax_테스트() {
    let m = DMatrix::from_row_slice(3, 3, &[0.1, 0.7, 0.2, 0.9, 0.05, 0.05, 0.2, 0.2, 0.6]);
    assert_eq!(argmax_rows(&m), vec![1, 0, 2]);
}

#[test]
fn 스펙트럼_반경_테스트() {
    // 대각 행렬
    let d = DMatrix::from_row_slice(2, 2, &[0.5, 0.0, 0.0, -2.0]);
    assert_relative_eq!(spectral_radius(&d).unwrap(), 2.0, epsilon = 1e-10);

    // 90도 회전 행렬: 고유값 ±i, |λ| = 1
    let r = DMatrix::from_row_slice(2, 2, &[0.0, -1.0, 1.0, 0.0]);
    assert_relative_eq!(spectral_radius(&r).unwrap(), 1.0, epsilon = 1e-10);

    let with_nan = DMatrix::from_row_slice(2, 2, &[f64::NAN, 0.0, 0.0, 1.0]);
    assert!(spectral_radius(&with_nan).is_none());

    let rect = DMatrix::<f64>::zeros(2, 3);
    assert!(spectral_radius(&rect).is_none());
}

#[test]
fn 복소_고유값_스펙트럼_반경_테스트() {
    // 0.5 · 60도 회전: 고유값 0.5·e^{±iπ/3}
    let (c, s) = (std::f64::consts::FRAC_PI_3.cos(), std::f64::consts::FRAC_PI_3.sin());
    let r = DMatrix::from_row_slice(2, 2, &[0.5 * c, -0.5 * s, 0.5 * s, 0.5 * c]);
    assert_relative_eq!(spectral_radius(&r).unwrap(), 0.5, epsilon = 1e-10);

    // 실수 블록과 복소 블록이 섞인 경우 큰 쪽
    let mut m = DMatrix::zeros(3, 3);
    m[(0, 0)] = 0.3;
    m[(1, 1)] = 0.6;
    m[(1, 2)] = -0.8;
    m[(2, 1)] = 0.8;
    m[(2, 2)] = 0.6;
    assert_relative_eq!(spectral_radius(&m).unwrap(), 1.0, epsilon = 1e-10);
}

#[test]
fn 프로베니우스_노름_테스트() {
    let m = DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 4.0]);
    assert_relative_eq!(frobenius_norm(&m), 5.0, epsilon = 1e-12);
}
