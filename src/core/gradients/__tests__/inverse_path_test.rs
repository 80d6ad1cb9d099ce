use super::{finite_difference, relative_error, small_problem};
use crate::core::dynamics::*;
use crate::core::gradients::InverseGradients;
use crate::core::params::{ParamName, ParameterStore};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 노이즈 없는 국소 재구성 손실 Σ_{t≥1} (1/B) Σ_b ‖G(x_t, F(x_t, h_t)) − h_t‖²
fn reconstruction_loss(params: &ParameterStore, xs: &SequenceBatch, h: &Trajectory) -> f64 {
    let mut rng = StdRng::seed_from_u64(0);
    let mut loss = 0.0;
    for t in 1..h.len() {
        let hp = forward_step(params, SamplingStrategy::Deterministic, &xs[t], &h[t], &mut rng);
        let rec = inverse_step(params, &xs[t], &hp);
        loss += (&rec - &h[t]).norm_squared() / h[t].nrows() as f64;
    }
    loss
}

#[test]
fn 역방향_그래디언트_유한차분_일치_테스트() {
    let (params, xs) = small_problem(41);
    let mut rng = StdRng::seed_from_u64(1);
    let h = run_hidden(&params, SamplingStrategy::Deterministic, &xs, &mut rng);

    let grads = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 0.0, &mut rng).unwrap();

    let loss_with = |name: ParamName, value: &DMatrix<f64>| {
        let mut p = params.clone();
        p.get_mut(name).value = value.clone();
        reconstruction_loss(&p, &xs, &h)
    };
    let numeric_vhh = finite_difference(params.value(ParamName::Vhh), |v| loss_with(ParamName::Vhh, v));
    let numeric_ch = finite_difference(params.value(ParamName::Ch), |v| loss_with(ParamName::Ch, v));

    assert!(relative_error(&grads.vhh, &numeric_vhh) < 1e-4, "Vhh 그래디언트");
    assert!(relative_error(&grads.ch, &numeric_ch) < 1e-4, "ch 그래디언트");
}

#[test]
fn 역방향_그래디언트_형상_및_기록_테스트() {
    let (mut params, xs) = small_problem(5);
    let mut rng = StdRng::seed_from_u64(2);
    let h = run_hidden(&params, SamplingStrategy::Deterministic, &xs, &mut rng);

    let grads = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 1e-3, &mut rng).unwrap();
    assert_eq!(grads.vhh.shape(), (5, 5));
    assert_eq!(grads.ch.shape(), (1, 5));

    grads.clone().write_to(&mut params).unwrap();
    assert_eq!(params.grad(ParamName::Vhh), &grads.vhh);
    assert_eq!(params.grad(ParamName::Ch), &grads.ch);
    // 순방향 파라미터는 건드리지 않음
    assert_eq!(params.grad_norm(ParamName::Whh), 0.0);
}

#[test]
fn 재구성_노이즈_시드_재현성_테스트() {
    let (params, xs) = small_problem(6);
    let h = run_hidden(&params, SamplingStrategy::Deterministic, &xs, &mut StdRng::seed_from_u64(0));

    let a = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 1e-3, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 1e-3, &mut StdRng::seed_from_u64(9)).unwrap();
    let clean = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 0.0, &mut StdRng::seed_from_u64(9)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, clean);
    // 작은 노이즈는 그래디언트를 크게 바꾸지 않음
    assert!(relative_error(&a.vhh, &clean.vhh) < 0.1);
}

#[test]
fn 길이_1_시퀀스는_영_그래디언트_테스트() {
    let (params, _) = small_problem(7);
    let xs = SequenceBatch::new(vec![DMatrix::from_element(4, 3, 0.1)]).unwrap();
    let h = run_hidden(&params, SamplingStrategy::Deterministic, &xs, &mut StdRng::seed_from_u64(0));

    let grads = InverseGradients::compute(&params, SamplingStrategy::Deterministic, &xs, &h, 0.0, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(grads, InverseGradients::zeros(5));
}
