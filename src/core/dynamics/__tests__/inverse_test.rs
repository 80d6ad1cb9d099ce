use crate::core::dynamics::*;
use crate::core::math::{add_row_broadcast, tanh};
use crate::core::params::*;
use approx::assert_relative_eq;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn 역사상_공식_테스트() {
    let shape = NetworkShape { n_inp: 3, n_hid: 6, n_out: 2 };
    let mut params = ParameterStore::new(shape, WeightInit::ScaledOrthogonal, &mut StdRng::seed_from_u64(8)).unwrap();
    params.get_mut(ParamName::Ch).value = DMatrix::from_element(1, 6, -0.05);

    let x = DMatrix::from_fn(2, 3, |i, j| (i + j) as f64 * 0.2);
    let h = DMatrix::from_fn(2, 6, |i, j| ((i * 6 + j) as f64).cos() * 0.5);

    let out = LearnedInverse::new(&params).apply(&x, &h);
    let z = &h * params.value(ParamName::Vhh) + &x * params.value(ParamName::Wxh);
    let expected = tanh(&add_row_broadcast(&z, params.value(ParamName::Ch)));

    assert_relative_eq!(out, expected, epsilon = 1e-15);
    assert_eq!(inverse_step(&params, &x, &h), out);
}

#[test]
fn 역사상은_whh와_bh에_무관_테스트() {
    let shape = NetworkShape { n_inp: 2, n_hid: 4, n_out: 1 };
    let mut params = ParameterStore::new(shape, WeightInit::Orthogonal, &mut StdRng::seed_from_u64(3)).unwrap();
    let x = DMatrix::from_element(3, 2, 0.3);
    let h = DMatrix::from_element(3, 4, -0.2);

    let before = inverse_step(&params, &x, &h);
    params.get_mut(ParamName::Whh).value.fill(10.0);
    params.get_mut(ParamName::Bh).value.fill(10.0);
    assert_eq!(inverse_step(&params, &x, &h), before);

    // Wxh는 공유
    params.get_mut(ParamName::Wxh).value.fill(0.0);
    assert_ne!(inverse_step(&params, &x, &h), before);
}
