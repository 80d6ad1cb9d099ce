//! 역방향 동역학 G(x, h) = tanh(h Vhh + x Wxh + ch)

use nalgebra::DMatrix;

use crate::core::math::{add_row_broadcast, tanh};
use crate::core::params::{ParamName, ParameterStore};

/// 목표 전파에 쓰이는 역사상
pub trait InverseMapping {
    fn apply(&self, x: &DMatrix<f64>, h: &DMatrix<f64>) -> DMatrix<f64>;
}

/// 학습되는 역사상 G. Wxh는 순방향과 공유한다.
#[derive(Debug, Clone, Copy)]
pub struct LearnedInverse<'a> {
    params: &'a ParameterStore,
}

impl<'a> LearnedInverse<'a> {
    pub fn new(params: &'a ParameterStore) -> Self {
        Self { params }
    }
}

impl InverseMapping for LearnedInverse<'_> {
    fn apply(&self, x: &DMatrix<f64>, h: &DMatrix<f64>) -> DMatrix<f64> {
        inverse_step(self.params, x, h)
    }
}

pub fn inverse_step(params: &ParameterStore, x: &DMatrix<f64>, h: &DMatrix<f64>) -> DMatrix<f64> {
    let z = h * params.value(ParamName::Vhh) + x * params.value(ParamName::Wxh);
    tanh(&add_row_broadcast(&z, params.value(ParamName::Ch)))
}
