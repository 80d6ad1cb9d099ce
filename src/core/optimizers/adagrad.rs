use nalgebra::DMatrix;

use super::Optimizer;
use crate::core::params::{ParamName, ParameterStore};

/// Adagrad: s += g², p −= lr · g / (√s + ε)
#[derive(Debug, Clone)]
pub struct Adagrad {
    params: Vec<ParamName>,
    learning_rate: f64,
    epsilon: f64,
    sum_squares: Vec<DMatrix<f64>>,
}

impl Adagrad {
    pub fn new(store: &ParameterStore, params: &[ParamName], learning_rate: f64, epsilon: f64) -> Self {
        let sum_squares = params
            .iter()
            .map(|&name| {
                let (rows, cols) = store.get(name).shape();
                DMatrix::zeros(rows, cols)
            })
            .collect();
        Self {
            params: params.to_vec(),
            learning_rate,
            epsilon,
            sum_squares,
        }
    }
}

impl Optimizer for Adagrad {
    fn params(&self) -> &[ParamName] {
        &self.params
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn apply_step(&mut self, store: &mut ParameterStore) {
        let epsilon = self.epsilon;
        for (sum, &name) in self.sum_squares.iter_mut().zip(self.params.iter()) {
            let param = store.get_mut(name);
            *sum += param.grad.component_mul(&param.grad);
            let step = param.grad.zip_map(sum, |g, s| g / (s.sqrt() + epsilon));
            param.value -= step * self.learning_rate;
        }
    }
}
