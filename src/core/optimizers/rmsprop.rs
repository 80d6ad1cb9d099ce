use nalgebra::DMatrix;

use super::config::RmsPropConfig;
use super::Optimizer;
use crate::core::params::{ParamName, ParameterStore};

/// RMSprop: s = α·s + (1−α)·g², p −= lr · g / (√s + ε)
#[derive(Debug, Clone)]
pub struct RmsProp {
    params: Vec<ParamName>,
    learning_rate: f64,
    config: RmsPropConfig,
    square_avg: Vec<DMatrix<f64>>,
}

impl RmsProp {
    pub fn new(store: &ParameterStore, params: &[ParamName], learning_rate: f64, config: RmsPropConfig) -> Self {
        let square_avg = params
            .iter()
            .map(|&name| {
                let (rows, cols) = store.get(name).shape();
                DMatrix::zeros(rows, cols)
            })
            .collect();
        Self {
            params: params.to_vec(),
            learning_rate,
            config,
            square_avg,
        }
    }
}

impl Optimizer for RmsProp {
    fn params(&self) -> &[ParamName] {
        &self.params
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn apply_step(&mut self, store: &mut ParameterStore) {
        let RmsPropConfig { alpha, epsilon } = self.config;
        for (sq, &name) in self.square_avg.iter_mut().zip(self.params.iter()) {
            let param = store.get_mut(name);
            *sq = &*sq * alpha + param.grad.component_mul(&param.grad) * (1.0 - alpha);
            let step = param.grad.zip_map(sq, |g, s| g / (s.sqrt() + epsilon));
            param.value -= step * self.learning_rate;
        }
    }
}
