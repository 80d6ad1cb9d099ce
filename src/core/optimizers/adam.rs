use nalgebra::DMatrix;

use super::config::AdamConfig;
use super::Optimizer;
use crate::core::params::{ParamName, ParameterStore};

/// 파라미터 하나의 Adam 상태
#[derive(Debug, Clone)]
pub struct AdamState {
    pub m: DMatrix<f64>, // 1차 모멘트
    pub v: DMatrix<f64>, // 2차 모멘트
}

impl AdamState {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            m: DMatrix::zeros(rows, cols),
            v: DMatrix::zeros(rows, cols),
        }
    }
}

/// 편향 보정 Adam
#[derive(Debug, Clone)]
pub struct Adam {
    params: Vec<ParamName>,
    learning_rate: f64,
    config: AdamConfig,
    states: Vec<AdamState>,
    t: i32, // 시간 스텝
}

impl Adam {
    pub fn new(store: &ParameterStore, params: &[ParamName], learning_rate: f64, config: AdamConfig) -> Self {
        let states = params
            .iter()
            .map(|&name| {
                let (rows, cols) = store.get(name).shape();
                AdamState::new(rows, cols)
            })
            .collect();
        Self {
            params: params.to_vec(),
            learning_rate,
            config,
            states,
            t: 0,
        }
    }

    pub fn step_count(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn params(&self) -> &[ParamName] {
        &self.params
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn apply_step(&mut self, store: &mut ParameterStore) {
        self.t += 1;
        let AdamConfig { beta1, beta2, epsilon } = self.config;
        let bias1 = 1.0 - beta1.powi(self.t);
        let bias2 = 1.0 - beta2.powi(self.t);

        for (state, &name) in self.states.iter_mut().zip(self.params.iter()) {
            let param = store.get_mut(name);
            let g = &param.grad;

            // 모멘텀 업데이트
            state.m = &state.m * beta1 + g * (1.0 - beta1);
            state.v = &state.v * beta2 + g.component_mul(g) * (1.0 - beta2);

            // 편향 보정 후 파라미터 업데이트
            let step = state
                .m
                .zip_map(&state.v, |m, v| (m / bias1) / ((v / bias2).sqrt() + epsilon));
            param.value -= step * self.learning_rate;
        }
    }
}
