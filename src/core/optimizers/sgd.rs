//! 경사하강법 - 기본 SGD 와 Nesterov 모멘텀

use nalgebra::DMatrix;

use super::Optimizer;
use crate::core::params::{ParamName, ParameterStore};

/// 기본 경사하강법: p −= lr · g
#[derive(Debug, Clone)]
pub struct Sgd {
    params: Vec<ParamName>,
    learning_rate: f64,
}

impl Sgd {
    pub fn new(params: &[ParamName], learning_rate: f64) -> Self {
        Self {
            params: params.to_vec(),
            learning_rate,
        }
    }
}

impl Optimizer for Sgd {
    fn params(&self) -> &[ParamName] {
        &self.params
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn apply_step(&mut self, store: &mut ParameterStore) {
        for &name in &self.params {
            let param = store.get_mut(name);
            param.value -= &param.grad * self.learning_rate;
        }
    }
}

/// Nesterov 모멘텀
///
/// buf = μ·buf + g (첫 스텝은 buf = g), p −= lr · (g + μ·buf)
#[derive(Debug, Clone)]
pub struct Nesterov {
    params: Vec<ParamName>,
    learning_rate: f64,
    momentum: f64,
    velocity: Vec<Option<DMatrix<f64>>>,
}

impl Nesterov {
    pub fn new(params: &[ParamName], learning_rate: f64, momentum: f64) -> Self {
        Self {
            params: params.to_vec(),
            learning_rate,
            momentum,
            velocity: vec![None; params.len()],
        }
    }

    /// 현재 속도 상태 확인
    pub fn velocity(&self, name: ParamName) -> Option<&DMatrix<f64>> {
        let idx = self.params.iter().position(|&p| p == name)?;
        self.velocity[idx].as_ref()
    }

    /// 속도 상태 초기화
    pub fn reset_velocity(&mut self) {
        self.velocity.iter_mut().for_each(|v| *v = None);
    }
}

impl Optimizer for Nesterov {
    fn params(&self) -> &[ParamName] {
        &self.params
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn apply_step(&mut self, store: &mut ParameterStore) {
        for (slot, &name) in self.velocity.iter_mut().zip(self.params.iter()) {
            let param = store.get_mut(name);
            let buf = match slot.take() {
                Some(prev) => prev * self.momentum + &param.grad,
                None => param.grad.clone(),
            };
            let step = &param.grad + &buf * self.momentum;
            param.value -= step * self.learning_rate;
            *slot = Some(buf);
        }
    }
}
