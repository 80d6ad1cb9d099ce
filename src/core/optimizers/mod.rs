//! # 옵티마이저
//!
//! 그래디언트 슬롯을 읽어 파라미터 값을 갱신하는 교체 가능한 구성요소.
//! 각 인스턴스는 하나의 파라미터 그룹과 그 누적 이력을 소유한다.

pub mod adagrad;
pub mod adam;
pub mod config;
pub mod rmsprop;
pub mod sgd;


pub use adagrad::Adagrad;
pub use adam::{Adam, AdamState};
pub use config::{AdamConfig, OptimizerConfig, RmsPropConfig};
pub use rmsprop::RmsProp;
pub use sgd::{Nesterov, Sgd};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::params::{ParamName, ParameterStore};

/// 옵티마이저 공통 인터페이스
pub trait Optimizer {
    /// 담당 파라미터 그룹
    fn params(&self) -> &[ParamName];

    fn learning_rate(&self) -> f64;

    /// 그룹의 그래디언트 슬롯을 0으로
    fn reset_gradients(&self, store: &mut ParameterStore) {
        store.zero_grads(self.params());
    }

    /// 누적 이력과 현재 그래디언트로 파라미터 갱신
    fn apply_step(&mut self, store: &mut ParameterStore);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerType {
    Sgd,
    Nesterov,
    #[serde(alias = "rms")]
    RmsProp,
    Adam,
    Adagrad,
}

impl fmt::Display for OptimizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptimizerType::Sgd => "SGD",
            OptimizerType::Nesterov => "Nesterov",
            OptimizerType::RmsProp => "RMS",
            OptimizerType::Adam => "Adam",
            OptimizerType::Adagrad => "Adagrad",
        };
        f.write_str(name)
    }
}

impl FromStr for OptimizerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sgd" => Ok(OptimizerType::Sgd),
            "nesterov" => Ok(OptimizerType::Nesterov),
            "rms" | "rmsprop" => Ok(OptimizerType::RmsProp),
            "adam" => Ok(OptimizerType::Adam),
            "adagrad" => Ok(OptimizerType::Adagrad),
            other => Err(anyhow!("Unknown optimiser {}", other)),
        }
    }
}

/// 구성에 맞는 옵티마이저 생성
pub fn build_optimizer(
    config: &OptimizerConfig,
    store: &ParameterStore,
    params: &[ParamName],
) -> Box<dyn Optimizer> {
    let lr = config.learning_rate;
    match config.kind {
        OptimizerType::Sgd => Box::new(Sgd::new(params, lr)),
        OptimizerType::Nesterov => Box::new(Nesterov::new(params, lr, config.momentum)),
        OptimizerType::RmsProp => Box::new(RmsProp::new(store, params, lr, config.rmsprop)),
        OptimizerType::Adam => Box::new(Adam::new(store, params, lr, config.adam)),
        OptimizerType::Adagrad => Box::new(Adagrad::new(store, params, lr, config.adagrad_epsilon)),
    }
}
