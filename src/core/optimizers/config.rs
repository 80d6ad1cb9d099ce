use serde::{Deserialize, Serialize};

use super::OptimizerType;

/// Optimizer 전체 구성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// 옵티마이저 종류
    pub kind: OptimizerType,
    /// 학습률
    pub learning_rate: f64,
    /// 모멘텀 계수 (Nesterov 전용)
    pub momentum: f64,
    /// Adam 구성
    pub adam: AdamConfig,
    /// RMSprop 구성
    pub rmsprop: RmsPropConfig,
    /// Adagrad 엡실론
    pub adagrad_epsilon: f64,
}

/// Adam 옵티마이저 구성
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    /// 베타1 파라미터 (1차 모멘트 지수 감소율)
    pub beta1: f64,
    /// 베타2 파라미터 (2차 모멘트 지수 감소율)
    pub beta2: f64,
    /// 엡실론 (수치 안정성을 위한 작은 값)
    pub epsilon: f64,
}

/// RMSprop 옵티마이저 구성
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmsPropConfig {
    /// 제곱 평균 감소율
    pub alpha: f64,
    pub epsilon: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            kind: OptimizerType::Sgd,
            learning_rate: 0.01,
            momentum: 0.9,
            adam: AdamConfig::default(),
            rmsprop: RmsPropConfig::default(),
            adagrad_epsilon: 1e-10,
        }
    }
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl Default for RmsPropConfig {
    fn default() -> Self {
        Self {
            alpha: 0.99,
            epsilon: 1e-8,
        }
    }
}

impl OptimizerConfig {
    /// 새 구성 생성
    pub fn new(kind: OptimizerType, learning_rate: f64) -> Self {
        Self {
            kind,
            learning_rate,
            ..Self::default()
        }
    }

    /// 학습률 설정
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// 모멘텀 설정
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Adam 구성 설정
    pub fn with_adam_config(mut self, config: AdamConfig) -> Self {
        self.adam = config;
        self
    }

    /// RMSprop 구성 설정
    pub fn with_rmsprop_config(mut self, config: RmsPropConfig) -> Self {
        self.rmsprop = config;
        self
    }
}
