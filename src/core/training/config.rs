//! STPTT 실험 구성

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::dynamics::SamplingStrategy;
use crate::core::gradients::OutputActivation;
use crate::core::optimizers::{OptimizerConfig, OptimizerType};
use crate::core::params::WeightInit;

/// 학습 실행 전체 구성
///
/// JSON 파일에서 읽거나 기본값에서 `with_*` 로 조립한다.
/// 빠진 필드는 기본값으로 채운다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StpttConfig {
    /// 시퀀스 길이 T
    pub seq_length: usize,
    /// 은닉 폭
    pub n_hid: usize,
    /// 확률적 순방향 전이 사용
    pub stochastic: bool,
    /// 배치 절반만 이진화 (stochastic 일 때만 의미)
    pub hybrid: bool,
    pub batch_size: usize,
    /// 역방향 패스에서 은닉 궤적에 더하는 노이즈 표준편차
    pub noise: f64,
    /// 국소 재구성 손실의 입력/상태 노이즈 표준편차 (0이면 끔)
    pub reconstruction_noise: f64,
    /// 몬테카를로 순방향 표본 수 M
    pub mc_samples: usize,
    /// 최종 목표 보정 스텝 (inverse learning rate)
    pub ilr: f64,
    /// 순방향 그룹 학습률
    pub flr: f64,
    /// 역방향 그룹 학습률
    pub glr: f64,
    /// Nesterov 모멘텀 계수
    pub momentum: f64,
    pub init: WeightInit,
    pub max_epochs: usize,
    /// 검증 주기 (에폭)
    pub check_interval: usize,
    pub output: OutputActivation,
    pub optimizer: OptimizerType,
    pub seed: u64,
    /// 확률적 검증에서 평균낼 실행 수
    pub validation_samples: usize,
    /// 이 값보다 작은 검증 오차면 해결로 보고 중단
    pub solved_threshold: f64,
    /// linear 출력에서 오답으로 세는 제곱 오차 합 한계
    pub linear_tolerance: f64,
}

impl Default for StpttConfig {
    fn default() -> Self {
        Self {
            seq_length: 64,
            n_hid: 100,
            stochastic: false,
            hybrid: true,
            batch_size: 16,
            noise: 0.0,
            reconstruction_noise: 1e-3,
            mc_samples: 1,
            ilr: 1e-7,
            flr: 0.01,
            glr: 1e-8,
            momentum: 0.9,
            init: WeightInit::Orthogonal,
            max_epochs: 2,
            check_interval: 1,
            output: OutputActivation::Softmax,
            optimizer: OptimizerType::Sgd,
            seed: 1234,
            validation_samples: 100,
            solved_threshold: 1e-4,
            linear_tolerance: 0.04,
        }
    }
}

impl StpttConfig {
    /// JSON 구성 파일 로딩 후 검증
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 학습 전에 잡아낼 수 있는 설정 오류 검사
    pub fn validate(&self) -> Result<()> {
        ensure!(self.seq_length > 0, "seq_length must be positive");
        ensure!(self.n_hid > 0, "n_hid must be positive");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.mc_samples > 0, "mc_samples (M) must be positive");
        ensure!(self.check_interval > 0, "check_interval must be positive");
        ensure!(self.validation_samples > 0, "validation_samples must be positive");

        for (name, value) in [
            ("ilr", self.ilr),
            ("flr", self.flr),
            ("glr", self.glr),
            ("momentum", self.momentum),
            ("noise", self.noise),
            ("reconstruction_noise", self.reconstruction_noise),
            ("solved_threshold", self.solved_threshold),
            ("linear_tolerance", self.linear_tolerance),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{} must be finite and non-negative, got {}",
                name,
                value
            );
        }
        Ok(())
    }

    pub fn sampling(&self) -> SamplingStrategy {
        SamplingStrategy::from_flags(self.stochastic, self.hybrid)
    }

    /// 순방향 그룹 (Whh, bh, Wxh, Why, by) 옵티마이저 구성
    pub fn forward_optimizer(&self) -> OptimizerConfig {
        OptimizerConfig::new(self.optimizer, self.flr).with_momentum(self.momentum)
    }

    /// 역방향 그룹 (Vhh, ch) 옵티마이저 구성
    pub fn inverse_optimizer(&self) -> OptimizerConfig {
        OptimizerConfig::new(self.optimizer, self.glr).with_momentum(self.momentum)
    }

    pub fn with_seq_length(mut self, seq_length: usize) -> Self {
        self.seq_length = seq_length;
        self
    }

    pub fn with_hidden(mut self, n_hid: usize) -> Self {
        self.n_hid = n_hid;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// 확률적 모드와 하이브리드 샘플링 설정
    pub fn with_stochastic(mut self, stochastic: bool, hybrid: bool) -> Self {
        self.stochastic = stochastic;
        self.hybrid = hybrid;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_reconstruction_noise(mut self, std: f64) -> Self {
        self.reconstruction_noise = std;
        self
    }

    pub fn with_mc_samples(mut self, m: usize) -> Self {
        self.mc_samples = m;
        self
    }

    /// ilr, flr, glr 한꺼번에 설정
    pub fn with_learning_rates(mut self, ilr: f64, flr: f64, glr: f64) -> Self {
        self.ilr = ilr;
        self.flr = flr;
        self.glr = glr;
        self
    }

    pub fn with_init(mut self, init: WeightInit) -> Self {
        self.init = init;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_check_interval(mut self, check_interval: usize) -> Self {
        self.check_interval = check_interval;
        self
    }

    pub fn with_output(mut self, output: OutputActivation) -> Self {
        self.output = output;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerType) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
