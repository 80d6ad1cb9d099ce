//! STPTT 학습 루프
//!
//! ```text
//! INIT → { INVERSE_PASS → FORWARD_PASS } → VALIDATE → (CONTINUE | STOP)
//! ```
//!
//! 에폭마다 모든 미니배치로 역방향 그룹(Vhh, ch)을 먼저 갱신하고,
//! 이어서 순방향 그룹(Whh, bh, Wxh, Why, by)을 갱신하며 비용을 모은다.

use anyhow::{anyhow, ensure, Result};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::config::StpttConfig;
use super::report::{EpochReport, Reporter};
use super::validation::{evaluate, ValidationResult, ValidationSettings};
use crate::core::data::Dataset;
use crate::core::dynamics::{run_hidden, LearnedInverse, SequenceBatch, Trajectory};
use crate::core::gradients::{output_layer, ForwardGradients, InverseGradients, OutputGradients};
use crate::core::math::{corrupt, spectral_radius};
use crate::core::optimizers::{build_optimizer, Optimizer};
use crate::core::params::{NetworkShape, ParamName, ParameterStore};
use crate::core::targets::TargetGenerator;

/// 학습 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingOutcome {
    MaxEpochsReached,
    /// 순방향 패스 비용이 NaN
    Diverged { epoch: usize },
    /// 검증 오차가 임계값 미만
    Solved { epoch: usize },
}

/// fit 결과 요약
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    pub best_accuracy: f64,
    /// 마지막으로 끝난 에폭의 평균 미니배치 비용
    pub final_cost: f64,
    /// 체크포인트별 검증 정확도
    pub accuracies: Vec<f64>,
    pub outcome: TrainingOutcome,
    pub epochs_run: usize,
}

pub struct StpttTrainer {
    config: StpttConfig,
    dataset: Dataset,
    params: ParameterStore,
    f_optimizer: Box<dyn Optimizer>,
    g_optimizer: Box<dyn Optimizer>,
    targets: TargetGenerator,
    test_set: (SequenceBatch, DMatrix<f64>),
    rng: StdRng,
}

impl StpttTrainer {
    /// 구성/데이터 검증 후 파라미터와 두 옵티마이저 생성
    pub fn new(config: StpttConfig, dataset: Dataset) -> Result<Self> {
        config.validate()?;
        ensure!(
            dataset.seq_length() == config.seq_length,
            "dataset sequence length {} does not match configured seq_length {}",
            dataset.seq_length(),
            config.seq_length
        );
        ensure!(
            dataset.n_train() >= config.batch_size,
            "batch_size {} exceeds the {} training examples",
            config.batch_size,
            dataset.n_train()
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let shape = NetworkShape {
            n_inp: dataset.input_dim(),
            n_hid: config.n_hid,
            n_out: dataset.n_classes(),
        };
        let params = ParameterStore::new(shape, config.init, &mut rng)?;
        let f_optimizer = build_optimizer(&config.forward_optimizer(), &params, &ParamName::FORWARD_GROUP);
        let g_optimizer = build_optimizer(&config.inverse_optimizer(), &params, &ParamName::INVERSE_GROUP);
        let test_set = dataset.test_set()?;

        Ok(Self {
            targets: TargetGenerator::new(config.ilr),
            config,
            dataset,
            params,
            f_optimizer,
            g_optimizer,
            test_set,
            rng,
        })
    }

    pub fn config(&self) -> &StpttConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// 미니배치 하나로 역방향 그룹 갱신
    pub fn step_inverse(&mut self, xs: &SequenceBatch) -> Result<()> {
        self.g_optimizer.reset_gradients(&mut self.params);
        let sampling = self.config.sampling();

        let mut h = run_hidden(&self.params, sampling, xs, &mut self.rng);
        if self.config.noise != 0.0 {
            let states = h
                .iter()
                .map(|state| corrupt(state, self.config.noise, &mut self.rng))
                .collect::<Result<Vec<_>>>()?;
            h = Trajectory::from_states(states);
        }

        InverseGradients::compute(
            &self.params,
            sampling,
            xs,
            &h,
            self.config.reconstruction_noise,
            &mut self.rng,
        )?
        .write_to(&mut self.params)?;

        self.g_optimizer.apply_step(&mut self.params);
        Ok(())
    }

    /// 미니배치 하나로 순방향 그룹 갱신, 배치 비용 반환
    pub fn step_forward(&mut self, xs: &SequenceBatch, labels: &DMatrix<f64>) -> Result<f64> {
        self.f_optimizer.reset_gradients(&mut self.params);
        let sampling = self.config.sampling();
        let activation = self.config.output;
        let m = self.config.mc_samples;

        // M 번의 몬테카를로 출력 평균, 궤적은 마지막 실행 것을 쓴다
        let mut out = DMatrix::zeros(xs.batch_size(), self.params.shape().n_out);
        let mut h = Trajectory::default();
        for _ in 0..m {
            h = run_hidden(&self.params, sampling, xs, &mut self.rng);
            let last = h.last().ok_or_else(|| anyhow!("input sequence is empty"))?;
            out += output_layer(&self.params, activation, last);
        }
        out /= m as f64;

        let cost = activation.cost(&out, labels);
        let error = &out - labels;
        let hs_tmax = h.last().ok_or_else(|| anyhow!("input sequence is empty"))?.clone();

        let targets = self.targets.generate(
            &LearnedInverse::new(&self.params),
            xs,
            &hs_tmax,
            &h,
            self.params.value(ParamName::Why),
            &error,
        )?;

        ForwardGradients::compute(xs, &h, &targets)?.write_to(&mut self.params)?;
        OutputGradients::compute(&hs_tmax, &error)?.write_to(&mut self.params)?;

        self.f_optimizer.apply_step(&mut self.params);
        Ok(cost)
    }

    /// 모든 미니배치에 대한 역방향 패스
    pub fn inverse_pass(&mut self) -> Result<()> {
        let batch_size = self.config.batch_size;
        for i in 0..self.dataset.n_batches(batch_size) {
            let (xs, _) = self.dataset.train_batch(i, batch_size)?;
            self.step_inverse(&xs)?;
        }
        Ok(())
    }

    /// 모든 미니배치에 대한 순방향 패스, 평균 비용 반환
    ///
    /// 비용이 NaN 이 되면 즉시 멈추고 NaN 을 돌려준다.
    pub fn forward_pass(&mut self) -> Result<f64> {
        let batch_size = self.config.batch_size;
        let n_batches = self.dataset.n_batches(batch_size);
        let mut cost = 0.0;

        for i in 0..n_batches {
            let (xs, labels) = self.dataset.train_batch(i, batch_size)?;
            let batch_cost = self.step_forward(&xs, &labels)?;
            log::debug!("batch {}/{} cost {:.6}", i + 1, n_batches, batch_cost);
            cost += batch_cost;
            if cost.is_nan() {
                return Ok(f64::NAN);
            }
        }
        Ok(cost / n_batches as f64)
    }

    /// 검증 분할 평가
    pub fn validate(&mut self) -> Result<ValidationResult> {
        let settings = ValidationSettings {
            sampling: self.config.sampling(),
            output: self.config.output,
            samples: self.config.validation_samples,
            linear_tolerance: self.config.linear_tolerance,
        };
        let (xs, labels) = &self.test_set;
        evaluate(&self.params, &settings, xs, labels, &mut self.rng)
    }

    fn checkpoint(&mut self, epoch: usize, cost: f64, best: &mut f64) -> Result<EpochReport> {
        let validation = self.validate()?;
        let accuracy = validation.accuracy();
        if accuracy > *best {
            *best = accuracy;
        }

        Ok(EpochReport {
            epoch,
            training_loss: cost,
            spectral_radius_whh: spectral_radius(self.params.value(ParamName::Whh)),
            spectral_radius_vhh: spectral_radius(self.params.value(ParamName::Vhh)),
            grad_norm_whh: self.params.grad_norm(ParamName::Whh),
            grad_norm_wxh: self.params.grad_norm(ParamName::Wxh),
            grad_norm_why: self.params.grad_norm(ParamName::Why),
            validation_accuracy: accuracy,
            validation_loss: validation.cost,
            validation_error: validation.error,
            best_accuracy: *best,
        })
    }

    /// 종료 조건까지 에폭 반복
    pub fn fit(&mut self, reporter: &mut dyn Reporter) -> Result<FitSummary> {
        let initial = self.validate()?;
        let mut best = initial.accuracy();
        reporter.report_initial(best);
        log::info!("initial validation accuracy {:.2}", best);

        let mut accuracies = Vec::new();
        let mut final_cost = 0.0;
        let mut outcome = TrainingOutcome::MaxEpochsReached;
        let mut epochs_run = 0;

        for epoch in 1..=self.config.max_epochs {
            epochs_run = epoch;
            self.inverse_pass()?;
            final_cost = self.forward_pass()?;
            reporter.epoch_finished(epoch, final_cost);

            if final_cost.is_nan() {
                log::warn!("Cost is NaN. Aborting...");
                outcome = TrainingOutcome::Diverged { epoch };
                break;
            }

            if epoch % self.config.check_interval == 0 {
                let report = self.checkpoint(epoch, final_cost, &mut best)?;
                log::info!(
                    "epoch {} loss {:.4} accuracy {:.2} best {:.2}",
                    epoch,
                    report.training_loss,
                    report.validation_accuracy,
                    report.best_accuracy
                );
                accuracies.push(report.validation_accuracy);
                reporter.report_epoch(&report);

                if report.validation_error < self.config.solved_threshold {
                    log::info!("problem solved at epoch {}", epoch);
                    outcome = TrainingOutcome::Solved { epoch };
                    break;
                }
            }
        }

        reporter.report_outcome(&outcome);
        Ok(FitSummary {
            best_accuracy: best,
            final_cost,
            accuracies,
            outcome,
            epochs_run,
        })
    }
}
