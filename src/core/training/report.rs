//! 체크포인트 보고

use serde::{Deserialize, Serialize};
use std::fmt;

use super::trainer::TrainingOutcome;

/// 검증 체크포인트 한 번의 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    pub epoch: usize,
    pub training_loss: f64,
    /// NaN 이 섞인 행렬이면 None
    pub spectral_radius_whh: Option<f64>,
    pub spectral_radius_vhh: Option<f64>,
    pub grad_norm_whh: f64,
    pub grad_norm_wxh: f64,
    pub grad_norm_why: f64,
    pub validation_accuracy: f64,
    pub validation_loss: f64,
    pub validation_error: f64,
    pub best_accuracy: f64,
}

fn radius(value: Option<f64>) -> String {
    match value {
        Some(r) => format!("{:.3}", r),
        None => "-----".to_string(),
    }
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "It: {:<10}\tLoss: {:.3}\tρ|Whh|: {}\tρ|Vhh|: {}\tdWhh: {:.5}\t dWxh: {:.5}\t dWhy: {:.5}\t\
             Acc: {:.2}\tVal.loss: {:.2}\tHighest: {:.2}\tρ|val_err|: {:.3}",
            self.epoch,
            self.training_loss,
            radius(self.spectral_radius_whh),
            radius(self.spectral_radius_vhh),
            self.grad_norm_whh,
            self.grad_norm_wxh,
            self.grad_norm_why,
            self.validation_accuracy,
            self.validation_loss,
            self.best_accuracy,
            self.validation_error * 100.0,
        )
    }
}

/// 학습 진행 보고 수신자
pub trait Reporter {
    /// 학습 전 초기 검증 정확도
    fn report_initial(&mut self, _accuracy: f64) {}

    /// 매 에폭 순방향 패스 직후 (체크포인트 여부와 무관)
    fn epoch_finished(&mut self, _epoch: usize, _cost: f64) {}

    fn report_epoch(&mut self, report: &EpochReport);

    fn report_outcome(&mut self, _outcome: &TrainingOutcome) {}
}

/// 체크포인트마다 한 줄씩 표준 출력
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// 학습 전 초기 정확도 줄
    pub fn initial_line(accuracy: f64) -> String {
        format!("Epoch -- \t Cost -- \t Test Acc: {:.2} \t Highest: {:.2}", accuracy, accuracy)
    }

    /// 종료 사유 줄 (최대 에폭 도달이면 없음)
    pub fn outcome_line(outcome: &TrainingOutcome) -> Option<String> {
        match outcome {
            TrainingOutcome::Solved { epoch } => Some(format!("PROBLEM SOLVED. (epoch {})", epoch)),
            TrainingOutcome::Diverged { epoch } => Some(format!("Cost is NaN. Aborting.... (epoch {})", epoch)),
            TrainingOutcome::MaxEpochsReached => None,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report_initial(&mut self, accuracy: f64) {
        println!("{}", Self::initial_line(accuracy));
    }

    fn report_epoch(&mut self, report: &EpochReport) {
        println!("{}", report);
    }

    fn report_outcome(&mut self, outcome: &TrainingOutcome) {
        if let Some(line) = Self::outcome_line(outcome) {
            println!("{}", line);
        }
    }
}

/// 모든 보고를 메모리에 보관
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub initial_accuracy: Option<f64>,
    /// (에폭, 평균 학습 비용)
    pub epoch_costs: Vec<(usize, f64)>,
    pub reports: Vec<EpochReport>,
    pub outcome: Option<TrainingOutcome>,
}

impl Reporter for RecordingReporter {
    fn report_initial(&mut self, accuracy: f64) {
        self.initial_accuracy = Some(accuracy);
    }

    fn epoch_finished(&mut self, epoch: usize, cost: f64) {
        self.epoch_costs.push((epoch, cost));
    }

    fn report_epoch(&mut self, report: &EpochReport) {
        self.reports.push(report.clone());
    }

    fn report_outcome(&mut self, outcome: &TrainingOutcome) {
        self.outcome = Some(*outcome);
    }
}
