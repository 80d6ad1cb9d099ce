//! # 학습 루프와 협력 구성요소
//!
//! 구성, 검증, 체크포인트 보고, 정확도 이력 저장, 그리고 이들을 묶는
//! [`StpttTrainer`] 상태 기계

pub mod config;
pub mod persistence;
pub mod report;
pub mod trainer;
pub mod validation;

#[cfg(test)]
mod __tests__;

pub use config::StpttConfig;
pub use persistence::{AccuracyRecord, AccuracySink, JsonAccuracyStore};
pub use report::{ConsoleReporter, EpochReport, RecordingReporter, Reporter};
pub use trainer::{FitSummary, StpttTrainer, TrainingOutcome};
pub use validation::{evaluate, predict, ValidationResult, ValidationSettings};
