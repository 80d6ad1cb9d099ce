//! STPTT (Stochastic Target Propagation Through Time) 라이브러리
//!
//! 단일 은닉층 순환 신경망을 시간 역전파 대신 시점별 국소 목표와
//! 학습되는 역사상으로 훈련한다.

pub mod core;

// 핵심 모듈들 재수출
pub use core::{
    // 데이터
    Dataset, CsvOptions, first_symbol_task, one_hot,
    // 파라미터와 동역학
    NetworkShape, ParamName, ParameterStore, WeightInit, SamplingStrategy, SequenceBatch, Trajectory,
    // 목표와 그래디언트
    TargetGenerator, OutputActivation,
    // 최적화기
    Optimizer, OptimizerConfig, OptimizerType,
    // 학습
    StpttConfig, StpttTrainer, FitSummary, TrainingOutcome, EpochReport, Reporter,
    ConsoleReporter, RecordingReporter, AccuracySink, JsonAccuracyStore,
};
