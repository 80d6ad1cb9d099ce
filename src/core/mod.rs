//! # STPTT 핵심 모듈
//!
//! 역전파 없이 시점별 국소 목표로 순환 신경망을 학습하는
//! 확률적 목표 전파(Stochastic Target Propagation Through Time)의 구성 요소들

pub mod data;
pub mod dynamics;
pub mod gradients;
pub mod math;
pub mod optimizers;
pub mod params;
pub mod targets;
pub mod training;

// 주요 타입들 재수출
pub use data::{first_symbol_task, one_hot, CsvOptions, Dataset};
pub use dynamics::*;
pub use gradients::*;
pub use optimizers::{build_optimizer, Optimizer, OptimizerConfig, OptimizerType};
pub use params::*;
pub use targets::TargetGenerator;
pub use training::*;
