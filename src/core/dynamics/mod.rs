//! # 순환 동역학
//!
//! 순방향 전이 F, 학습되는 역사상 G, 은닉 상태 샘플링 전략과
//! 시간 축 시퀀스 타입

pub mod forward;
pub mod inverse;
pub mod sampling;
pub mod trajectory;

#[cfg(test)]
mod __tests__;

pub use forward::{forward_step, run_hidden};
pub use inverse::{inverse_step, InverseMapping, LearnedInverse};
pub use sampling::SamplingStrategy;
pub use trajectory::{SequenceBatch, Trajectory};
