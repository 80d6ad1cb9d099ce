//! # 닫힌 형태 그래디언트 추정기
//!
//! 자동 미분 없이 tanh 도함수를 명시적으로 적용해
//! 역방향(Vhh, ch), 순방향(Whh, Wxh, bh), 출력층(Why, by) 그래디언트를 계산

pub mod forward_path;
pub mod inverse_path;
pub mod output;

#[cfg(test)]
mod __tests__;

pub use forward_path::ForwardGradients;
pub use inverse_path::InverseGradients;
pub use output::{output_layer, OutputActivation, OutputGradients};
