pub mod linalg;
pub mod noise;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use linalg::*;
pub use noise::*;
