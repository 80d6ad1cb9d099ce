//! # 데이터 소스
//!
//! 학습/검증 분할을 담는 [`Dataset`] 과 로더들

pub mod dataset;
pub mod synthetic;


pub use dataset::{one_hot, CsvOptions, Dataset};
pub use synthetic::first_symbol_task;
